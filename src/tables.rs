//! The two read-only reference tables the engine consults: the hygrometric
//! table shared by all stations and the per-station barometric correction
//! tables.
//!
//! Both are loaded once at process start and never mutated, so they can be
//! shared freely across threads by reference.

pub use self::{
    correction::{CorrectionLevel, CorrectionRow, StationCorrectionTable, StationCorrections},
    hygrometric::{HygrometricPoint, HygrometricTable},
};

mod correction;
mod hygrometric;
