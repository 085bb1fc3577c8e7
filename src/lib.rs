#![warn(missing_docs)]
//! Types and functions for reducing coded surface weather observations.
//!
//! Readings arrive as fixed-width strings of digits, copied from the daily
//! register. This crate decodes them and carries them through the two manual
//! reductions of the observing routine: the hygrometric table lookup, which
//! turns a dry-bulb and wet-bulb pair into a dew point and relative humidity,
//! and the barometric correction lookup, which turns the barometer as read
//! into station-level and then sea-level pressure.

//
// API
//
pub use crate::{
    encoding::{
        decode_fixed_point, decode_pressure, decode_temperature, encode_signed_delta,
        encode_station_pressure, nearest_degree, round_to_tenths, ReadingField,
    },
    error::{ErrorKind, ReductionError, Result, TableError},
    observation::{DecodedReadings, Observation, StationId},
    pressure::{sea_level_pressure, station_level_pressure, SeaLevelPressure, StationLevelPressure},
    psychrometry::dew_point_and_rh,
    reduction::{reduce, Reduction},
    tables::{
        CorrectionLevel, CorrectionRow, HygrometricPoint, HygrometricTable,
        StationCorrectionTable, StationCorrections,
    },
};

//
// Internal use only
//

// Modules
mod encoding;
mod error;
mod observation;
mod pressure;
mod psychrometry;
mod reduction;
mod tables;

#[cfg(test)]
mod test_data;
