//! Error types for the synop-reduction crate.

use crate::{encoding::ReadingField, observation::StationId};
use metfor::{CelsiusDiff, Quantity};
use thiserror::Error;

/// Error type for the calculation engine.
#[derive(Clone, Copy, PartialEq, Debug, Error)]
pub enum ReductionError {
    /// A coded reading was empty where a value was required.
    #[error("no {0} reading supplied")]
    EmptyReading(ReadingField),
    /// A coded reading contained something other than decimal digits.
    #[error("{0} reading is not all digits")]
    NonDigitReading(ReadingField),
    /// A coded reading did not have the width its field requires.
    #[error("{} reading must be exactly {} digits", .0, .0.width())]
    WrongWidth(ReadingField),
    /// Rounded dry-bulb temperature outside the 0..=50 °C table domain.
    #[error("dry-bulb {0} °C is outside the tabulated 0-50 °C range")]
    DryBulbOutOfRange(i32),
    /// Wet-bulb depression larger than the 30.0 °C table domain.
    #[error("wet-bulb depression {} °C exceeds the tabulated 30.0 °C maximum", .0.unpack())]
    SpreadOutOfRange(CelsiusDiff),
    /// No hygrometric row for this rounded dry-bulb temperature.
    #[error("no hygrometric row for dry-bulb {0} °C")]
    UntabulatedDryBulb(i32),
    /// The wet-bulb depression has no value in the hygrometric table.
    #[error("wet-bulb depression {} °C is not tabulated", .0.unpack())]
    UntabulatedSpread(CelsiusDiff),
    /// No correction tables exist for this station.
    #[error("no correction tables for station {0}")]
    UnknownStation(StationId),
    /// The station has correction tables, but none for this temperature.
    #[error("station {station} has no correction row for dry-bulb {dry_bulb} °C")]
    MissingCorrectionRow {
        /// The station whose tables were consulted.
        station: StationId,
        /// Rounded dry-bulb temperature of the missing row.
        dry_bulb: i32,
    },
    /// The correction row exists but defines no pressure levels.
    #[error("station {station} row for {dry_bulb} °C has no pressure levels")]
    NoPressureLevels {
        /// The station whose tables were consulted.
        station: StationId,
        /// Rounded dry-bulb temperature of the empty row.
        dry_bulb: i32,
    },
}

/// The three classes of engine failure surfaced to operators.
///
/// Data-entry screens report these differently: a `Format` problem is a typo
/// in the coded reading, a `Range` problem is a physically out-of-domain
/// value, and a `Lookup` problem is a gap in the reference tables for an
/// otherwise valid input.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ErrorKind {
    /// Malformed coded input, nothing was calculated.
    Format,
    /// Decoded values fall outside the tables' documented domain.
    Range,
    /// A required table row, cell, or pressure level is missing.
    Lookup,
}

impl ReductionError {
    /// Classify this error for reporting.
    pub fn kind(self) -> ErrorKind {
        use ReductionError::*;

        match self {
            EmptyReading(_) | NonDigitReading(_) | WrongWidth(_) => ErrorKind::Format,
            DryBulbOutOfRange(_) | SpreadOutOfRange(_) => ErrorKind::Range,
            UntabulatedDryBulb(_)
            | UntabulatedSpread(_)
            | UnknownStation(_)
            | MissingCorrectionRow { .. }
            | NoPressureLevels { .. } => ErrorKind::Lookup,
        }
    }
}

/// Shorthand for results.
pub type Result<T> = ::std::result::Result<T, ReductionError>;

/// Error type for loading and validating the reference tables.
#[derive(Debug, Error)]
pub enum TableError {
    /// The table file could not be read.
    #[error("error reading table file: {0}")]
    Io(#[from] std::io::Error),
    /// The table file is not valid JSON of the expected shape.
    #[error("error parsing table file: {0}")]
    Parse(#[from] serde_json::Error),
    /// The differences sequence is not strictly ascending.
    #[error("hygrometric differences are not strictly ascending")]
    UnorderedDifferences,
    /// A row's cell count does not match the differences sequence.
    #[error("row for dry-bulb {dry_bulb} °C has {got} cells, expected {expected}")]
    MisalignedRow {
        /// Dry-bulb key of the offending row.
        dry_bulb: i32,
        /// Number of cells the differences sequence requires.
        expected: usize,
        /// Number of cells the row actually has.
        got: usize,
    },
    /// A dry-bulb row key did not parse as an integer.
    #[error("dry-bulb key {key:?} is not an integer")]
    BadTemperatureKey {
        /// The offending key text.
        key: String,
    },
    /// A pressure-level key did not parse as a finite number.
    #[error("pressure-level key {key:?} is not numeric")]
    BadPressureKey {
        /// The offending key text.
        key: String,
    },
    /// A station key did not parse as an integer.
    #[error("station key {key:?} is not an integer")]
    BadStationKey {
        /// The offending key text.
        key: String,
    },
}
