//! Reduction of a barometer reading to station-level and sea-level pressure.
//!
//! Both stages are table-driven. The station's certificate tabulates a
//! correction per (whole degree, pressure level); the level is chosen by
//! nearest match to the pressure being corrected, never by interpolation.

use crate::{
    encoding::nearest_degree,
    error::{ReductionError, Result},
    observation::StationId,
    tables::{CorrectionRow, StationCorrectionTable},
};
use metfor::{Celsius, HectoPascal};

/// The outcome of the first reduction stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StationLevelPressure {
    /// The height-difference correction applied.
    pub height_correction: HectoPascal,
    /// The station-level pressure (QFE), reading plus correction.
    pub pressure: HectoPascal,
}

/// The outcome of the second reduction stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeaLevelPressure {
    /// The sea-level correction applied.
    pub sea_level_correction: HectoPascal,
    /// The sea-level pressure (QNH), station level plus correction.
    pub pressure: HectoPascal,
}

/// Reduce a barometer reading to station-level pressure.
///
/// The height-difference correction comes from the station's row for the
/// rounded dry-bulb temperature, at the tabulated level nearest the
/// barometer reading.
pub fn station_level_pressure(
    dry_bulb: Celsius,
    barometer: HectoPascal,
    station: StationId,
    corrections: &StationCorrectionTable,
) -> Result<StationLevelPressure> {
    let (row, dry_bulb) = correction_row(dry_bulb, station, corrections)?;

    let level = row
        .nearest_height_level(barometer)
        .ok_or(ReductionError::NoPressureLevels { station, dry_bulb })?;

    Ok(StationLevelPressure {
        height_correction: level.correction,
        pressure: barometer + level.correction,
    })
}

/// Reduce a station-level pressure to sea level.
///
/// Mirrors the first stage against the row's sea map, keyed by the level
/// nearest the station-level pressure.
pub fn sea_level_pressure(
    dry_bulb: Celsius,
    station_pressure: HectoPascal,
    station: StationId,
    corrections: &StationCorrectionTable,
) -> Result<SeaLevelPressure> {
    let (row, dry_bulb) = correction_row(dry_bulb, station, corrections)?;

    let level = row
        .nearest_sea_level(station_pressure)
        .ok_or(ReductionError::NoPressureLevels { station, dry_bulb })?;

    Ok(SeaLevelPressure {
        sea_level_correction: level.correction,
        pressure: station_pressure + level.correction,
    })
}

fn correction_row(
    dry_bulb: Celsius,
    station: StationId,
    corrections: &StationCorrectionTable,
) -> Result<(&CorrectionRow, i32)> {
    let dry_bulb = nearest_degree(dry_bulb);

    let row = corrections
        .station(station)
        .ok_or(ReductionError::UnknownStation(station))?
        .row(dry_bulb)
        .ok_or(ReductionError::MissingCorrectionRow { station, dry_bulb })?;

    Ok((row, dry_bulb))
}
