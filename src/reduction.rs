//! The derived record for one observation and the orchestration that fills
//! it.

use crate::{
    encoding::{self, ReadingField},
    error::{ReductionError, Result},
    observation::{Observation, StationId},
    pressure::{sea_level_pressure, station_level_pressure, StationLevelPressure},
    psychrometry::dew_point_and_rh,
    tables::{HygrometricPoint, HygrometricTable, StationCorrectionTable},
};
use metfor::{Celsius, Quantity};
use serde::Serialize;

/// Everything the engine derived from one observation.
///
/// Every output is the formatted register string and is absent when its
/// chain did not run, or failed; a chain failure is kept on the record so
/// the caller can tell the difference.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Reduction {
    /// Dew point, plain decimal °C.
    #[serde(rename = "Td", skip_serializing_if = "Option::is_none")]
    dew_point: Option<String>,
    /// Relative humidity, plain decimal percent.
    #[serde(rename = "relativeHumidity", skip_serializing_if = "Option::is_none")]
    relative_humidity: Option<String>,
    /// Height-difference correction, signed hundredths of hPa.
    #[serde(rename = "heightDifference", skip_serializing_if = "Option::is_none")]
    height_difference: Option<String>,
    /// Station-level pressure, five digits of tenths of hPa.
    #[serde(rename = "stationLevelPressure", skip_serializing_if = "Option::is_none")]
    station_level_pressure: Option<String>,
    /// Sea-level correction, signed hundredths of hPa.
    #[serde(rename = "seaLevelReduction", skip_serializing_if = "Option::is_none")]
    sea_level_reduction: Option<String>,
    /// Sea-level pressure, five digits of tenths of hPa.
    #[serde(
        rename = "correctedSeaLevelPressure",
        skip_serializing_if = "Option::is_none"
    )]
    corrected_sea_level_pressure: Option<String>,
    /// Why the psychrometric chain produced nothing, when it ran and failed.
    #[serde(skip)]
    psychrometric_error: Option<ReductionError>,
    /// Why the pressure chain stopped where it did, when it ran and failed.
    #[serde(skip)]
    pressure_error: Option<ReductionError>,
}

impl Reduction {
    /// Dew point, plain decimal °C.
    #[inline]
    pub fn dew_point(&self) -> Option<&str> {
        self.dew_point.as_deref()
    }

    /// Relative humidity, plain decimal percent.
    #[inline]
    pub fn relative_humidity(&self) -> Option<&str> {
        self.relative_humidity.as_deref()
    }

    /// Height-difference correction, signed hundredths of hPa.
    #[inline]
    pub fn height_difference(&self) -> Option<&str> {
        self.height_difference.as_deref()
    }

    /// Station-level pressure, five digits of tenths of hPa.
    #[inline]
    pub fn station_level_pressure(&self) -> Option<&str> {
        self.station_level_pressure.as_deref()
    }

    /// Sea-level correction, signed hundredths of hPa.
    #[inline]
    pub fn sea_level_reduction(&self) -> Option<&str> {
        self.sea_level_reduction.as_deref()
    }

    /// Sea-level pressure, five digits of tenths of hPa.
    #[inline]
    pub fn corrected_sea_level_pressure(&self) -> Option<&str> {
        self.corrected_sea_level_pressure.as_deref()
    }

    /// Why the psychrometric chain produced nothing, when it ran and failed.
    #[inline]
    pub fn psychrometric_error(&self) -> Option<ReductionError> {
        self.psychrometric_error
    }

    /// Why the pressure chain stopped where it did, when it ran and failed.
    #[inline]
    pub fn pressure_error(&self) -> Option<ReductionError> {
        self.pressure_error
    }
}

/// Run both derivation chains for one observation.
///
/// The psychrometric chain runs when the dry-bulb and wet-bulb readings are
/// both present, the pressure chain when the dry-bulb and barometer readings
/// are. The chains are independent: a failure in one is recorded on the
/// record and leaves the other untouched. Identical inputs and tables always
/// produce an identical record.
pub fn reduce(
    observation: &Observation,
    hygrometric: &HygrometricTable,
    corrections: &StationCorrectionTable,
) -> Reduction {
    let mut result = Reduction::default();

    psychrometric_chain(observation, hygrometric, &mut result);
    pressure_chain(observation, corrections, &mut result);

    result
}

fn psychrometric_chain(
    observation: &Observation,
    table: &HygrometricTable,
    result: &mut Reduction,
) {
    let (raw_dry, raw_wet) = match (observation.dry_bulb(), observation.wet_bulb()) {
        (Some(dry), Some(wet)) => (dry, wet),
        _ => return,
    };

    match psychrometric_outcome(raw_dry, raw_wet, table) {
        Ok(point) => {
            result.dew_point = Some(format!("{}", point.dew_point.unpack()));
            result.relative_humidity = Some(format!("{}", point.relative_humidity));
        }
        Err(err) => result.psychrometric_error = Some(err),
    }
}

fn psychrometric_outcome(
    raw_dry: &str,
    raw_wet: &str,
    table: &HygrometricTable,
) -> Result<HygrometricPoint> {
    let dry_bulb = encoding::decode_temperature(raw_dry, ReadingField::DryBulb)?;
    let wet_bulb = encoding::decode_temperature(raw_wet, ReadingField::WetBulb)?;

    dew_point_and_rh(dry_bulb, wet_bulb, table)
}

fn pressure_chain(
    observation: &Observation,
    corrections: &StationCorrectionTable,
    result: &mut Reduction,
) {
    let (raw_dry, raw_bar) = match (observation.dry_bulb(), observation.barometer()) {
        (Some(dry), Some(bar)) => (dry, bar),
        _ => return,
    };

    let (dry_bulb, qfe) = match stage_one(raw_dry, raw_bar, observation.station(), corrections) {
        Ok(outcome) => outcome,
        Err(err) => {
            result.pressure_error = Some(err);
            return;
        }
    };

    let encoded = encoding::encode_station_pressure(qfe.pressure);
    let reported = encoding::decode_pressure(&encoded);

    result.height_difference = Some(encoding::encode_signed_delta(qfe.height_correction));
    result.station_level_pressure = Some(encoded);

    // The second stage reduces the reported value, rounded by its encoding
    // to one decimal, so the sea-level figure matches the register entry.
    let reported = match reported {
        Ok(pressure) => pressure,
        Err(err) => {
            result.pressure_error = Some(err);
            return;
        }
    };

    match sea_level_pressure(dry_bulb, reported, observation.station(), corrections) {
        Ok(qnh) => {
            result.sea_level_reduction =
                Some(encoding::encode_signed_delta(qnh.sea_level_correction));
            result.corrected_sea_level_pressure =
                Some(encoding::encode_station_pressure(qnh.pressure));
        }
        Err(err) => result.pressure_error = Some(err),
    }
}

fn stage_one(
    raw_dry: &str,
    raw_bar: &str,
    station: StationId,
    corrections: &StationCorrectionTable,
) -> Result<(Celsius, StationLevelPressure)> {
    let dry_bulb = encoding::decode_temperature(raw_dry, ReadingField::DryBulb)?;
    let barometer = encoding::decode_pressure(raw_bar)?;

    let qfe = station_level_pressure(dry_bulb, barometer, station, corrections)?;

    Ok((dry_bulb, qfe))
}
