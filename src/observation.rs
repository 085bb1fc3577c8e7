//! The raw surface observation record and its decoded form.

use crate::{
    encoding::{self, ReadingField},
    error::Result,
};
use chrono::NaiveDateTime;
use metfor::{Celsius, HectoPascal};
use optional::Optioned;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Station index number, as assigned in the national station register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StationId(pub i32);

impl Display for StationId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// A raw surface observation as keyed in from the register sheet.
///
/// Readings are the coded digit strings exactly as read, not physical
/// values. An absent reading means the observer did not take one, which is
/// routine, so every reading is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// The observing station.
    #[serde(rename = "stationId")]
    station: StationId,
    /// Valid time of the observation. Carried through, never interpreted.
    #[serde(rename = "validTime", skip_serializing_if = "Option::is_none")]
    valid_time: Option<NaiveDateTime>,
    /// Coded dry-bulb temperature, e.g. "256" for 25.6 °C.
    #[serde(rename = "dryBulbAsRead", skip_serializing_if = "Option::is_none")]
    dry_bulb: Option<String>,
    /// Coded wet-bulb temperature.
    #[serde(rename = "wetBulbAsRead", skip_serializing_if = "Option::is_none")]
    wet_bulb: Option<String>,
    /// Coded barometer reading, e.g. "10120" for 1012.0 hPa.
    #[serde(rename = "barAsRead", skip_serializing_if = "Option::is_none")]
    barometer: Option<String>,
}

impl Observation {
    /// Create a new observation for a station with no readings yet.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use synop_reduction::{Observation, StationId};
    ///
    /// let obs = Observation::new(StationId(48694));
    /// assert!(obs.dry_bulb().is_none());
    /// ```
    #[inline]
    pub fn new(station: StationId) -> Self {
        Observation {
            station,
            valid_time: None,
            dry_bulb: None,
            wet_bulb: None,
            barometer: None,
        }
    }

    /// Builder method for the valid time.
    #[inline]
    pub fn with_valid_time<T>(mut self, valid_time: T) -> Self
    where
        Option<NaiveDateTime>: From<T>,
    {
        self.valid_time = Option::from(valid_time);
        self
    }

    /// Builder method for the coded dry-bulb reading.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use synop_reduction::{Observation, StationId};
    ///
    /// let obs = Observation::new(StationId(48694)).with_dry_bulb("256".to_owned());
    /// assert_eq!(obs.dry_bulb(), Some("256"));
    ///
    /// let obs = obs.with_dry_bulb(None);
    /// assert!(obs.dry_bulb().is_none());
    /// ```
    #[inline]
    pub fn with_dry_bulb<S>(mut self, raw: S) -> Self
    where
        Option<String>: From<S>,
    {
        self.dry_bulb = Option::from(raw);
        self
    }

    /// Builder method for the coded wet-bulb reading.
    #[inline]
    pub fn with_wet_bulb<S>(mut self, raw: S) -> Self
    where
        Option<String>: From<S>,
    {
        self.wet_bulb = Option::from(raw);
        self
    }

    /// Builder method for the coded barometer reading.
    #[inline]
    pub fn with_barometer<S>(mut self, raw: S) -> Self
    where
        Option<String>: From<S>,
    {
        self.barometer = Option::from(raw);
        self
    }

    /// The observing station.
    #[inline]
    pub fn station(&self) -> StationId {
        self.station
    }

    /// Valid time of the observation, if one was recorded.
    #[inline]
    pub fn valid_time(&self) -> Option<NaiveDateTime> {
        self.valid_time
    }

    /// The coded dry-bulb reading, if one was taken.
    #[inline]
    pub fn dry_bulb(&self) -> Option<&str> {
        self.dry_bulb.as_deref()
    }

    /// The coded wet-bulb reading, if one was taken.
    #[inline]
    pub fn wet_bulb(&self) -> Option<&str> {
        self.wet_bulb.as_deref()
    }

    /// The coded barometer reading, if one was taken.
    #[inline]
    pub fn barometer(&self) -> Option<&str> {
        self.barometer.as_deref()
    }

    /// Decode every present reading to its physical value.
    ///
    /// Absent readings decode to a missing value; any present but malformed
    /// reading fails the whole decode.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use metfor::Celsius;
    /// use synop_reduction::{Observation, StationId};
    ///
    /// let obs = Observation::new(StationId(48694))
    ///     .with_dry_bulb("256".to_owned())
    ///     .with_wet_bulb("230".to_owned());
    ///
    /// let vals = obs.decode().unwrap();
    /// assert_eq!(vals.dry_bulb.unpack(), Celsius(25.6));
    /// assert_eq!(vals.wet_bulb.unpack(), Celsius(23.0));
    /// assert!(vals.barometer.is_none());
    /// ```
    pub fn decode(&self) -> Result<DecodedReadings> {
        Ok(DecodedReadings {
            dry_bulb: decode_temperature_field(self.dry_bulb(), ReadingField::DryBulb)?,
            wet_bulb: decode_temperature_field(self.wet_bulb(), ReadingField::WetBulb)?,
            barometer: decode_pressure_field(self.barometer())?,
        })
    }
}

/// Physical values decoded from an observation's coded readings.
///
/// This is the one struct both derivation chains consume.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DecodedReadings {
    /// Dry-bulb temperature.
    pub dry_bulb: Optioned<Celsius>,
    /// Wet-bulb temperature.
    pub wet_bulb: Optioned<Celsius>,
    /// Barometer reading.
    pub barometer: Optioned<HectoPascal>,
}

pub(crate) fn decode_temperature_field(
    raw: Option<&str>,
    field: ReadingField,
) -> Result<Optioned<Celsius>> {
    match raw {
        Some(raw) => encoding::decode_temperature(raw, field).map(optional::some),
        None => Ok(optional::none()),
    }
}

pub(crate) fn decode_pressure_field(raw: Option<&str>) -> Result<Optioned<HectoPascal>> {
    match raw {
        Some(raw) => encoding::decode_pressure(raw).map(optional::some),
        None => Ok(optional::none()),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::ReductionError;

    #[test]
    fn decode_requires_every_present_field_to_be_well_formed() {
        let obs = Observation::new(StationId(48694))
            .with_dry_bulb("256".to_owned())
            .with_barometer("1012".to_owned());

        assert_eq!(
            obs.decode(),
            Err(ReductionError::WrongWidth(ReadingField::Barometer))
        );
    }

    #[test]
    fn decode_of_an_empty_observation_is_all_missing() {
        let vals = Observation::new(StationId(48694)).decode().unwrap();

        assert!(vals.dry_bulb.is_none());
        assert!(vals.wet_bulb.is_none());
        assert!(vals.barometer.is_none());
    }

    #[test]
    fn serde_round_trip_uses_register_names() {
        let obs = Observation::new(StationId(48694))
            .with_dry_bulb("256".to_owned())
            .with_wet_bulb("230".to_owned())
            .with_barometer("10120".to_owned());

        let json = serde_json::to_value(&obs).unwrap();
        assert_eq!(json["stationId"], 48694);
        assert_eq!(json["dryBulbAsRead"], "256");
        assert_eq!(json["wetBulbAsRead"], "230");
        assert_eq!(json["barAsRead"], "10120");

        let back: Observation = serde_json::from_value(json).unwrap();
        assert_eq!(back, obs);
    }

    #[test]
    fn missing_readings_deserialize_as_absent() {
        let obs: Observation = serde_json::from_str(r#"{ "stationId": 48694 }"#).unwrap();

        assert_eq!(obs.station(), StationId(48694));
        assert!(obs.dry_bulb().is_none());
        assert!(obs.wet_bulb().is_none());
        assert!(obs.barometer().is_none());
    }
}
