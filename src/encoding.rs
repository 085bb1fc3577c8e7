//! Decoding and encoding of the fixed-width digit strings used on surface
//! observation registers.
//!
//! Readings are transported the way they are written in the WMO FM-12 style
//! code groups: an unsigned digit string of fixed width per field, scaled by
//! ten, so "256" is 25.6 °C and "10120" is 1012.0 hPa. Decoding divides by
//! the scale; encoding multiplies, rounds, and zero-pads back to the field
//! width.

use crate::error::{ReductionError, Result};
use metfor::{Celsius, HectoPascal, Quantity};
use std::fmt::Display;
use strum_macros::EnumIter;

/// The coded fields of a surface observation this crate can decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, Hash)]
pub enum ReadingField {
    /// Dry-bulb temperature, tenths of °C.
    DryBulb,
    /// Wet-bulb temperature, tenths of °C.
    WetBulb,
    /// Barometer reading, tenths of hPa.
    Barometer,
    /// Visibility, tenths of a kilometre.
    Visibility,
    /// Present-weather code, table 4677 value.
    PresentWeather,
}

impl ReadingField {
    /// The exact number of digits a coded reading of this field must have.
    #[inline]
    pub fn width(self) -> usize {
        use ReadingField::*;

        match self {
            DryBulb | WetBulb | Visibility => 3,
            Barometer => 5,
            PresentWeather => 2,
        }
    }

    /// The implied decimal scale. Every field on the register stores tenths.
    #[inline]
    pub fn scale(self) -> f64 {
        10.0
    }
}

impl Display for ReadingField {
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        use ReadingField::*;

        let name = match self {
            DryBulb => "dry-bulb",
            WetBulb => "wet-bulb",
            Barometer => "barometer",
            Visibility => "visibility",
            PresentWeather => "present weather",
        };

        write!(formatter, "{}", name)
    }
}

/// Decode a fixed-width digit string to its physical value.
///
/// Fails if `raw` is empty, contains anything but ASCII digits, or does not
/// have exactly the width `field` requires.
///
/// # Examples
/// ```rust
/// use synop_reduction::{decode_fixed_point, ReadingField};
///
/// let val = decode_fixed_point("256", ReadingField::DryBulb).unwrap();
/// assert!((val - 25.6).abs() < 1.0e-9);
///
/// assert!(decode_fixed_point("", ReadingField::DryBulb).is_err());
/// assert!(decode_fixed_point("25.6", ReadingField::DryBulb).is_err());
/// assert!(decode_fixed_point("26", ReadingField::DryBulb).is_err());
/// ```
pub fn decode_fixed_point(raw: &str, field: ReadingField) -> Result<f64> {
    if raw.is_empty() {
        return Err(ReductionError::EmptyReading(field));
    }

    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ReductionError::NonDigitReading(field));
    }

    if raw.len() != field.width() {
        return Err(ReductionError::WrongWidth(field));
    }

    // All digits and at most five of them, so this parse cannot overflow.
    let scaled: u32 = raw
        .parse()
        .map_err(|_| ReductionError::NonDigitReading(field))?;

    Ok(f64::from(scaled) / field.scale())
}

/// Decode a 3-digit coded temperature reading.
#[inline]
pub fn decode_temperature(raw: &str, field: ReadingField) -> Result<Celsius> {
    decode_fixed_point(raw, field).map(Celsius)
}

/// Decode the 5-digit coded barometer reading.
#[inline]
pub fn decode_pressure(raw: &str) -> Result<HectoPascal> {
    decode_fixed_point(raw, ReadingField::Barometer).map(HectoPascal)
}

/// Encode a pressure as the 5-digit, zero-padded tenths-of-hPa group.
///
/// Decoding the result recovers the pressure to one decimal place.
///
/// # Examples
/// ```rust
/// use metfor::HectoPascal;
/// use synop_reduction::encode_station_pressure;
///
/// assert_eq!(encode_station_pressure(HectoPascal(1012.0)), "10120");
/// assert_eq!(encode_station_pressure(HectoPascal(998.25)), "09983");
/// ```
#[inline]
pub fn encode_station_pressure(pressure: HectoPascal) -> String {
    let tenths = (pressure.unpack() * 10.0).round() as i64;
    format!("{:05}", tenths)
}

/// Encode a pressure correction as an explicitly signed whole number of
/// hundredths of hPa, the register's height-difference format.
///
/// # Examples
/// ```rust
/// use metfor::HectoPascal;
/// use synop_reduction::encode_signed_delta;
///
/// assert_eq!(encode_signed_delta(HectoPascal(3.39)), "+339");
/// assert_eq!(encode_signed_delta(HectoPascal(0.0)), "+0");
/// ```
#[inline]
pub fn encode_signed_delta(correction: HectoPascal) -> String {
    let hundredths = (correction.unpack() * 100.0).round() as i64;
    format!("{:+}", hundredths)
}

/// Round to one decimal place, halves away from zero.
#[inline]
pub fn round_to_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Round a temperature to the nearest whole degree, halves away from zero.
///
/// This is the rounding the reference tables are keyed by.
#[inline]
pub fn nearest_degree(temperature: Celsius) -> i32 {
    temperature.unpack().round() as i32
}

#[cfg(test)]
mod test {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn decode_all_fields() {
        assert_eq!(decode_fixed_point("256", ReadingField::DryBulb), Ok(25.6));
        assert_eq!(decode_fixed_point("230", ReadingField::WetBulb), Ok(23.0));
        assert_eq!(
            decode_fixed_point("10120", ReadingField::Barometer),
            Ok(1012.0)
        );
        assert_eq!(decode_fixed_point("080", ReadingField::Visibility), Ok(8.0));
        assert_eq!(
            decode_fixed_point("61", ReadingField::PresentWeather),
            Ok(6.1)
        );
    }

    #[test]
    fn empty_reading_is_rejected_for_every_field() {
        for field in ReadingField::iter() {
            assert_eq!(
                decode_fixed_point("", field),
                Err(ReductionError::EmptyReading(field))
            );
        }
    }

    #[test]
    fn non_digits_are_rejected() {
        assert_eq!(
            decode_fixed_point("2a6", ReadingField::DryBulb),
            Err(ReductionError::NonDigitReading(ReadingField::DryBulb))
        );
        // A decimal point or sign is not part of the code form.
        assert_eq!(
            decode_fixed_point("25.6", ReadingField::DryBulb),
            Err(ReductionError::NonDigitReading(ReadingField::DryBulb))
        );
        assert_eq!(
            decode_fixed_point("-25", ReadingField::DryBulb),
            Err(ReductionError::NonDigitReading(ReadingField::DryBulb))
        );
    }

    #[test]
    fn wrong_width_is_rejected() {
        assert_eq!(
            decode_fixed_point("26", ReadingField::DryBulb),
            Err(ReductionError::WrongWidth(ReadingField::DryBulb))
        );
        assert_eq!(
            decode_fixed_point("2560", ReadingField::DryBulb),
            Err(ReductionError::WrongWidth(ReadingField::DryBulb))
        );
        assert_eq!(
            decode_fixed_point("1012", ReadingField::Barometer),
            Err(ReductionError::WrongWidth(ReadingField::Barometer))
        );
    }

    #[test]
    fn encode_zero_pads_to_five_digits() {
        assert_eq!(encode_station_pressure(HectoPascal(998.2)), "09982");
        assert_eq!(encode_station_pressure(HectoPascal(1012.0)), "10120");
        assert_eq!(encode_station_pressure(HectoPascal(1015.39)), "10154");
    }

    #[test]
    fn decode_is_a_left_inverse_of_encode() {
        for tenths in 8000..=10900 {
            let pressure = HectoPascal(f64::from(tenths) / 10.0);
            let recovered =
                decode_fixed_point(&encode_station_pressure(pressure), ReadingField::Barometer)
                    .unwrap();
            assert!((recovered - pressure.unpack()).abs() < 1.0e-9);
        }
    }

    #[test]
    fn signed_delta_format() {
        assert_eq!(encode_signed_delta(HectoPascal(3.39)), "+339");
        assert_eq!(encode_signed_delta(HectoPascal(3.4)), "+340");
        assert_eq!(encode_signed_delta(HectoPascal(0.0)), "+0");
        assert_eq!(encode_signed_delta(HectoPascal(-0.12)), "-12");
    }

    #[test]
    fn rounding_helpers() {
        assert_eq!(round_to_tenths(25.6 - 23.0), 2.6);
        // Halves round away from zero, in both directions.
        assert_eq!(round_to_tenths(0.25), 0.3);
        assert_eq!(round_to_tenths(-0.25), -0.3);
        assert_eq!(nearest_degree(Celsius(25.6)), 26);
        assert_eq!(nearest_degree(Celsius(25.4)), 25);
        assert_eq!(nearest_degree(Celsius(25.5)), 26);
        assert_eq!(nearest_degree(Celsius(-0.5)), -1);
        assert_eq!(nearest_degree(Celsius(50.4)), 50);
    }
}
