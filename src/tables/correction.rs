//! The per-station barometric correction tables.
//!
//! Each station's barometer certificate tabulates, per whole degree of
//! attached-thermometer temperature, a correction from the barometer reading
//! to station-level pressure and a further correction from station level to
//! sea level. Both are keyed by discrete pressure levels; the key written in
//! the table is kept as a string, exactly as certified.

use crate::{error::TableError, observation::StationId};
use metfor::{HectoPascal, Quantity};
use serde::Deserialize;
use std::{
    cmp::Ordering,
    collections::{BTreeMap, HashMap},
    fs::File,
    io::{BufReader, Read},
    path::Path,
};
use tracing::debug;

/// One pressure level of a correction map.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectionLevel {
    /// The table-defined key, kept as written.
    pub key: String,
    /// The key's numeric pressure value.
    pub pressure: HectoPascal,
    /// The correction tabulated at this level.
    pub correction: HectoPascal,
}

/// The two correction maps for one (station, dry-bulb) row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CorrectionRow {
    height: Vec<CorrectionLevel>,
    sea: Vec<CorrectionLevel>,
}

impl CorrectionRow {
    /// The height-difference levels, ascending by pressure.
    #[inline]
    pub fn height_levels(&self) -> &[CorrectionLevel] {
        &self.height
    }

    /// The sea-level-reduction levels, ascending by pressure.
    #[inline]
    pub fn sea_levels(&self) -> &[CorrectionLevel] {
        &self.sea
    }

    /// The height-difference level nearest to `pressure`.
    ///
    /// Equidistant candidates resolve to the lower key; the scan is over the
    /// ascending level order and only a strict improvement moves it.
    #[inline]
    pub fn nearest_height_level(&self, pressure: HectoPascal) -> Option<&CorrectionLevel> {
        nearest_level(&self.height, pressure)
    }

    /// The sea-level-reduction level nearest to `pressure`, same tie rule.
    #[inline]
    pub fn nearest_sea_level(&self, pressure: HectoPascal) -> Option<&CorrectionLevel> {
        nearest_level(&self.sea, pressure)
    }
}

fn nearest_level(levels: &[CorrectionLevel], target: HectoPascal) -> Option<&CorrectionLevel> {
    let mut best: Option<&CorrectionLevel> = None;
    let mut best_abs_diff = f64::MAX;

    for level in levels {
        let abs_diff = (target.unpack() - level.pressure.unpack()).abs();
        if abs_diff < best_abs_diff {
            best_abs_diff = abs_diff;
            best = Some(level);
        } else if abs_diff > best_abs_diff {
            // Levels ascend, so once the distance grows it keeps growing.
            break;
        }
    }

    best
}

/// All correction rows for one station, keyed by rounded dry-bulb °C.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StationCorrections {
    rows: BTreeMap<i32, CorrectionRow>,
}

impl StationCorrections {
    /// The correction row for a whole degree of dry-bulb temperature.
    #[inline]
    pub fn row(&self, dry_bulb: i32) -> Option<&CorrectionRow> {
        self.rows.get(&dry_bulb)
    }
}

/// The correction tables for every station in the register.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StationCorrectionTable {
    stations: HashMap<StationId, StationCorrections>,
}

#[derive(Deserialize)]
struct CorrectionRowFile {
    #[serde(default)]
    height: HashMap<String, f64>,
    #[serde(default)]
    sea: HashMap<String, f64>,
}

impl StationCorrectionTable {
    /// Parse and validate the correction tables from JSON.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TableError> {
        let file: HashMap<String, HashMap<String, CorrectionRowFile>> =
            serde_json::from_reader(reader)?;

        let mut stations = HashMap::with_capacity(file.len());
        for (station_key, file_rows) in file {
            let station: i32 = station_key.parse().map_err(|_| TableError::BadStationKey {
                key: station_key.clone(),
            })?;

            let mut rows = BTreeMap::new();
            for (temperature_key, file_row) in file_rows {
                let dry_bulb: i32 =
                    temperature_key
                        .parse()
                        .map_err(|_| TableError::BadTemperatureKey {
                            key: temperature_key.clone(),
                        })?;

                let row = CorrectionRow {
                    height: build_levels(file_row.height)?,
                    sea: build_levels(file_row.sea)?,
                };
                rows.insert(dry_bulb, row);
            }

            stations.insert(StationId(station), StationCorrections { rows });
        }

        debug!(stations = stations.len(), "loaded station correction tables");

        Ok(StationCorrectionTable { stations })
    }

    /// Load the correction tables from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    /// The corrections for one station.
    #[inline]
    pub fn station(&self, station: StationId) -> Option<&StationCorrections> {
        self.stations.get(&station)
    }
}

fn build_levels(file_map: HashMap<String, f64>) -> Result<Vec<CorrectionLevel>, TableError> {
    let mut levels = file_map
        .into_iter()
        .map(|(key, correction)| {
            let pressure: f64 = key
                .parse()
                .map_err(|_| TableError::BadPressureKey { key: key.clone() })?;
            if !pressure.is_finite() {
                return Err(TableError::BadPressureKey { key });
            }

            Ok(CorrectionLevel {
                key,
                pressure: HectoPascal(pressure),
                correction: HectoPascal(correction),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    // Keys are finite here, so the comparison is total.
    levels.sort_by(|a, b| {
        a.pressure
            .unpack()
            .partial_cmp(&b.pressure.unpack())
            .unwrap_or(Ordering::Equal)
    });

    Ok(levels)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_data::correction_table;

    #[test]
    fn levels_sort_ascending_regardless_of_file_order() {
        let table = correction_table();
        let row = table.station(StationId(48694)).unwrap().row(26).unwrap();

        let keys: Vec<&str> = row.height_levels().iter().map(|l| l.key.as_str()).collect();
        assert_eq!(keys, ["1010", "1012", "1014"]);
    }

    #[test]
    fn nearest_picks_the_closest_level() {
        let table = correction_table();
        let row = table.station(StationId(48694)).unwrap().row(26).unwrap();

        let level = row.nearest_height_level(HectoPascal(1012.4)).unwrap();
        assert_eq!(level.key, "1012");
        assert_eq!(level.correction, HectoPascal(3.40));

        let level = row.nearest_height_level(HectoPascal(900.0)).unwrap();
        assert_eq!(level.key, "1010");

        let level = row.nearest_height_level(HectoPascal(1100.0)).unwrap();
        assert_eq!(level.key, "1014");
    }

    #[test]
    fn tie_prefers_lower_key() {
        let table = correction_table();
        let row = table.station(StationId(48694)).unwrap().row(26).unwrap();

        // 1011.0 is exactly between 1010 and 1012.
        for _ in 0..3 {
            let level = row.nearest_height_level(HectoPascal(1011.0)).unwrap();
            assert_eq!(level.key, "1010");
        }

        // Same rule on the sea map, 1014.5 between 1013 and 1016.
        let level = row.nearest_sea_level(HectoPascal(1014.5)).unwrap();
        assert_eq!(level.key, "1013");
    }

    #[test]
    fn a_missing_map_is_empty_not_an_error() {
        let table = correction_table();
        let row = table.station(StationId(48694)).unwrap().row(27).unwrap();

        assert!(!row.height_levels().is_empty());
        assert!(row.sea_levels().is_empty());
        assert!(row.nearest_sea_level(HectoPascal(1012.0)).is_none());
    }

    #[test]
    fn missing_station_and_row() {
        let table = correction_table();

        assert!(table.station(StationId(99999)).is_none());
        assert!(table.station(StationId(48694)).unwrap().row(40).is_none());
    }

    #[test]
    fn bad_keys_are_rejected() {
        let json = r#"{ "not-a-station": {} }"#;
        let err = StationCorrectionTable::from_reader(json.as_bytes()).unwrap_err();
        assert!(matches!(err, TableError::BadStationKey { .. }));

        let json = r#"{ "48694": { "hot": {} } }"#;
        let err = StationCorrectionTable::from_reader(json.as_bytes()).unwrap_err();
        assert!(matches!(err, TableError::BadTemperatureKey { .. }));

        let json = r#"{ "48694": { "26": { "height": { "about1012": 3.4 } } } }"#;
        let err = StationCorrectionTable::from_reader(json.as_bytes()).unwrap_err();
        assert!(matches!(err, TableError::BadPressureKey { .. }));
    }
}
