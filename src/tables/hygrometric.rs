//! The hygrometric table: tabulated dew point and relative humidity by
//! rounded dry-bulb temperature and wet-bulb depression.
//!
//! Stations normally supply a digitized issue of the national hygrometric
//! table. Where no issue exists one can be computed for the station's mean
//! pressure from the psychrometer formula in the WMO CIMO Guide; the computed
//! grid has the same shape and precision as the printed one, tenths of a
//! degree for dew point and whole percent for humidity.

use crate::{encoding::round_to_tenths, error::TableError};
use itertools::Itertools;
use metfor::{Celsius, CelsiusDiff, HectoPascal};
use serde::Deserialize;
use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufReader, Read},
    path::Path,
};
use tracing::debug;

/// A single tabulated psychrometric solution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HygrometricPoint {
    /// Dew point temperature.
    pub dew_point: Celsius,
    /// Relative humidity in percent.
    pub relative_humidity: f64,
}

/// The hygrometric reference table.
///
/// One strictly ascending sequence of wet-bulb depressions is shared by every
/// row; each row belongs to a whole degree of dry-bulb temperature and holds
/// one cell per depression, in the same order. A `None` cell is a gap in the
/// printed table, a combination it does not tabulate.
#[derive(Debug, Clone, PartialEq)]
pub struct HygrometricTable {
    differences: Vec<CelsiusDiff>,
    rows: BTreeMap<i32, Vec<Option<HygrometricPoint>>>,
}

#[derive(Deserialize)]
struct HygrometricTableFile {
    differences: Vec<f64>,
    rows: BTreeMap<String, Vec<Option<(f64, f64)>>>,
}

/// Constants of the WMO CIMO Guide psychrometer formula for an aspirated
/// instrument, hPa and °C units.
const PSYCHROMETER_A: f64 = 6.53e-4;
const PSYCHROMETER_B: f64 = 9.44e-4;

impl HygrometricTable {
    /// Build a table from its parts, checking the structural invariants.
    ///
    /// The depression sequence must be strictly ascending and every row must
    /// have exactly one cell per depression.
    pub fn new(
        differences: Vec<CelsiusDiff>,
        rows: BTreeMap<i32, Vec<Option<HygrometricPoint>>>,
    ) -> Result<Self, TableError> {
        if !differences.iter().tuple_windows().all(|(a, b)| a < b) {
            return Err(TableError::UnorderedDifferences);
        }

        for (&dry_bulb, row) in &rows {
            if row.len() != differences.len() {
                return Err(TableError::MisalignedRow {
                    dry_bulb,
                    expected: differences.len(),
                    got: row.len(),
                });
            }
        }

        Ok(HygrometricTable { differences, rows })
    }

    /// Parse and validate a table from JSON.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TableError> {
        let file: HygrometricTableFile = serde_json::from_reader(reader)?;

        let differences = file.differences.into_iter().map(CelsiusDiff).collect();

        let mut rows = BTreeMap::new();
        for (key, cells) in file.rows {
            let dry_bulb: i32 = key
                .parse()
                .map_err(|_| TableError::BadTemperatureKey { key: key.clone() })?;

            let cells = cells
                .into_iter()
                .map(|cell| {
                    cell.map(|(dew_point, relative_humidity)| HygrometricPoint {
                        dew_point: Celsius(dew_point),
                        relative_humidity,
                    })
                })
                .collect();

            rows.insert(dry_bulb, cells);
        }

        let table = Self::new(differences, rows)?;
        debug!(
            rows = table.rows.len(),
            differences = table.differences.len(),
            "loaded hygrometric table"
        );

        Ok(table)
    }

    /// Load a table from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    /// Compute the full 0..=50 °C by 0.0..=30.0 °C grid for a station
    /// pressure from the psychrometer formula.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use metfor::{Celsius, CelsiusDiff, HectoPascal};
    /// use synop_reduction::HygrometricTable;
    ///
    /// let table = HygrometricTable::computed(HectoPascal(1000.0));
    ///
    /// // A dry and a wet bulb reading the same means saturation.
    /// let idx = table.index_of(CelsiusDiff(0.0)).unwrap();
    /// let point = table.point(25, idx).unwrap();
    /// assert_eq!(point.dew_point, Celsius(25.0));
    /// assert_eq!(point.relative_humidity, 100.0);
    /// ```
    pub fn computed(station_pressure: HectoPascal) -> Self {
        let differences: Vec<CelsiusDiff> = (0..=300)
            .map(|tenths| CelsiusDiff(f64::from(tenths) / 10.0))
            .collect();

        let mut rows = BTreeMap::new();
        for dry_bulb in 0..=50 {
            let cells = differences
                .iter()
                .map(|&spread| {
                    psychrometric_point(Celsius(f64::from(dry_bulb)), spread, station_pressure)
                })
                .collect();
            rows.insert(dry_bulb, cells);
        }

        HygrometricTable { differences, rows }
    }

    /// The shared wet-bulb depression sequence.
    #[inline]
    pub fn differences(&self) -> &[CelsiusDiff] {
        &self.differences
    }

    /// Position of `spread` in the depression sequence, by exact match.
    ///
    /// There is no interpolation anywhere in this table; a depression between
    /// two tabulated values is simply not found.
    #[inline]
    pub fn index_of(&self, spread: CelsiusDiff) -> Option<usize> {
        self.differences.iter().position(|&d| d == spread)
    }

    /// The row for a whole degree of dry-bulb temperature.
    #[inline]
    pub fn row(&self, dry_bulb: i32) -> Option<&[Option<HygrometricPoint>]> {
        self.rows.get(&dry_bulb).map(|row| row.as_slice())
    }

    /// The cell for a dry-bulb row at a depression index.
    #[inline]
    pub fn point(&self, dry_bulb: i32, index: usize) -> Option<HygrometricPoint> {
        self.rows
            .get(&dry_bulb)
            .and_then(|row| row.get(index).copied().flatten())
    }
}

/// Solve the psychrometer formula for one cell of the computed table.
///
/// Returns `None` where the formula has no physical solution, which is the
/// computed analogue of a gap in the printed table.
fn psychrometric_point(
    dry_bulb: Celsius,
    spread: CelsiusDiff,
    pressure: HectoPascal,
) -> Option<HygrometricPoint> {
    let Celsius(t) = dry_bulb;
    let CelsiusDiff(s) = spread;
    let HectoPascal(p) = pressure;

    // A zero depression is saturation: e = es(T), and the dew point is the
    // dry bulb itself. The inversion below can drift a few ULPs past its
    // 50 °C ceiling, so the saturated cell is written directly.
    if s == 0.0 {
        return Some(HygrometricPoint {
            dew_point: Celsius(round_to_tenths(t)),
            relative_humidity: 100.0,
        });
    }

    let wet_bulb = Celsius(t - s);
    let HectoPascal(sat_vap_wet) = metfor::vapor_pressure_water(wet_bulb)?;

    // e = es(Tw) - A (1 + B Tw) P (T - Tw)
    let vap = sat_vap_wet - PSYCHROMETER_A * (1.0 + PSYCHROMETER_B * (t - s)) * p * s;
    if vap <= 0.0 {
        return None;
    }

    let HectoPascal(sat_vap) = metfor::vapor_pressure_water(dry_bulb)?;
    let relative_humidity = (100.0 * vap / sat_vap).round();

    let mw = metfor::epsilon * vap / (p - vap);
    let Celsius(dew_point) = metfor::dew_point_from_p_and_mw(pressure, mw)?;

    Some(HygrometricPoint {
        dew_point: Celsius(round_to_tenths(dew_point)),
        relative_humidity,
    })
}
