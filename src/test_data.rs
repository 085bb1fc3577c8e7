//! Data used in tests.

use crate::tables::{HygrometricTable, StationCorrectionTable};

/// A small hygrometric table with the shapes the tests need: a gap cell, a
/// spread between tabulated values, and a missing row.
pub const HYGROMETRIC_JSON: &str = r#"{
    "differences": [0.0, 0.1, 2.6, 3.0],
    "rows": {
        "23": [[23.0, 100.0], [22.9, 99.0], [20.8, 78.0], [20.1, 75.0]],
        "26": [[26.0, 100.0], [25.9, 99.0], [23.8, 80.0], [23.1, 77.0]],
        "27": [[27.0, 100.0], [26.9, 99.0], [24.9, 81.0], null]
    }
}"#;

/// Correction tables for three stations. Station 48694 has a full row at
/// 26 °C and a height-only row at 27 °C; station 48674 has corrections whose
/// sums do not survive re-encoding unchanged.
pub const CORRECTIONS_JSON: &str = r#"{
    "48694": {
        "26": {
            "height": { "1012": 3.40, "1010": 3.39, "1014": 3.41 },
            "sea":    { "1013": 0.90, "1016": 0.92 }
        },
        "27": {
            "height": { "1012": 3.45 }
        }
    },
    "48698": {
        "26": {
            "height": { "1008": 2.10, "1012": 2.12 },
            "sea":    { "1010": 1.50, "1014": 1.52 }
        }
    },
    "48674": {
        "26": {
            "height": { "1012": 3.43 },
            "sea":    { "1013": 0.92 }
        }
    }
}"#;

pub fn hygrometric_table() -> HygrometricTable {
    HygrometricTable::from_reader(HYGROMETRIC_JSON.as_bytes()).unwrap()
}

pub fn correction_table() -> StationCorrectionTable {
    StationCorrectionTable::from_reader(CORRECTIONS_JSON.as_bytes()).unwrap()
}

pub fn approx_equal(tgt: f64, guess: f64, tol: f64) -> bool {
    assert!(tol > 0.0);

    f64::abs(tgt - guess) <= tol
}
