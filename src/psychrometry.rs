//! Dew point and relative humidity from psychrometer readings.

use crate::{
    encoding::{nearest_degree, round_to_tenths},
    error::{ReductionError, Result},
    tables::{HygrometricPoint, HygrometricTable},
};
use metfor::{Celsius, CelsiusDiff, Quantity};

/// Look up the tabulated dew point and relative humidity for a pair of
/// psychrometer readings.
///
/// The table is authoritative, no formula is evaluated here: the wet-bulb
/// depression is rounded to tenths and matched exactly against the table's
/// depression sequence, and the cell at that position of the rounded
/// dry-bulb row is returned as printed. A depression that falls between
/// tabulated values is a lookup failure, not an interpolation.
pub fn dew_point_and_rh(
    dry_bulb: Celsius,
    wet_bulb: Celsius,
    table: &HygrometricTable,
) -> Result<HygrometricPoint> {
    const MIN_DRY_BULB: i32 = 0;
    const MAX_DRY_BULB: i32 = 50;
    const MAX_SPREAD: CelsiusDiff = CelsiusDiff(30.0);

    let spread = CelsiusDiff(round_to_tenths(
        (dry_bulb.unpack() - wet_bulb.unpack()).abs(),
    ));
    let rounded_dry_bulb = nearest_degree(dry_bulb);

    if rounded_dry_bulb < MIN_DRY_BULB || rounded_dry_bulb > MAX_DRY_BULB {
        return Err(ReductionError::DryBulbOutOfRange(rounded_dry_bulb));
    }

    if spread > MAX_SPREAD {
        return Err(ReductionError::SpreadOutOfRange(spread));
    }

    let index = table
        .index_of(spread)
        .ok_or(ReductionError::UntabulatedSpread(spread))?;

    let row = table
        .row(rounded_dry_bulb)
        .ok_or(ReductionError::UntabulatedDryBulb(rounded_dry_bulb))?;

    row.get(index)
        .copied()
        .flatten()
        .ok_or(ReductionError::UntabulatedSpread(spread))
}
