use crate::error::Result;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Round `value` to `dp` decimal places with an exact 5 in the next
/// position rounding up, not to even.
pub fn round_to_nearest(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Load and deserialize a UTF-8 JSON file.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

/// Index of the rightmost threshold that is `<= value` in an ascending
/// table, or `None` when `value` lies below the first entry.
pub fn scan_thresholds(values: &[Decimal], value: Decimal) -> Option<usize> {
    values.partition_point(|v| *v <= value).checked_sub(1)
}

/// Index of the first threshold that is `>= value` in an ascending table,
/// clamped to the last entry.
pub fn scan_thresholds_left(values: &[Decimal], value: Decimal) -> Option<usize> {
    if values.is_empty() {
        return None;
    }
    Some(values.partition_point(|v| *v < value).min(values.len() - 1))
}
