use crate::error::{ReportError, Result};
use crate::table::Table;

pub const RANK: &str = "Rank";
pub const VEHICLE: &str = "Vehicle";
pub const DRIVER: &str = "Driver";
pub const TIME: &str = "Time";
pub const POWER_WEIGHT: &str = "PS / KG";

/// Columns every trial-results report needs.
pub const TRIAL_COLUMNS: &[&str] = &[RANK, VEHICLE, DRIVER, TIME];

/// Columns the power-to-weight report needs.
pub const POWER_WEIGHT_COLUMNS: &[&str] = &[RANK, VEHICLE, DRIVER, TIME, POWER_WEIGHT];

/// Check that `table` carries every column in `required`.
///
/// All missing names are collected, in the order they were required, so the
/// operator sees the full list at once.
pub fn validate(table: &Table, required: &[&str]) -> Result<()> {
    let missing: Vec<String> = required
        .iter()
        .filter(|name| !table.has_column(name))
        .map(|name| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ReportError::Schema { missing })
    }
}
