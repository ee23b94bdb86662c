//! Data models
//!
//! Rust structs representing database entities.

mod food_entry;
mod user_profile;
mod weight_entry;

pub use food_entry::{FoodEntry, FoodEntryCreate, FoodEntryUpdate, MealType};
pub use user_profile::{UserProfile, UserProfileSave};
pub use weight_entry::WeightEntry;

#[cfg(test)]
pub(crate) use user_profile::sample_save;

use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::Row;

use crate::planner::format_date_iso;

/// Read an ISO date column
pub(crate) fn read_date(row: &Row, column: &str) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(column)?;
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|e| {
        let index = row.as_ref().column_index(column).unwrap_or(0);
        rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e))
    })
}

/// Store dates as ISO text so they sort and compare lexically
pub(crate) fn date_param(date: NaiveDate) -> String {
    format_date_iso(date)
}
