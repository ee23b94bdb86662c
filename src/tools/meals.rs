//! Meal MCP Tools
//!
//! Logging, editing and listing meals, and the per-day view grouped by meal slot.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;

use crate::db::Database;
use crate::models::{FoodEntry, FoodEntryCreate, FoodEntryUpdate, MealType, UserProfile};
use crate::planner::{self, validate::validate_meal, DayCalories};

/// Response for delete_meal
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub id: String,
}

/// Meals for one slot of a day
#[derive(Debug, Serialize)]
pub struct MealGroup {
    pub meal_type: MealType,
    pub total_calories: i64,
    pub entries: Vec<FoodEntry>,
}

/// Response for get_day
#[derive(Debug, Serialize)]
pub struct DayResponse {
    pub date: String,
    pub date_display: String,
    pub meals: Vec<MealGroup>,
    pub calories: DayCalories,
}

const MEAL_ORDER: [MealType; 4] = [
    MealType::Breakfast,
    MealType::Lunch,
    MealType::Dinner,
    MealType::Snack,
];

/// Log a meal. The name is trimmed and calories are range checked.
pub fn add_meal(db: &Database, user_id: &str, mut data: FoodEntryCreate) -> Result<FoodEntry, String> {
    data.food_name = validate_meal(&data.food_name, data.calories).map_err(|e| {
        warn!(user_id, error = %e, "Rejected meal");
        e.to_string()
    })?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    FoodEntry::create(&conn, user_id, &data).map_err(|e| format!("Failed to log meal: {}", e))
}

pub fn update_meal(
    db: &Database,
    user_id: &str,
    id: &str,
    mut data: FoodEntryUpdate,
) -> Result<Option<FoodEntry>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    if data.food_name.is_some() || data.calories.is_some() {
        let existing = FoodEntry::get(&conn, user_id, id)
            .map_err(|e| format!("Failed to get meal: {}", e))?;
        let Some(existing) = existing else {
            return Ok(None);
        };

        let name = data.food_name.as_deref().unwrap_or(&existing.food_name);
        let calories = data.calories.unwrap_or(existing.calories);
        let name = validate_meal(name, calories).map_err(|e| {
            warn!(user_id, id, error = %e, "Rejected meal update");
            e.to_string()
        })?;
        if data.food_name.is_some() {
            data.food_name = Some(name);
        }
    }

    FoodEntry::update(&conn, user_id, id, &data).map_err(|e| format!("Failed to update meal: {}", e))
}

pub fn delete_meal(db: &Database, user_id: &str, id: &str) -> Result<DeleteResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let success = FoodEntry::delete(&conn, user_id, id)
        .map_err(|e| format!("Failed to delete meal: {}", e))?;

    Ok(DeleteResponse {
        success,
        id: id.to_string(),
    })
}

/// List meals newest first, or only those on `date` when given
pub fn list_meals(
    db: &Database,
    user_id: &str,
    date: Option<NaiveDate>,
    limit: Option<i64>,
    offset: Option<i64>,
) -> Result<Vec<FoodEntry>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    match date {
        Some(date) => FoodEntry::list_for_date(&conn, user_id, date),
        None => FoodEntry::list(&conn, user_id, limit.unwrap_or(100), offset.unwrap_or(0)),
    }
    .map_err(|e| format!("Failed to list meals: {}", e))
}

/// Meals for a day grouped by slot, with calories left against the target
pub fn get_day(db: &Database, user_id: &str, date: NaiveDate) -> Result<DayResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let profile = UserProfile::get(&conn, user_id)
        .map_err(|e| format!("Failed to get profile: {}", e))?
        .ok_or_else(|| format!("No profile for user '{}'", user_id))?;

    let entries = FoodEntry::list_for_date(&conn, user_id, date)
        .map_err(|e| format!("Failed to list meals: {}", e))?;

    let calories = planner::day_calories(
        entries.iter().map(|e| (e.date, e.calories as f64)),
        date,
        profile.daily_calorie_target,
    );

    let meals = MEAL_ORDER
        .iter()
        .map(|meal_type| {
            let group: Vec<FoodEntry> = entries
                .iter()
                .filter(|e| e.meal_type == *meal_type)
                .cloned()
                .collect();
            MealGroup {
                meal_type: *meal_type,
                total_calories: group.iter().map(|e| e.calories).sum(),
                entries: group,
            }
        })
        .collect();

    Ok(DayResponse {
        date: planner::format_date_iso(date),
        date_display: planner::format_date(date),
        meals,
        calories,
    })
}
