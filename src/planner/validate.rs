//! Input validation
//!
//! Range checks applied once at the tool boundary. The calculation functions
//! themselves stay unchecked.

use chrono::NaiveDate;

use super::profile::{CalorieProfile, PlannerError, PlannerResult};

pub const MIN_HEIGHT_CM: f64 = 100.0;
pub const MAX_HEIGHT_CM: f64 = 250.0;
pub const MIN_WEIGHT_KG: f64 = 20.0;
pub const MAX_WEIGHT_KG: f64 = 500.0;
pub const MAX_PROGRESS_RATE: f64 = 1.0;
pub const MAX_MEAL_NAME_LEN: usize = 100;
pub const MIN_MEAL_CALORIES: i64 = 1;
pub const MAX_MEAL_CALORIES: i64 = 10_000;

fn check_range(field: &'static str, value: f64, min: f64, max: f64, unit: &str) -> PlannerResult<()> {
    if !value.is_finite() || value < min || value > max {
        return Err(PlannerError::InvalidInput {
            field,
            reason: format!("must be between {} and {} {}, got {}", min, max, unit, value),
        });
    }
    Ok(())
}

pub fn validate_weight(field: &'static str, weight_kg: f64) -> PlannerResult<()> {
    check_range(field, weight_kg, MIN_WEIGHT_KG, MAX_WEIGHT_KG, "kg")
}

pub fn validate_height(height_cm: f64) -> PlannerResult<()> {
    check_range("height", height_cm, MIN_HEIGHT_CM, MAX_HEIGHT_CM, "cm")
}

pub fn validate_progress_rate(rate: f64) -> PlannerResult<()> {
    check_range("progress_rate", rate, 0.0, MAX_PROGRESS_RATE, "kg/week")
}

pub fn validate_birth_date(date_of_birth: NaiveDate, today: NaiveDate) -> PlannerResult<()> {
    if date_of_birth >= today {
        return Err(PlannerError::InvalidInput {
            field: "date_of_birth",
            reason: format!("must be in the past, got {}", date_of_birth),
        });
    }
    Ok(())
}

/// Validate a meal before it is logged. Returns the trimmed name.
pub fn validate_meal(name: &str, calories: i64) -> PlannerResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(PlannerError::InvalidInput {
            field: "food_name",
            reason: "must not be empty".to_string(),
        });
    }
    if trimmed.chars().count() > MAX_MEAL_NAME_LEN {
        return Err(PlannerError::InvalidInput {
            field: "food_name",
            reason: format!("must be under {} characters", MAX_MEAL_NAME_LEN),
        });
    }
    if !(MIN_MEAL_CALORIES..=MAX_MEAL_CALORIES).contains(&calories) {
        return Err(PlannerError::InvalidInput {
            field: "calories",
            reason: format!(
                "must be between {} and {}, got {}",
                MIN_MEAL_CALORIES, MAX_MEAL_CALORIES, calories
            ),
        });
    }
    Ok(trimmed.to_string())
}

impl CalorieProfile {
    /// Check every field against plausible human ranges
    pub fn validate(&self, today: NaiveDate) -> PlannerResult<()> {
        validate_height(self.height)?;
        validate_weight("current_weight", self.current_weight)?;
        validate_weight("target_weight", self.target_weight)?;
        validate_progress_rate(self.progress_rate)?;
        validate_birth_date(self.date_of_birth, today)?;
        Ok(())
    }
}
