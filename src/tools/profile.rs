//! Profile MCP Tools
//!
//! Saving profiles, onboarding status and weight logging. Every change to
//! the inputs of the calorie target recomputes and stores the target.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use crate::db::Database;
use crate::models::{UserProfile, UserProfileSave, WeightEntry};
use crate::planner::{self, validate::validate_weight, UnitSystem};

/// Response for save_profile and get_profile
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub profile: UserProfile,
    pub bmi: f64,
    pub bmi_category: &'static str,
    pub height_display: String,
    pub current_weight_display: i64,
    pub target_weight_display: i64,
    pub weight_unit: &'static str,
    /// Most recent weigh-in, if any
    pub latest_weight: Option<WeightEntry>,
}

impl ProfileResponse {
    fn from_profile(profile: UserProfile, latest_weight: Option<WeightEntry>) -> Self {
        let units = profile.units;
        let bmi = planner::calculate_bmi(profile.current_weight_kg, profile.height_cm);
        Self {
            bmi: (bmi * 10.0).round() / 10.0,
            bmi_category: planner::get_bmi_category(bmi).label(),
            height_display: units.format_height(profile.height_cm),
            current_weight_display: units.display_weight(profile.current_weight_kg),
            target_weight_display: units.display_weight(profile.target_weight_kg),
            weight_unit: units.weight_unit(),
            latest_weight,
            profile,
        }
    }
}

/// Response for log_weight
#[derive(Debug, Serialize)]
pub struct LogWeightResponse {
    pub date: String,
    pub weight_kg: f64,
    pub weight_display: String,
    pub previous_calorie_target: i32,
    pub daily_calorie_target: i32,
}

/// Response for recalculate_target
#[derive(Debug, Serialize)]
pub struct RecalculateTargetResponse {
    pub user_id: String,
    pub previous_calorie_target: i32,
    pub daily_calorie_target: i32,
    pub changed: bool,
}

/// Response for onboarding and delete operations
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub user_id: String,
}

/// Validate, compute the calorie target, and store the profile
pub fn save_profile(
    db: &Database,
    mut data: UserProfileSave,
    today: NaiveDate,
) -> Result<ProfileResponse, String> {
    let calorie_profile = data.calorie_profile();
    calorie_profile.validate(today).map_err(|e| {
        warn!(user_id = %data.user_id, error = %e, "Rejected profile");
        e.to_string()
    })?;

    data.daily_calorie_target = planner::calculate_daily_calorie_target(&calorie_profile, today);

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let profile = UserProfile::save(&conn, &data)
        .map_err(|e| format!("Failed to save profile: {}", e))?;
    let latest_weight = WeightEntry::latest(&conn, &profile.user_id)
        .map_err(|e| format!("Failed to get latest weight: {}", e))?;

    info!(
        user_id = %profile.user_id,
        daily_calorie_target = profile.daily_calorie_target,
        "Profile saved"
    );
    Ok(ProfileResponse::from_profile(profile, latest_weight))
}

pub fn get_profile(db: &Database, user_id: &str) -> Result<Option<ProfileResponse>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let Some(profile) = UserProfile::get(&conn, user_id)
        .map_err(|e| format!("Failed to get profile: {}", e))?
    else {
        return Ok(None);
    };
    let latest_weight = WeightEntry::latest(&conn, user_id)
        .map_err(|e| format!("Failed to get latest weight: {}", e))?;

    Ok(Some(ProfileResponse::from_profile(profile, latest_weight)))
}

pub fn complete_onboarding(db: &Database, user_id: &str) -> Result<SuccessResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let success = UserProfile::set_onboarding_complete(&conn, user_id, true)
        .map_err(|e| format!("Failed to update onboarding status: {}", e))?;

    Ok(SuccessResponse {
        success,
        user_id: user_id.to_string(),
    })
}

/// Log today's weight, update the profile weight and recompute the target
pub fn log_weight(
    db: &Database,
    user_id: &str,
    weight: f64,
    units: Option<UnitSystem>,
    today: NaiveDate,
) -> Result<LogWeightResponse, String> {
    let mut conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let tx = conn
        .transaction()
        .map_err(|e| format!("Database error: {}", e))?;

    let mut profile = UserProfile::get(&tx, user_id)
        .map_err(|e| format!("Failed to get profile: {}", e))?
        .ok_or_else(|| format!("No profile for user '{}'", user_id))?;

    let units = units.unwrap_or(profile.units);
    let weight_kg = units.weight_to_kg(weight);
    validate_weight("weight", weight_kg).map_err(|e| {
        warn!(user_id, error = %e, "Rejected weight");
        e.to_string()
    })?;

    // Weight entry, profile weight and target are written together or not at all
    let entry = WeightEntry::upsert(&tx, user_id, today, weight_kg)
        .map_err(|e| format!("Failed to save weight: {}", e))?;

    UserProfile::update_current_weight(&tx, user_id, weight_kg)
        .map_err(|e| format!("Failed to update profile weight: {}", e))?;

    let previous = profile.daily_calorie_target;
    profile.current_weight_kg = weight_kg;
    let target = planner::calculate_daily_calorie_target(&profile.calorie_profile(), today);
    if target != previous {
        UserProfile::set_daily_calorie_target(&tx, user_id, target)
            .map_err(|e| format!("Failed to update calorie target: {}", e))?;
    }

    tx.commit()
        .map_err(|e| format!("Failed to commit weigh-in: {}", e))?;
    if target != previous {
        info!(user_id, previous, target, "Calorie target changed after weigh-in");
    }

    Ok(LogWeightResponse {
        date: planner::format_date_iso(entry.date),
        weight_kg: entry.weight_kg,
        weight_display: format!("{:.1} {}", units.weight_from_kg(entry.weight_kg), units.weight_unit()),
        previous_calorie_target: previous,
        daily_calorie_target: target,
    })
}

/// Recompute and store the calorie target from the stored profile
pub fn recalculate_target(
    db: &Database,
    user_id: &str,
    today: NaiveDate,
) -> Result<RecalculateTargetResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let profile = UserProfile::get(&conn, user_id)
        .map_err(|e| format!("Failed to get profile: {}", e))?
        .ok_or_else(|| format!("No profile for user '{}'", user_id))?;

    let previous = profile.daily_calorie_target;
    let target = planner::calculate_daily_calorie_target(&profile.calorie_profile(), today);
    if target != previous {
        UserProfile::set_daily_calorie_target(&conn, user_id, target)
            .map_err(|e| format!("Failed to update calorie target: {}", e))?;
    }

    Ok(RecalculateTargetResponse {
        user_id: user_id.to_string(),
        previous_calorie_target: previous,
        daily_calorie_target: target,
        changed: target != previous,
    })
}

/// Delete the profile and every meal and weight entry
pub fn clear_data(db: &Database, user_id: &str) -> Result<SuccessResponse, String> {
    let success = db
        .with_conn_mut(|conn| UserProfile::clear_all_data(conn, user_id))
        .map_err(|e| format!("Failed to clear data: {}", e))?;

    if success {
        info!(user_id, "Cleared all user data");
    }

    Ok(SuccessResponse {
        success,
        user_id: user_id.to_string(),
    })
}
