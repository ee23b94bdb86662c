//! Calorie and weight planning calculations
//!
//! BMR/TDEE estimation, daily calorie targets, goal-date projection and the
//! inverse pace-from-date calculation. Every function is pure; anything that
//! depends on "now" takes `today` explicitly.

use chrono::{Datelike, Days, NaiveDate};

use super::profile::{
    ActivityLevel, BmiCategory, CalorieProfile, Gender, GoalType, PlannerError, PlannerResult,
};

// ============================================================================
// Constants
// ============================================================================

/// Energy equivalent of one kilogram of body mass (kcal)
pub const KCAL_PER_KG: f64 = 7700.0;

/// Goal/current differences below this are treated as maintenance (kg)
pub const MAINTAIN_THRESHOLD_KG: f64 = 0.5;

/// Upper bound for any daily calorie target
pub const MAX_DAILY_CALORIES: i32 = 4000;

/// Pace bounds used when deriving a pace from a target date (kg/week)
pub const MIN_PACE_KG_PER_WEEK: f64 = 0.1;
pub const MAX_PACE_KG_PER_WEEK: f64 = 1.0;

// ============================================================================
// Body Metrics
// ============================================================================

/// Age in whole years on `today`. The birthday itself counts.
pub fn calculate_age(birth_date: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth_date.year();
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        age -= 1;
    }
    age
}

/// Body mass index, unrounded
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

/// Each threshold is strict-less-than, so boundary values land in the higher band.
pub fn get_bmi_category(bmi: f64) -> BmiCategory {
    if bmi < 18.5 {
        BmiCategory::Underweight
    } else if bmi < 25.0 {
        BmiCategory::Healthy
    } else if bmi < 30.0 {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    }
}

pub fn get_activity_multiplier(activity_level: ActivityLevel) -> f64 {
    activity_level.multiplier()
}

// ============================================================================
// Energy Expenditure
// ============================================================================

fn mifflin_st_jeor(weight_kg: f64, height_cm: f64, age: i32, offset: f64) -> f64 {
    10.0 * weight_kg + 6.25 * height_cm - 5.0 * age as f64 + offset
}

/// Basal metabolic rate (Mifflin-St Jeor), kcal/day
///
/// `Other` uses the mean of the male and female equations.
pub fn calculate_bmr(profile: &CalorieProfile, today: NaiveDate) -> f64 {
    let age = calculate_age(profile.date_of_birth, today);
    let male = mifflin_st_jeor(profile.current_weight, profile.height, age, 5.0);
    let female = mifflin_st_jeor(profile.current_weight, profile.height, age, -161.0);

    match profile.gender {
        Gender::Male => male,
        Gender::Female => female,
        Gender::Other => (male + female) / 2.0,
    }
}

/// Total daily energy expenditure, kcal/day
pub fn calculate_tdee(profile: &CalorieProfile, today: NaiveDate) -> f64 {
    calculate_bmr(profile, today) * get_activity_multiplier(profile.activity_level)
}

pub fn get_goal_type(current_kg: f64, goal_kg: f64) -> GoalType {
    let diff = goal_kg - current_kg;
    if diff.abs() < MAINTAIN_THRESHOLD_KG {
        GoalType::Maintain
    } else if diff < 0.0 {
        GoalType::Lose
    } else {
        GoalType::Gain
    }
}

/// Daily surplus or deficit implied by a pace, kcal/day
pub fn calculate_daily_delta(pace_kg_per_week: f64) -> f64 {
    pace_kg_per_week * KCAL_PER_KG / 7.0
}

/// Daily calorie target, rounded then clamped to the safety range for the
/// profile's gender.
pub fn calculate_daily_calorie_target(profile: &CalorieProfile, today: NaiveDate) -> i32 {
    let tdee = calculate_tdee(profile, today);
    let daily_delta = calculate_daily_delta(profile.progress_rate.abs());

    let target = match get_goal_type(profile.current_weight, profile.target_weight) {
        GoalType::Lose => tdee - daily_delta,
        GoalType::Gain => tdee + daily_delta,
        GoalType::Maintain => tdee,
    };

    let min_calories = profile.gender.min_daily_calories();
    let rounded = if target.is_finite() {
        target.round() as i32
    } else {
        min_calories
    };
    rounded.max(min_calories).min(MAX_DAILY_CALORIES)
}

// ============================================================================
// Timeline
// ============================================================================

fn weeks_needed(current_kg: f64, goal_kg: f64, pace_kg_per_week: f64) -> PlannerResult<f64> {
    if !pace_kg_per_week.is_finite() || pace_kg_per_week <= 0.0 {
        return Err(PlannerError::InvalidPace(pace_kg_per_week));
    }
    Ok((goal_kg - current_kg).abs() / pace_kg_per_week)
}

/// Projected date the goal weight is reached at the given pace
pub fn calculate_goal_date(
    current_kg: f64,
    goal_kg: f64,
    pace_kg_per_week: f64,
    today: NaiveDate,
) -> PlannerResult<NaiveDate> {
    let weeks = weeks_needed(current_kg, goal_kg, pace_kg_per_week)?;
    let days = (weeks * 7.0).round();
    if !days.is_finite() || days > u32::MAX as f64 {
        return Err(PlannerError::DateOutOfRange);
    }

    today
        .checked_add_days(Days::new(days as u64))
        .ok_or(PlannerError::DateOutOfRange)
}

/// Whole weeks to goal, rounded up
pub fn calculate_weeks_to_goal(
    current_kg: f64,
    goal_kg: f64,
    pace_kg_per_week: f64,
) -> PlannerResult<i64> {
    let weeks = weeks_needed(current_kg, goal_kg, pace_kg_per_week)?;
    if weeks > i64::MAX as f64 {
        return Err(PlannerError::DateOutOfRange);
    }
    Ok(weeks.ceil() as i64)
}

/// Pace needed to reach the goal by `target_date`, clamped to 0.1-1.0 kg/week.
///
/// A target date of today or earlier counts as one day away.
pub fn calculate_pace_from_date(
    current_kg: f64,
    goal_kg: f64,
    target_date: NaiveDate,
    today: NaiveDate,
) -> f64 {
    let days = (target_date - today).num_days().max(1);
    let weeks = days as f64 / 7.0;
    let pace = (goal_kg - current_kg).abs() / weeks;
    pace.max(MIN_PACE_KG_PER_WEEK).min(MAX_PACE_KG_PER_WEEK)
}

/// Absolute number of days between two dates
pub fn get_days_difference(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days().abs()
}
