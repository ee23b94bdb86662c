//! Plan MCP Tools
//!
//! Stateless planning views used during onboarding: the "plan ready" summary
//! and the pace needed to hit a chosen date.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;

use crate::planner::{
    self, calculations::calculate_daily_delta, CalorieProfile, GoalType, UnitSystem,
};

/// Response for preview_plan
#[derive(Debug, Serialize)]
pub struct PlanPreview {
    pub age: i32,
    pub bmi: f64,
    pub bmi_category: &'static str,
    pub bmi_color: &'static str,
    pub bmr: f64,
    pub tdee: f64,
    pub activity_multiplier: f64,
    pub goal_type: GoalType,
    pub daily_delta: f64,
    pub daily_calorie_target: i32,
    /// None when maintaining or when no pace is set
    pub weeks_to_goal: Option<i64>,
    pub goal_date: Option<String>,
    pub goal_date_long: Option<String>,
    pub height_display: String,
    pub current_weight_display: i64,
    pub target_weight_display: i64,
    pub weight_unit: &'static str,
}

/// Response for pace_for_date
#[derive(Debug, Serialize)]
pub struct PaceForDateResponse {
    pub pace_kg_per_week: f64,
    /// Pace in the user's units per week, one decimal
    pub pace_display: String,
    pub weeks_to_goal: i64,
    pub goal_date: String,
    pub goal_date_long: String,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Build the full plan for a profile. Validates the profile first.
pub fn preview_plan(
    profile: &CalorieProfile,
    units: UnitSystem,
    today: NaiveDate,
) -> Result<PlanPreview, String> {
    profile.validate(today).map_err(|e| {
        warn!(error = %e, "Rejected plan preview");
        e.to_string()
    })?;

    let bmi = planner::calculate_bmi(profile.current_weight, profile.height);
    let category = planner::get_bmi_category(bmi);
    let goal_type = planner::get_goal_type(profile.current_weight, profile.target_weight);

    let timeline = if goal_type != GoalType::Maintain && profile.progress_rate > 0.0 {
        let weeks = planner::calculate_weeks_to_goal(
            profile.current_weight,
            profile.target_weight,
            profile.progress_rate,
        )
        .map_err(|e| e.to_string())?;
        let date = planner::calculate_goal_date(
            profile.current_weight,
            profile.target_weight,
            profile.progress_rate,
            today,
        )
        .map_err(|e| e.to_string())?;
        Some((weeks, date))
    } else {
        None
    };

    Ok(PlanPreview {
        age: planner::calculate_age(profile.date_of_birth, today),
        bmi: round1(bmi),
        bmi_category: category.label(),
        bmi_color: category.color(),
        bmr: planner::calculate_bmr(profile, today).round(),
        tdee: planner::calculate_tdee(profile, today).round(),
        activity_multiplier: planner::get_activity_multiplier(profile.activity_level),
        goal_type,
        daily_delta: calculate_daily_delta(profile.progress_rate).round(),
        daily_calorie_target: planner::calculate_daily_calorie_target(profile, today),
        weeks_to_goal: timeline.map(|(weeks, _)| weeks),
        goal_date: timeline.map(|(_, date)| planner::format_date_iso(date)),
        goal_date_long: timeline.map(|(_, date)| planner::format_date_long(date)),
        height_display: units.format_height(profile.height),
        current_weight_display: units.display_weight(profile.current_weight),
        target_weight_display: units.display_weight(profile.target_weight),
        weight_unit: units.weight_unit(),
    })
}

/// Pace needed to reach `goal_kg` by `target_date`, and the timeline it implies
pub fn pace_for_date(
    current_kg: f64,
    goal_kg: f64,
    target_date: NaiveDate,
    units: UnitSystem,
    today: NaiveDate,
) -> Result<PaceForDateResponse, String> {
    planner::validate::validate_weight("current_weight", current_kg).map_err(|e| e.to_string())?;
    planner::validate::validate_weight("target_weight", goal_kg).map_err(|e| e.to_string())?;

    let pace = planner::calculate_pace_from_date(current_kg, goal_kg, target_date, today);
    let weeks = planner::calculate_weeks_to_goal(current_kg, goal_kg, pace).map_err(|e| e.to_string())?;
    let goal_date = planner::calculate_goal_date(current_kg, goal_kg, pace, today)
        .map_err(|e| e.to_string())?;

    Ok(PaceForDateResponse {
        pace_kg_per_week: pace,
        pace_display: format!("{:.1} {}/week", units.weight_from_kg(pace), units.weight_unit()),
        weeks_to_goal: weeks,
        goal_date: planner::format_date_iso(goal_date),
        goal_date_long: planner::format_date_long(goal_date),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::{ActivityLevel, Gender};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn profile() -> CalorieProfile {
        CalorieProfile {
            gender: Gender::Male,
            activity_level: ActivityLevel::Sedentary,
            height: 180.0,
            current_weight: 80.0,
            date_of_birth: NaiveDate::from_ymd_opt(1996, 10, 19).unwrap(),
            target_weight: 75.0,
            progress_rate: 0.5,
        }
    }

    #[test]
    fn test_preview_plan_lose() {
        let plan = preview_plan(&profile(), UnitSystem::Metric, today()).unwrap();
        assert_eq!(plan.age, 30);
        assert_eq!(plan.bmi, 24.7);
        assert_eq!(plan.bmi_category, "Healthy");
        assert_eq!(plan.bmr, 1780.0);
        assert_eq!(plan.tdee, 2136.0);
        assert_eq!(plan.goal_type, GoalType::Lose);
        assert_eq!(plan.daily_delta, 550.0);
        assert_eq!(plan.daily_calorie_target, 1586);
        assert_eq!(plan.weeks_to_goal, Some(10));
        assert_eq!(plan.goal_date.as_deref(), Some("2026-12-28"));
        assert_eq!(plan.goal_date_long.as_deref(), Some("December 28, 2026"));
        assert_eq!(plan.height_display, "180 cm");
    }

    #[test]
    fn test_preview_plan_maintain_has_no_timeline() {
        let mut p = profile();
        p.target_weight = 80.3;
        let plan = preview_plan(&p, UnitSystem::Imperial, today()).unwrap();
        assert_eq!(plan.goal_type, GoalType::Maintain);
        assert_eq!(plan.weeks_to_goal, None);
        assert_eq!(plan.goal_date, None);
        assert_eq!(plan.weight_unit, "lb");
        assert_eq!(plan.height_display, "5'11\"");
    }

    #[test]
    fn test_preview_plan_rejects_invalid_profile() {
        let mut p = profile();
        p.date_of_birth = today();
        assert!(preview_plan(&p, UnitSystem::Metric, today()).is_err());
    }

    #[test]
    fn test_pace_for_date() {
        let target = NaiveDate::from_ymd_opt(2026, 12, 28).unwrap();
        let result = pace_for_date(80.0, 75.0, target, UnitSystem::Metric, today()).unwrap();
        assert!((result.pace_kg_per_week - 0.5).abs() < 1e-9);
        assert_eq!(result.pace_display, "0.5 kg/week");
        assert_eq!(result.weeks_to_goal, 10);
        assert_eq!(result.goal_date, "2026-12-28");
    }
}
