//! Calorie and weight planner
//!
//! Pure calculations: BMI, BMR/TDEE, daily calorie targets, goal timelines,
//! unit conversions, date formatting and progress summaries.

pub mod calculations;
pub mod clock;
pub mod format;
pub mod profile;
pub mod progress;
pub mod units;
pub mod validate;

pub use calculations::{
    calculate_age, calculate_bmi, calculate_bmr, calculate_daily_calorie_target,
    calculate_goal_date, calculate_pace_from_date, calculate_tdee, calculate_weeks_to_goal,
    get_activity_multiplier, get_bmi_category, get_days_difference, get_goal_type,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use format::{format_date, format_date_iso, format_date_long, format_datetime_iso, parse_date_iso};
pub use profile::{
    ActivityLevel, BmiCategory, CalorieProfile, Gender, GoalType, PlannerError, PlannerResult,
    UnitSystem,
};
pub use progress::{
    calorie_balance, day_calories, journey_progress, weight_trend, BalanceStatus, CalorieBalance,
    DayCalories, JourneyProgress, WeightTrend,
};
pub use units::{
    cm_to_feet_inches, cm_to_inches, feet_inches_to_cm, inches_to_cm, kg_to_lbs, lbs_to_kg,
    FeetInches,
};
