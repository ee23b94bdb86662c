//! Planner input types
//!
//! Biometric profile and the enums the calculations branch on.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Planner error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlannerError {
    #[error("Pace must be a positive number of kg per week, got {0}")]
    InvalidPace(f64),

    #[error("Projected date is outside the supported calendar range")]
    DateOutOfRange,

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },
}

/// Result type for planner operations
pub type PlannerResult<T> = Result<T, PlannerError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Some(Gender::Male),
            "female" | "f" => Some(Gender::Female),
            "other" => Some(Gender::Other),
            _ => None,
        }
    }

    /// Minimum daily calorie target for this gender
    pub fn min_daily_calories(&self) -> i32 {
        match self {
            Gender::Male => 1500,
            Gender::Female | Gender::Other => 1200,
        }
    }
}

/// Activity level, chosen from weekly workout count during onboarding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    /// 0-2 workouts per week
    #[default]
    Sedentary,
    /// 3-5 workouts per week
    Light,
    /// 6+ workouts per week
    Active,
}

impl ActivityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Active => "active",
        }
    }

    /// Parse from string. Anything unrecognised is treated as sedentary.
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "light" => ActivityLevel::Light,
            "active" => ActivityLevel::Active,
            _ => ActivityLevel::Sedentary,
        }
    }

    /// TDEE multiplier applied to BMR
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Active => 1.55,
        }
    }
}

/// Direction of the weight goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalType {
    Lose,
    Gain,
    Maintain,
}

impl GoalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalType::Lose => "lose",
            GoalType::Gain => "gain",
            GoalType::Maintain => "maintain",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BmiCategory {
    Underweight,
    Healthy,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Healthy => "Healthy",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }

    /// Display color used by the BMI card
    pub fn color(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "#60A5FA",
            BmiCategory::Healthy => "#5EC26A",
            BmiCategory::Overweight => "#FBBF24",
            BmiCategory::Obese => "#EF4444",
        }
    }
}

/// Unit system the user picked for display
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "imperial" | "us" => UnitSystem::Imperial,
            _ => UnitSystem::Metric,
        }
    }

    pub fn weight_unit(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "kg",
            UnitSystem::Imperial => "lb",
        }
    }
}

/// Biometric inputs for a single planning calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalorieProfile {
    pub gender: Gender,
    pub activity_level: ActivityLevel,
    /// Centimeters
    pub height: f64,
    /// Kilograms
    pub current_weight: f64,
    pub date_of_birth: NaiveDate,
    /// Kilograms
    pub target_weight: f64,
    /// Kilograms per week, magnitude only
    pub progress_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_level_fallback() {
        assert_eq!(ActivityLevel::from_str("light"), ActivityLevel::Light);
        assert_eq!(ActivityLevel::from_str("ACTIVE"), ActivityLevel::Active);
        assert_eq!(ActivityLevel::from_str("extreme"), ActivityLevel::Sedentary);
        assert_eq!(ActivityLevel::from_str(""), ActivityLevel::Sedentary);
    }

    #[test]
    fn test_gender_minimums() {
        assert_eq!(Gender::Male.min_daily_calories(), 1500);
        assert_eq!(Gender::Female.min_daily_calories(), 1200);
        assert_eq!(Gender::Other.min_daily_calories(), 1200);
        assert_eq!(Gender::from_str("nonbinary"), None);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&ActivityLevel::Light).unwrap();
        assert_eq!(json, "\"light\"");
        let gender: Gender = serde_json::from_str("\"other\"").unwrap();
        assert_eq!(gender, Gender::Other);
    }
}
