//! Unit conversions
//!
//! Weight and height conversions between metric and imperial. Conversions are
//! exact (no clamping); only `cm_to_feet_inches` rounds.

use serde::{Deserialize, Serialize};

use super::profile::UnitSystem;

// ============================================================================
// Conversion Constants
// ============================================================================

/// Pounds per kilogram
pub const LBS_PER_KG: f64 = 2.20462;
/// Centimeters per inch
pub const CM_PER_INCH: f64 = 2.54;
/// Inches per foot
pub const INCHES_PER_FOOT: i32 = 12;

pub fn kg_to_lbs(kg: f64) -> f64 {
    kg * LBS_PER_KG
}

pub fn lbs_to_kg(lbs: f64) -> f64 {
    lbs / LBS_PER_KG
}

pub fn cm_to_inches(cm: f64) -> f64 {
    cm / CM_PER_INCH
}

pub fn inches_to_cm(inches: f64) -> f64 {
    inches * CM_PER_INCH
}

/// Height expressed as feet and whole inches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeetInches {
    pub feet: i32,
    pub inches: i32,
}

impl std::fmt::Display for FeetInches {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}'{}\"", self.feet, self.inches)
    }
}

/// Convert centimeters to feet and rounded inches.
///
/// When the inch remainder rounds up to 12 it carries into the feet, so the
/// result is always in 0..=11 inches (182 cm is 6'0", not 5'12").
pub fn cm_to_feet_inches(cm: f64) -> FeetInches {
    let total_inches = cm_to_inches(cm);
    let mut feet = (total_inches / INCHES_PER_FOOT as f64).floor() as i32;
    let mut inches = (total_inches % INCHES_PER_FOOT as f64).round() as i32;

    if inches == INCHES_PER_FOOT {
        feet += 1;
        inches = 0;
    }

    FeetInches { feet, inches }
}

pub fn feet_inches_to_cm(feet: f64, inches: f64) -> f64 {
    (feet * INCHES_PER_FOOT as f64 + inches) * CM_PER_INCH
}

impl UnitSystem {
    /// Weight in this unit system, unrounded
    pub fn weight_from_kg(&self, kg: f64) -> f64 {
        match self {
            UnitSystem::Metric => kg,
            UnitSystem::Imperial => kg_to_lbs(kg),
        }
    }

    /// Weight rounded to a whole number for display
    pub fn display_weight(&self, kg: f64) -> i64 {
        self.weight_from_kg(kg).round() as i64
    }

    /// Convert a user-entered weight in this unit system to kilograms
    pub fn weight_to_kg(&self, value: f64) -> f64 {
        match self {
            UnitSystem::Metric => value,
            UnitSystem::Imperial => lbs_to_kg(value),
        }
    }

    /// Format a height for display, e.g. "182 cm" or "6'0\""
    pub fn format_height(&self, cm: f64) -> String {
        match self {
            UnitSystem::Metric => format!("{} cm", cm.round() as i64),
            UnitSystem::Imperial => cm_to_feet_inches(cm).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_round_trip() {
        for kg in [0.5, 40.0, 72.3, 150.0, 499.9] {
            let back = lbs_to_kg(kg_to_lbs(kg));
            assert!(((back - kg) / kg).abs() < 1e-9);
        }
    }

    #[test]
    fn test_height_conversions() {
        assert!((cm_to_inches(254.0) - 100.0).abs() < 1e-9);
        assert!((inches_to_cm(10.0) - 25.4).abs() < 1e-9);
        assert!((feet_inches_to_cm(6.0, 0.0) - 182.88).abs() < 1e-9);
        assert!((feet_inches_to_cm(5.0, 11.0) - 180.34).abs() < 1e-9);
    }

    #[test]
    fn test_feet_inches_carry() {
        // 71.65 in: 5 ft + 11.65 in rounds to 12 and carries
        assert_eq!(cm_to_feet_inches(182.0), FeetInches { feet: 6, inches: 0 });
    }

    #[test]
    fn test_feet_inches_no_carry() {
        assert_eq!(cm_to_feet_inches(175.0), FeetInches { feet: 5, inches: 9 });
        assert_eq!(cm_to_feet_inches(152.4), FeetInches { feet: 5, inches: 0 });
        assert_eq!(cm_to_feet_inches(180.34).to_string(), "5'11\"");
    }

    #[test]
    fn test_unit_system_weights() {
        assert_eq!(UnitSystem::Metric.display_weight(80.4), 80);
        assert_eq!(UnitSystem::Imperial.display_weight(80.0), 176);
        assert!((UnitSystem::Imperial.weight_to_kg(220.462) - 100.0).abs() < 1e-9);
        assert_eq!(UnitSystem::Metric.weight_to_kg(70.0), 70.0);
    }

    #[test]
    fn test_format_height() {
        assert_eq!(UnitSystem::Metric.format_height(181.6), "182 cm");
        assert_eq!(UnitSystem::Imperial.format_height(182.0), "6'0\"");
    }
}
