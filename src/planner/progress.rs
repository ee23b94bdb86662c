//! Progress summaries
//!
//! Aggregations behind the home and progress views: journey progress, the
//! seven-day calorie balance, weight trend and calories left for a day.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use super::calculations::get_days_difference;
use super::profile::UnitSystem;

/// Number of days the calorie balance looks back over, including today
pub const BALANCE_WINDOW_DAYS: u64 = 7;

/// Relative deviation from target still reported as balanced
pub const BALANCED_TOLERANCE: f64 = 0.05;

/// Padding above and below the weight trend chart (kg)
pub const TREND_PADDING_KG: f64 = 3.0;

const COLOR_EATING_LESS: (u8, u8, u8) = (0x22, 0xD3, 0xEE); // cyan
const COLOR_BALANCED: (u8, u8, u8) = (0x22, 0xC5, 0x5E); // green
const COLOR_EATING_MORE: (u8, u8, u8) = (0xEF, 0x44, 0x44); // red

// ============================================================================
// Journey
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct JourneyProgress {
    pub total_days: i64,
    pub elapsed_days: i64,
    /// Fraction of the journey completed, 0.0-1.0
    pub fraction: f64,
    /// 1-based day counter, never past the last day
    pub day_number: i64,
}

pub fn journey_progress(start: NaiveDate, goal: NaiveDate, today: NaiveDate) -> JourneyProgress {
    let total_days = get_days_difference(start, goal);
    let elapsed_days = get_days_difference(start, today);

    let fraction = if total_days == 0 {
        1.0
    } else {
        (elapsed_days as f64 / total_days as f64).max(0.0).min(1.0)
    };
    let day_number = (elapsed_days + 1).min(total_days).max(1);

    JourneyProgress {
        total_days,
        elapsed_days,
        fraction,
        day_number,
    }
}

// ============================================================================
// Calorie Balance
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceStatus {
    EatingLess,
    Balanced,
    EatingMore,
    NoData,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalorieBalance {
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    pub days_with_data: usize,
    pub average_calories: f64,
    pub target_calories: i32,
    /// (average - target) / target, clamped to -1.0..=1.0
    pub balance: f64,
    /// Position on the less/more track, 0.0 (less) to 1.0 (more)
    pub indicator_position: f64,
    pub indicator_color: String,
    pub status: BalanceStatus,
}

fn interpolate_color(from: (u8, u8, u8), to: (u8, u8, u8), factor: f64) -> (u8, u8, u8) {
    let channel = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * factor).round() as u8;
    (
        channel(from.0, to.0),
        channel(from.1, to.1),
        channel(from.2, to.2),
    )
}

/// Indicator color along the cyan -> green -> red track
pub fn balance_color(position: f64) -> String {
    let position = position.max(0.0).min(1.0);
    let (r, g, b) = if position <= 0.5 {
        interpolate_color(COLOR_EATING_LESS, COLOR_BALANCED, position * 2.0)
    } else {
        interpolate_color(COLOR_BALANCED, COLOR_EATING_MORE, (position - 0.5) * 2.0)
    };
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

/// Average intake over the last seven days against the daily target.
///
/// Days with no logged calories are left out of the average.
pub fn calorie_balance<I>(entries: I, target_calories: i32, today: NaiveDate) -> CalorieBalance
where
    I: IntoIterator<Item = (NaiveDate, f64)>,
{
    let window_start = today
        .checked_sub_days(Days::new(BALANCE_WINDOW_DAYS - 1))
        .unwrap_or(today);

    let mut daily_totals = [0.0_f64; BALANCE_WINDOW_DAYS as usize];
    for (date, calories) in entries {
        if date < window_start || date > today {
            continue;
        }
        let index = (date - window_start).num_days() as usize;
        daily_totals[index] += calories;
    }

    let days_with_data = daily_totals.iter().filter(|c| **c > 0.0).count();
    let average_calories = if days_with_data > 0 {
        daily_totals.iter().sum::<f64>() / days_with_data as f64
    } else {
        0.0
    };

    let (balance, status) = if days_with_data == 0 || target_calories <= 0 {
        (0.0, BalanceStatus::NoData)
    } else {
        let target = target_calories as f64;
        let balance = ((average_calories - target) / target).max(-1.0).min(1.0);
        let status = if balance.abs() < BALANCED_TOLERANCE {
            BalanceStatus::Balanced
        } else if balance < 0.0 {
            BalanceStatus::EatingLess
        } else {
            BalanceStatus::EatingMore
        };
        (balance, status)
    };

    let indicator_position = 0.5 + balance * 0.5;

    CalorieBalance {
        window_start,
        window_end: today,
        days_with_data,
        average_calories,
        target_calories,
        balance,
        indicator_position,
        indicator_color: balance_color(indicator_position),
        status,
    }
}

// ============================================================================
// Weight Trend
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct WeightTrend {
    pub units: UnitSystem,
    pub unit_label: &'static str,
    pub start_weight_kg: f64,
    pub latest_weight_kg: f64,
    pub goal_weight_kg: f64,
    pub start_display: i64,
    pub latest_display: i64,
    pub goal_display: i64,
    pub is_gaining: bool,
    /// Signed change since the start (kg)
    pub change_kg: f64,
    /// Absolute distance still to go (kg)
    pub remaining_kg: f64,
    /// Lower and upper chart bounds (kg)
    pub chart_min_kg: f64,
    pub chart_max_kg: f64,
    pub log_count: usize,
}

/// Summarize logged weights against the goal.
///
/// Start is the earliest log (or the profile weight when nothing is logged);
/// latest is the most recent log (or the start).
pub fn weight_trend<I>(
    logs: I,
    profile_weight_kg: f64,
    goal_weight_kg: f64,
    units: UnitSystem,
) -> WeightTrend
where
    I: IntoIterator<Item = (NaiveDate, f64)>,
{
    let mut sorted: Vec<(NaiveDate, f64)> = logs.into_iter().collect();
    sorted.sort_by_key(|(date, _)| *date);

    let start_weight_kg = sorted.first().map(|(_, w)| *w).unwrap_or(profile_weight_kg);
    let latest_weight_kg = sorted.last().map(|(_, w)| *w).unwrap_or(start_weight_kg);

    let all_weights = sorted
        .iter()
        .map(|(_, w)| *w)
        .chain([start_weight_kg, latest_weight_kg, goal_weight_kg]);
    let (min, max) = all_weights.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), w| {
        (lo.min(w), hi.max(w))
    });

    WeightTrend {
        units,
        unit_label: units.weight_unit(),
        start_weight_kg,
        latest_weight_kg,
        goal_weight_kg,
        start_display: units.display_weight(start_weight_kg),
        latest_display: units.display_weight(latest_weight_kg),
        goal_display: units.display_weight(goal_weight_kg),
        is_gaining: goal_weight_kg > start_weight_kg,
        change_kg: latest_weight_kg - start_weight_kg,
        remaining_kg: (goal_weight_kg - latest_weight_kg).abs(),
        chart_min_kg: min - TREND_PADDING_KG,
        chart_max_kg: max + TREND_PADDING_KG,
        log_count: sorted.len(),
    }
}

// ============================================================================
// Day Calories
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct DayCalories {
    pub date: NaiveDate,
    pub consumed: f64,
    pub target: i32,
    /// Target minus consumed; negative when over
    pub remaining: f64,
    pub over_target: bool,
}

pub fn day_calories<I>(entries: I, date: NaiveDate, target: i32) -> DayCalories
where
    I: IntoIterator<Item = (NaiveDate, f64)>,
{
    let consumed: f64 = entries
        .into_iter()
        .filter(|(d, _)| *d == date)
        .map(|(_, c)| c)
        .sum();
    let remaining = target as f64 - consumed;

    DayCalories {
        date,
        consumed,
        target,
        remaining,
        over_target: remaining < 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2026, 10, 19)
    }

    #[test]
    fn test_journey_midway() {
        let j = journey_progress(date(2026, 10, 1), date(2026, 10, 31), date(2026, 10, 16));
        assert_eq!(j.total_days, 30);
        assert_eq!(j.elapsed_days, 15);
        assert!((j.fraction - 0.5).abs() < 1e-9);
        assert_eq!(j.day_number, 16);
    }

    #[test]
    fn test_journey_past_goal_and_zero_length() {
        let j = journey_progress(date(2026, 10, 1), date(2026, 10, 11), date(2026, 11, 1));
        assert_eq!(j.fraction, 1.0);
        assert_eq!(j.day_number, 10);

        let j = journey_progress(today(), today(), today());
        assert_eq!(j.total_days, 0);
        assert_eq!(j.fraction, 1.0);
        assert_eq!(j.day_number, 1);
    }

    #[test]
    fn test_balance_averages_days_with_data() {
        let entries = vec![
            (date(2026, 10, 19), 1000.0),
            (date(2026, 10, 19), 600.0),
            (date(2026, 10, 17), 1600.0),
            // outside the window
            (date(2026, 10, 12), 5000.0),
            (date(2026, 10, 20), 5000.0),
        ];
        let b = calorie_balance(entries, 2000, today());
        assert_eq!(b.window_start, date(2026, 10, 13));
        assert_eq!(b.days_with_data, 2);
        assert!((b.average_calories - 1600.0).abs() < 1e-9);
        assert!((b.balance + 0.2).abs() < 1e-9);
        assert!((b.indicator_position - 0.4).abs() < 1e-9);
        assert_eq!(b.status, BalanceStatus::EatingLess);
    }

    #[test]
    fn test_balance_clamps_and_no_data() {
        let b = calorie_balance(vec![(today(), 9000.0)], 2000, today());
        assert_eq!(b.balance, 1.0);
        assert_eq!(b.indicator_position, 1.0);
        assert_eq!(b.indicator_color, "#ef4444");
        assert_eq!(b.status, BalanceStatus::EatingMore);

        let empty = calorie_balance(Vec::new(), 2000, today());
        assert_eq!(empty.status, BalanceStatus::NoData);
        assert_eq!(empty.indicator_position, 0.5);
        assert_eq!(empty.indicator_color, "#22c55e");
    }

    #[test]
    fn test_balance_color_ends() {
        assert_eq!(balance_color(0.0), "#22d3ee");
        assert_eq!(balance_color(0.5), "#22c55e");
        assert_eq!(balance_color(1.0), "#ef4444");
    }

    #[test]
    fn test_weight_trend_with_logs() {
        let logs = vec![
            (date(2026, 10, 10), 78.0),
            (date(2026, 10, 1), 80.0),
            (date(2026, 10, 18), 77.2),
        ];
        let t = weight_trend(logs, 76.0, 72.0, UnitSystem::Metric);
        assert_eq!(t.start_weight_kg, 80.0);
        assert_eq!(t.latest_weight_kg, 77.2);
        assert!(!t.is_gaining);
        assert!((t.change_kg + 2.8).abs() < 1e-9);
        assert!((t.remaining_kg - 5.2).abs() < 1e-9);
        assert_eq!(t.chart_min_kg, 69.0);
        assert_eq!(t.chart_max_kg, 83.0);
        assert_eq!(t.log_count, 3);
    }

    #[test]
    fn test_weight_trend_without_logs_imperial() {
        let t = weight_trend(Vec::new(), 60.0, 65.0, UnitSystem::Imperial);
        assert_eq!(t.start_weight_kg, 60.0);
        assert_eq!(t.latest_weight_kg, 60.0);
        assert!(t.is_gaining);
        assert_eq!(t.unit_label, "lb");
        assert_eq!(t.start_display, 132);
        assert_eq!(t.goal_display, 143);
    }

    #[test]
    fn test_day_calories() {
        let entries = vec![(today(), 800.0), (today(), 700.0), (date(2026, 10, 18), 900.0)];
        let d = day_calories(entries, today(), 1400);
        assert_eq!(d.consumed, 1500.0);
        assert_eq!(d.remaining, -100.0);
        assert!(d.over_target);
    }
}
