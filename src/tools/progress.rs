//! Progress MCP Tools
//!
//! The home/progress summary and a PNG weight trend chart.

use std::path::Path;

use chrono::{Days, NaiveDate};
use serde::Serialize;
use tracing::info;

use crate::db::Database;
use crate::models::{FoodEntry, UserProfile, WeightEntry};
use crate::planner::{
    self, progress::BALANCE_WINDOW_DAYS, CalorieBalance, DayCalories, GoalType, JourneyProgress,
    WeightTrend,
};

/// BMI card on the progress view
#[derive(Debug, Serialize)]
pub struct BmiCard {
    pub bmi: f64,
    pub category: &'static str,
    pub color: &'static str,
}

/// Response for progress_summary
#[derive(Debug, Serialize)]
pub struct ProgressSummary {
    pub user_id: String,
    pub display_name: String,
    pub goal_type: GoalType,
    pub daily_calorie_target: i32,
    pub bmi: BmiCard,
    pub today: DayCalories,
    pub calorie_balance: CalorieBalance,
    pub weight_trend: WeightTrend,
    /// Absent when maintaining or when no pace is set
    pub journey: Option<JourneyProgress>,
    pub start_date: String,
    pub goal_date: Option<String>,
    pub goal_date_display: Option<String>,
}

/// Accepted chart width and height in pixels
pub const CHART_DIMENSION_RANGE: std::ops::RangeInclusive<u32> = 100..=4000;

/// RGB buffer length for a chart, rejecting sizes outside `CHART_DIMENSION_RANGE`
fn chart_buffer_len(width: u32, height: u32) -> Result<usize, String> {
    if !CHART_DIMENSION_RANGE.contains(&width) || !CHART_DIMENSION_RANGE.contains(&height) {
        return Err(format!(
            "Chart size {}x{} out of range; width and height must be {}-{} pixels",
            width,
            height,
            CHART_DIMENSION_RANGE.start(),
            CHART_DIMENSION_RANGE.end()
        ));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(3))
        .ok_or_else(|| format!("Chart size {}x{} too large", width, height))
}

/// Response for generate_weight_chart
#[derive(Debug, Serialize)]
pub struct ChartResponse {
    pub path: String,
    pub points: usize,
    pub bytes: usize,
}

pub fn progress_summary(db: &Database, user_id: &str, today: NaiveDate) -> Result<ProgressSummary, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let profile = UserProfile::get(&conn, user_id)
        .map_err(|e| format!("Failed to get profile: {}", e))?
        .ok_or_else(|| format!("No profile for user '{}'", user_id))?;

    let window_start = today
        .checked_sub_days(Days::new(BALANCE_WINDOW_DAYS - 1))
        .unwrap_or(today);
    let meals = FoodEntry::list_range(&conn, user_id, window_start, today)
        .map_err(|e| format!("Failed to list meals: {}", e))?;
    let weights = WeightEntry::list(&conn, user_id)
        .map_err(|e| format!("Failed to list weights: {}", e))?;

    let meal_calories = || meals.iter().map(|m| (m.date, m.calories as f64));
    let target = profile.daily_calorie_target;

    let bmi = planner::calculate_bmi(profile.current_weight_kg, profile.height_cm);
    let category = planner::get_bmi_category(bmi);
    let goal_type = planner::get_goal_type(profile.current_weight_kg, profile.target_weight_kg);

    let start_date = profile.start_date().unwrap_or(today);
    let goal_date = if goal_type != GoalType::Maintain && profile.progress_rate > 0.0 {
        Some(
            planner::calculate_goal_date(
                profile.current_weight_kg,
                profile.target_weight_kg,
                profile.progress_rate,
                today,
            )
            .map_err(|e| e.to_string())?,
        )
    } else {
        None
    };

    Ok(ProgressSummary {
        user_id: profile.user_id.clone(),
        display_name: profile.display_name.clone(),
        goal_type,
        daily_calorie_target: target,
        bmi: BmiCard {
            bmi: (bmi * 10.0).round() / 10.0,
            category: category.label(),
            color: category.color(),
        },
        today: planner::day_calories(meal_calories(), today, target),
        calorie_balance: planner::calorie_balance(meal_calories(), target, today),
        weight_trend: planner::weight_trend(
            weights.iter().map(|w| (w.date, w.weight_kg)),
            profile.current_weight_kg,
            profile.target_weight_kg,
            profile.units,
        ),
        journey: goal_date.map(|goal| planner::journey_progress(start_date, goal, today)),
        start_date: planner::format_date_iso(start_date),
        goal_date: goal_date.map(planner::format_date_iso),
        goal_date_display: goal_date.map(planner::format_date_long),
    })
}

/// Render logged weights and the goal line as PNG bytes
pub fn render_weight_chart(
    entries: &[WeightEntry],
    trend: &WeightTrend,
    width: u32,
    height: u32,
) -> Result<Vec<u8>, String> {
    use image::{DynamicImage, ImageFormat, RgbImage};
    use plotters::prelude::*;

    let buffer_len = chart_buffer_len(width, height)?;
    if entries.is_empty() {
        return Err("No weight entries to chart".to_string());
    }

    let units = trend.units;
    let y_min = units.weight_from_kg(trend.chart_min_kg);
    let y_max = units.weight_from_kg(trend.chart_max_kg);
    let goal = units.weight_from_kg(trend.goal_weight_kg);
    let x_max = (entries.len() as i32).max(2) - 1;

    let mut buffer = vec![0u8; buffer_len];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(|e| e.to_string())?;

        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(0..x_max, y_min..y_max)
            .map_err(|e| e.to_string())?;

        chart.configure_mesh()
            .x_labels(entries.len().min(10))
            .x_label_formatter(&|x| {
                if *x >= 0 && (*x as usize) < entries.len() {
                    planner::format_date(entries[*x as usize].date)
                } else {
                    String::new()
                }
            })
            .y_desc(trend.unit_label)
            .draw()
            .map_err(|e| e.to_string())?;

        // Goal line
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(0, goal), (x_max, goal)],
            ShapeStyle::from(&RGBColor(0x22, 0xC5, 0x5E)).stroke_width(2),
        )))
        .map_err(|e| e.to_string())?
        .label("Goal")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RGBColor(0x22, 0xC5, 0x5E).stroke_width(2)));

        let points: Vec<(i32, f64)> = entries.iter()
            .enumerate()
            .map(|(i, e)| (i as i32, units.weight_from_kg(e.weight_kg)))
            .collect();

        chart.draw_series(LineSeries::new(
            points.clone(),
            BLUE.stroke_width(2),
        ))
        .map_err(|e| e.to_string())?
        .label("Weight")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.stroke_width(2)));

        chart.draw_series(points.iter().map(|(x, y)| {
            Circle::new((*x, *y), 3, BLUE.filled())
        })).map_err(|e| e.to_string())?;

        chart.configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(|e| e.to_string())?;

        root.present().map_err(|e| e.to_string())?;
    }

    let img = RgbImage::from_raw(width, height, buffer)
        .ok_or("Failed to create image from buffer")?;

    let mut png_bytes = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut png_bytes), ImageFormat::Png)
        .map_err(|e| e.to_string())?;

    Ok(png_bytes)
}

/// Render the weight trend chart and write it to `output_path`
pub fn generate_weight_chart(
    db: &Database,
    user_id: &str,
    output_path: &Path,
    width: u32,
    height: u32,
) -> Result<ChartResponse, String> {
    chart_buffer_len(width, height)?;

    let (entries, trend) = {
        let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

        let profile = UserProfile::get(&conn, user_id)
            .map_err(|e| format!("Failed to get profile: {}", e))?
            .ok_or_else(|| format!("No profile for user '{}'", user_id))?;
        let entries = WeightEntry::list(&conn, user_id)
            .map_err(|e| format!("Failed to list weights: {}", e))?;

        let trend = planner::weight_trend(
            entries.iter().map(|e| (e.date, e.weight_kg)),
            profile.current_weight_kg,
            profile.target_weight_kg,
            profile.units,
        );
        (entries, trend)
    };

    let png = render_weight_chart(&entries, &trend, width, height)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create output directory: {}", e))?;
        }
    }
    std::fs::write(output_path, &png)
        .map_err(|e| format!("Failed to write chart: {}", e))?;

    info!(user_id, path = %output_path.display(), points = entries.len(), "Weight chart written");

    Ok(ChartResponse {
        path: output_path.display().to_string(),
        points: entries.len(),
        bytes: png.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::models::{sample_save, FoodEntryCreate, MealType};
    use crate::planner::BalanceStatus;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2026, 10, 19)
    }

    fn setup() -> Database {
        let db = Database::in_memory().unwrap();
        db.with_conn(run_migrations).unwrap();
        db.with_conn(|conn| UserProfile::save(conn, &sample_save("u1"))).unwrap();
        db
    }

    fn log_meal(db: &Database, calories: i64, day: NaiveDate) {
        let data = FoodEntryCreate {
            id: None,
            food_name: "Meal".to_string(),
            calories,
            meal_type: MealType::Lunch,
            time: None,
            date: day,
        };
        db.with_conn(|conn| FoodEntry::create(conn, "u1", &data)).unwrap();
    }

    #[test]
    fn test_progress_summary() {
        let db = setup();
        log_meal(&db, 1500, today());
        log_meal(&db, 1700, date(2026, 10, 18));
        log_meal(&db, 3000, date(2026, 10, 1));
        db.with_conn(|conn| WeightEntry::upsert(conn, "u1", date(2026, 10, 12), 81.0)).unwrap();
        db.with_conn(|conn| WeightEntry::upsert(conn, "u1", today(), 80.0)).unwrap();

        let summary = progress_summary(&db, "u1", today()).unwrap();
        assert_eq!(summary.goal_type, GoalType::Lose);
        assert_eq!(summary.bmi.category, "Healthy");
        assert_eq!(summary.today.consumed, 1500.0);
        assert_eq!(summary.calorie_balance.days_with_data, 2);
        assert_eq!(summary.calorie_balance.average_calories, 1600.0);
        assert_eq!(summary.calorie_balance.status, BalanceStatus::Balanced);
        assert_eq!(summary.weight_trend.start_weight_kg, 81.0);
        assert_eq!(summary.weight_trend.latest_weight_kg, 80.0);
        assert_eq!(summary.goal_date.as_deref(), Some("2026-12-28"));
        assert!(summary.journey.is_some());
    }

    #[test]
    fn test_progress_summary_maintain_has_no_journey() {
        let db = setup();
        let mut data = sample_save("u2");
        data.target_weight_kg = 80.2;
        db.with_conn(|conn| UserProfile::save(conn, &data)).unwrap();

        let summary = progress_summary(&db, "u2", today()).unwrap();
        assert_eq!(summary.goal_type, GoalType::Maintain);
        assert!(summary.journey.is_none());
        assert!(summary.goal_date.is_none());
        assert_eq!(summary.calorie_balance.status, BalanceStatus::NoData);
    }

    #[test]
    fn test_progress_summary_unknown_user() {
        let db = setup();
        assert!(progress_summary(&db, "ghost", today()).is_err());
    }

    #[test]
    fn test_weight_chart_writes_png() {
        let db = setup();
        db.with_conn(|conn| WeightEntry::upsert(conn, "u1", date(2026, 10, 5), 81.2)).unwrap();
        db.with_conn(|conn| WeightEntry::upsert(conn, "u1", date(2026, 10, 12), 80.6)).unwrap();
        db.with_conn(|conn| WeightEntry::upsert(conn, "u1", today(), 79.9)).unwrap();

        let dir = std::env::temp_dir().join(format!("gulper_chart_{}", std::process::id()));
        let path = dir.join("weight.png");
        let response = generate_weight_chart(&db, "u1", &path, 400, 300).unwrap();

        assert_eq!(response.points, 3);
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes.len(), response.bytes);
        assert!(bytes.starts_with(b"\x89PNG"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_weight_chart_rejects_out_of_range_size() {
        let db = setup();
        db.with_conn(|conn| WeightEntry::upsert(conn, "u1", today(), 79.9)).unwrap();
        let path = std::env::temp_dir().join("gulper_oversized_chart.png");

        assert!(generate_weight_chart(&db, "u1", &path, 70_000, 70_000).is_err());
        assert!(generate_weight_chart(&db, "u1", &path, 0, 0).is_err());
        assert!(generate_weight_chart(&db, "u1", &path, 400, 99).is_err());
        assert!(!path.exists());

        let entries = db.with_conn(|conn| WeightEntry::list(conn, "u1")).unwrap();
        let trend = planner::weight_trend(
            entries.iter().map(|e| (e.date, e.weight_kg)),
            80.0,
            75.0,
            planner::UnitSystem::Metric,
        );
        assert!(render_weight_chart(&entries, &trend, u32::MAX, u32::MAX).is_err());
    }

    #[test]
    fn test_chart_buffer_len() {
        assert_eq!(chart_buffer_len(100, 100).unwrap(), 30_000);
        assert_eq!(chart_buffer_len(4000, 4000).unwrap(), 48_000_000);
        assert!(chart_buffer_len(4001, 100).is_err());
    }

    #[test]
    fn test_weight_chart_requires_entries() {
        let db = setup();
        let path = std::env::temp_dir().join("gulper_empty_chart.png");
        assert!(generate_weight_chart(&db, "u1", &path, 400, 300).is_err());
    }
}
