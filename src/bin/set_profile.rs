//! Utility to seed a profile in the database
//! Usage: cargo run --bin set_profile -- <gender> <height_cm> <weight_kg> <date_of_birth> <target_kg> <pace_kg_per_week> [activity] [units]

use gulper::models::UserProfileSave;
use gulper::planner::{self, ActivityLevel, Clock, Gender, SystemClock, UnitSystem};

const USAGE: &str = "Usage: set_profile <gender> <height_cm> <weight_kg> <date_of_birth> <target_kg> <pace_kg_per_week> [activity] [units]";

fn arg<'a>(args: &'a [String], index: usize, name: &str) -> Result<&'a str, String> {
    args.get(index)
        .map(|s| s.as_str())
        .ok_or_else(|| format!("Missing {}\n{}", name, USAGE))
}

fn number(args: &[String], index: usize, name: &str) -> Result<f64, String> {
    arg(args, index, name)?
        .parse()
        .map_err(|_| format!("{} must be a number", name))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let gender_arg = arg(&args, 0, "gender")?;
    let gender = Gender::from_str(gender_arg)
        .ok_or_else(|| format!("Unknown gender '{}'", gender_arg))?;
    let data = UserProfileSave {
        user_id: gulper::config::default_user_id(),
        display_name: String::new(),
        email: String::new(),
        photo_url: None,
        gender,
        activity_level: args.get(6).map(|s| ActivityLevel::from_str(s)).unwrap_or_default(),
        height_cm: number(&args, 1, "height_cm")?,
        current_weight_kg: number(&args, 2, "weight_kg")?,
        units: args.get(7).map(|s| UnitSystem::from_str(s)).unwrap_or_default(),
        date_of_birth: planner::parse_date_iso(arg(&args, 3, "date_of_birth")?)?,
        target_weight_kg: number(&args, 4, "target_kg")?,
        progress_rate: number(&args, 5, "pace_kg_per_week")?,
        motivations: Vec::new(),
        daily_calorie_target: 0,
    };

    let db_path = gulper::config::database_path();
    println!("Database path: {}", db_path.display());
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = gulper::db::Database::new(&db_path)?;
    database.with_conn(gulper::db::migrations::run_migrations)?;

    let saved = gulper::tools::profile::save_profile(&database, data, SystemClock.today())?;
    println!("Profile set:");
    println!("  User: {}", saved.profile.user_id);
    println!("  Height: {}", saved.height_display);
    println!("  Weight: {} {}", saved.current_weight_display, saved.weight_unit);
    println!("  Target: {} {}", saved.target_weight_display, saved.weight_unit);
    println!("  BMI: {} ({})", saved.bmi, saved.bmi_category);
    println!("  Daily calorie target: {}", saved.profile.daily_calorie_target);

    Ok(())
}
