//! Recompute the stored daily calorie target for every user
//! Usage: cargo run --bin recalculate_targets -- [today]

use gulper::models::UserProfile;
use gulper::planner::{self, Clock, SystemClock};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let today = match std::env::args().nth(1) {
        Some(s) => planner::parse_date_iso(&s)?,
        None => SystemClock.today(),
    };

    let db_path = gulper::config::database_path();
    println!("Database: {}", db_path.display());

    let database = gulper::db::Database::new(&db_path)?;
    database.with_conn(gulper::db::migrations::run_migrations)?;

    let user_ids = database.with_conn(UserProfile::list_user_ids)?;
    println!("Found {} users", user_ids.len());

    let mut changed = 0;
    for user_id in &user_ids {
        let result = gulper::tools::profile::recalculate_target(&database, user_id, today)?;
        if result.changed {
            changed += 1;
            println!(
                "  {}: {} -> {} kcal",
                user_id, result.previous_calorie_target, result.daily_calorie_target
            );
        } else {
            println!("  {}: {} kcal (unchanged)", user_id, result.daily_calorie_target);
        }
    }

    println!("\nUpdated {} of {} targets", changed, user_ids.len());
    Ok(())
}
