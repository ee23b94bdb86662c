//! Gulper Status Tool
//!
//! Runtime status of the service and the usage guide handed to assistants.

use rusqlite::Connection;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::db::{migrations, DbResult};

/// Usage guide for AI assistants
pub const GULPER_INSTRUCTIONS: &str = r#"
# Gulper Instructions

Gulper plans a daily calorie target from a user's body, activity level and
weight goal, then tracks meals and weigh-ins against it.

## Getting the Current Date

All dates are ISO `YYYY-MM-DD`. Tools that need "today" use the server's
local date unless a `today` parameter is given. Pass `today` when the user
is in a different time zone from the server.

---

## Onboarding

1. `preview_plan` - show the plan before anything is stored. Returns BMI,
   BMR, TDEE, goal type, daily calorie target and the goal date.
2. `pace_for_date` - when the user picks a finish date instead of a pace,
   this returns the weekly pace (clamped to 0.1-1.0 kg/week) to pass as
   `progress_rate`.
3. `save_profile` - stores the profile. The daily calorie target is always
   computed by the server; any value you send is ignored.
4. `complete_onboarding` - marks onboarding as done.

### Profile fields

| Field | Values |
|-------|--------|
| gender | `male`, `female`, `other` |
| activity_level | `sedentary`, `light`, `active` |
| units | `metric`, `imperial` (display only, inputs are metric) |
| height_cm | 100-250 |
| current_weight_kg, target_weight_kg | 20-500 |
| progress_rate | 0-1.0 kg/week |
| date_of_birth | before today |

### How the target is computed

- BMR: Mifflin-St Jeor (`10w + 6.25h - 5a`, +5 male, -161 female, the
  average of both for other)
- TDEE: BMR x 1.2 / 1.375 / 1.55 for sedentary / light / active
- Daily delta: pace x 7700 / 7 kcal, subtracted to lose, added to gain
- Within 0.5 kg of the goal the user is maintaining and eats at TDEE
- Clamped to at least 1500 kcal (male) or 1200 kcal (female/other), and at
  most 4000 kcal

---

## Daily Use

- `add_meal` - name (1-100 chars) and calories (1-10000). Meal type is
  `breakfast`, `lunch`, `dinner` or `snack`.
- `update_meal`, `delete_meal`, `list_meals`
- `get_day` - meals grouped by type with calories consumed and remaining.
- `log_weight` - one reading per day; logging again replaces it. Also
  updates the profile weight and recomputes the calorie target.

## Progress

- `progress_summary` - BMI card, today's calories, the 7-day calorie
  balance, weight trend and journey progress toward the goal date.
- `generate_weight_chart` - writes a PNG of logged weights and the goal
  line to the given path.

## Notes

- The calorie balance averages only days with logged meals. Within 5% of
  the target counts as balanced.
- `recalculate_target` recomputes the stored target after rule changes.
- `clear_data` deletes the profile, meals and weights. It cannot be undone;
  confirm with the user first.
"#;

/// Status information
#[derive(Debug, Clone, Serialize)]
pub struct GulperStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub build_profile: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub schema_version: i32,
    pub schema_current: bool,
    pub user_count: i64,
    pub food_entry_count: i64,
    pub weight_entry_count: i64,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

fn count_rows(conn: &Connection, table: &str) -> DbResult<i64> {
    let count = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))?;
    Ok(count)
}

impl StatusTracker {
    /// Create a new status tracker
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    /// Get the current status
    pub fn get_status(&self, conn: &Connection) -> DbResult<GulperStatus> {
        let build_info = BuildInfo::current();

        // Get database size if it exists
        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        // Get process info
        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        Ok(GulperStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            build_profile: build_info.build_profile,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            schema_version: migrations::get_schema_version(conn)?,
            schema_current: migrations::is_current(conn)?,
            user_count: count_rows(conn, "users")?,
            food_entry_count: count_rows(conn, "food_entries")?,
            weight_entry_count: count_rows(conn, "weight_entries")?,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_connection;
    use crate::models::{sample_save, UserProfile};

    #[test]
    fn test_status_counts() {
        let conn = test_connection();
        UserProfile::save(&conn, &sample_save("u1")).unwrap();

        let tracker = StatusTracker::new(PathBuf::from("/nonexistent/gulper.db"));
        let status = tracker.get_status(&conn).unwrap();
        assert_eq!(status.schema_version, migrations::SCHEMA_VERSION);
        assert!(status.schema_current);
        assert_eq!(status.user_count, 1);
        assert_eq!(status.food_entry_count, 0);
        assert!(status.database_size_bytes.is_none());
        assert_eq!(status.process_id, std::process::id());
        assert_eq!(status.build_profile, crate::build_info::BUILD_PROFILE);
        assert_eq!(status.version, crate::build_info::VERSION);
    }

    #[test]
    fn test_instructions_cover_tools() {
        for tool in ["save_profile", "add_meal", "log_weight", "progress_summary"] {
            assert!(GULPER_INSTRUCTIONS.contains(tool), "missing {}", tool);
        }
    }
}
