//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;
use tracing::info;

use super::connection::DbResult;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        info!("Applying schema migration v1");
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
    }

    Ok(())
}

/// Get the applied schema version (0 for a fresh database)
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Whether the database is at the latest schema version
pub fn is_current(conn: &Connection) -> DbResult<bool> {
    Ok(get_schema_version(conn)? >= SCHEMA_VERSION)
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- USERS
        -- Profile, computed stats and onboarding flag
        -- ============================================
        CREATE TABLE users (
            user_id TEXT PRIMARY KEY,
            display_name TEXT NOT NULL DEFAULT '',
            email TEXT NOT NULL DEFAULT '',
            photo_url TEXT,

            -- Biometrics
            gender TEXT NOT NULL CHECK(gender IN ('male', 'female', 'other')),
            activity_level TEXT NOT NULL DEFAULT 'sedentary',
            height_cm REAL NOT NULL,
            current_weight_kg REAL NOT NULL,
            units TEXT NOT NULL DEFAULT 'metric' CHECK(units IN ('metric', 'imperial')),
            date_of_birth TEXT NOT NULL,         -- ISO date: "1990-04-02"

            -- Goal
            target_weight_kg REAL NOT NULL,
            progress_rate REAL NOT NULL,         -- kg per week
            motivations TEXT NOT NULL DEFAULT '[]', -- JSON array of strings

            -- Stats
            daily_calorie_target INTEGER NOT NULL DEFAULT 0,
            onboarding_complete INTEGER NOT NULL DEFAULT 0,

            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- FOOD ENTRIES
        -- Logged meals, one row per entry
        -- ============================================
        CREATE TABLE food_entries (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
            food_name TEXT NOT NULL,
            calories INTEGER NOT NULL,
            meal_type TEXT NOT NULL DEFAULT 'snack',
            time TEXT NOT NULL DEFAULT '',       -- display time, e.g. "2:30 PM"
            date TEXT NOT NULL,                  -- ISO date
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_food_entries_user_date ON food_entries(user_id, date);

        -- ============================================
        -- WEIGHT ENTRIES
        -- At most one weight per user per day
        -- ============================================
        CREATE TABLE weight_entries (
            user_id TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
            date TEXT NOT NULL,                  -- ISO date
            weight_kg REAL NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (user_id, date)
        );
        "#,
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(run_migrations(&conn).is_ok());
        assert!(run_migrations(&conn).is_ok());
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
        assert!(is_current(&conn).unwrap());
    }
}
