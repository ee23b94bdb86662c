//! User profile model
//!
//! One row per user: biometrics, goal, display preferences, the computed
//! daily calorie target and the onboarding flag.

use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::db::{DbError, DbResult};
use crate::planner::{ActivityLevel, CalorieProfile, Gender, UnitSystem};
use super::{date_param, read_date};

/// A stored user profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub display_name: String,
    pub email: String,
    pub photo_url: Option<String>,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
    pub height_cm: f64,
    pub current_weight_kg: f64,
    pub units: UnitSystem,
    pub date_of_birth: NaiveDate,
    pub target_weight_kg: f64,
    pub progress_rate: f64,
    pub motivations: Vec<String>,
    pub daily_calorie_target: i32,
    pub onboarding_complete: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating or replacing a profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfileSave {
    pub user_id: String,
    pub display_name: String,
    pub email: String,
    pub photo_url: Option<String>,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
    pub height_cm: f64,
    pub current_weight_kg: f64,
    pub units: UnitSystem,
    pub date_of_birth: NaiveDate,
    pub target_weight_kg: f64,
    pub progress_rate: f64,
    pub motivations: Vec<String>,
    pub daily_calorie_target: i32,
}

impl UserProfileSave {
    /// Planner inputs for this profile
    pub fn calorie_profile(&self) -> CalorieProfile {
        CalorieProfile {
            gender: self.gender,
            activity_level: self.activity_level,
            height: self.height_cm,
            current_weight: self.current_weight_kg,
            date_of_birth: self.date_of_birth,
            target_weight: self.target_weight_kg,
            progress_rate: self.progress_rate,
        }
    }
}

impl From<UserProfile> for UserProfileSave {
    fn from(p: UserProfile) -> Self {
        Self {
            user_id: p.user_id,
            display_name: p.display_name,
            email: p.email,
            photo_url: p.photo_url,
            gender: p.gender,
            activity_level: p.activity_level,
            height_cm: p.height_cm,
            current_weight_kg: p.current_weight_kg,
            units: p.units,
            date_of_birth: p.date_of_birth,
            target_weight_kg: p.target_weight_kg,
            progress_rate: p.progress_rate,
            motivations: p.motivations,
            daily_calorie_target: p.daily_calorie_target,
        }
    }
}

impl UserProfile {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let gender_str: String = row.get("gender")?;
        let activity_str: String = row.get("activity_level")?;
        let units_str: String = row.get("units")?;
        let motivations_json: String = row.get("motivations")?;
        let motivations = serde_json::from_str(&motivations_json).map_err(|e| {
            let index = row.as_ref().column_index("motivations").unwrap_or(0);
            rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e))
        })?;

        Ok(Self {
            user_id: row.get("user_id")?,
            display_name: row.get("display_name")?,
            email: row.get("email")?,
            photo_url: row.get("photo_url")?,
            // The CHECK constraint keeps this to known values
            gender: Gender::from_str(&gender_str).unwrap_or(Gender::Other),
            activity_level: ActivityLevel::from_str(&activity_str),
            height_cm: row.get("height_cm")?,
            current_weight_kg: row.get("current_weight_kg")?,
            units: UnitSystem::from_str(&units_str),
            date_of_birth: read_date(row, "date_of_birth")?,
            target_weight_kg: row.get("target_weight_kg")?,
            progress_rate: row.get("progress_rate")?,
            motivations,
            daily_calorie_target: row.get("daily_calorie_target")?,
            onboarding_complete: row.get("onboarding_complete")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Planner inputs for this profile
    pub fn calorie_profile(&self) -> CalorieProfile {
        UserProfileSave::from(self.clone()).calorie_profile()
    }

    /// Calendar date the profile was first saved
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.created_at
            .get(..10)
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
    }

    /// Create or replace a profile. Creation time and onboarding flag are kept.
    pub fn save(conn: &Connection, data: &UserProfileSave) -> DbResult<Self> {
        let motivations = serde_json::to_string(&data.motivations)?;

        conn.execute(
            r#"
            INSERT INTO users (
                user_id, display_name, email, photo_url, gender, activity_level,
                height_cm, current_weight_kg, units, date_of_birth,
                target_weight_kg, progress_rate, motivations, daily_calorie_target
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            ON CONFLICT(user_id) DO UPDATE SET
                display_name = excluded.display_name,
                email = excluded.email,
                photo_url = excluded.photo_url,
                gender = excluded.gender,
                activity_level = excluded.activity_level,
                height_cm = excluded.height_cm,
                current_weight_kg = excluded.current_weight_kg,
                units = excluded.units,
                date_of_birth = excluded.date_of_birth,
                target_weight_kg = excluded.target_weight_kg,
                progress_rate = excluded.progress_rate,
                motivations = excluded.motivations,
                daily_calorie_target = excluded.daily_calorie_target,
                updated_at = datetime('now')
            "#,
            params![
                data.user_id,
                data.display_name,
                data.email,
                data.photo_url,
                data.gender.as_str(),
                data.activity_level.as_str(),
                data.height_cm,
                data.current_weight_kg,
                data.units.as_str(),
                date_param(data.date_of_birth),
                data.target_weight_kg,
                data.progress_rate,
                motivations,
                data.daily_calorie_target,
            ],
        )?;
        debug!(user_id = %data.user_id, "Saved user profile");

        Self::get(conn, &data.user_id)?.ok_or_else(|| {
            DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a profile by user ID
    pub fn get(conn: &Connection, user_id: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM users WHERE user_id = ?1")?;

        let result = stmt.query_row([user_id], Self::from_row);
        match result {
            Ok(profile) => Ok(Some(profile)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All stored user IDs
    pub fn list_user_ids(conn: &Connection) -> DbResult<Vec<String>> {
        let mut stmt = conn.prepare("SELECT user_id FROM users ORDER BY user_id")?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(ids)
    }

    pub fn update_current_weight(conn: &Connection, user_id: &str, weight_kg: f64) -> DbResult<bool> {
        let rows = conn.execute(
            "UPDATE users SET current_weight_kg = ?1, updated_at = datetime('now') WHERE user_id = ?2",
            params![weight_kg, user_id],
        )?;
        Ok(rows > 0)
    }

    pub fn set_daily_calorie_target(conn: &Connection, user_id: &str, target: i32) -> DbResult<bool> {
        let rows = conn.execute(
            "UPDATE users SET daily_calorie_target = ?1, updated_at = datetime('now') WHERE user_id = ?2",
            params![target, user_id],
        )?;
        Ok(rows > 0)
    }

    pub fn set_onboarding_complete(conn: &Connection, user_id: &str, complete: bool) -> DbResult<bool> {
        let rows = conn.execute(
            "UPDATE users SET onboarding_complete = ?1, updated_at = datetime('now') WHERE user_id = ?2",
            params![complete, user_id],
        )?;
        Ok(rows > 0)
    }

    /// False for unknown users
    pub fn is_onboarding_complete(conn: &Connection, user_id: &str) -> DbResult<bool> {
        let complete: Option<bool> = conn
            .query_row(
                "SELECT onboarding_complete FROM users WHERE user_id = ?1",
                [user_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(complete.unwrap_or(false))
    }

    /// Delete the profile with all of its meals and weights
    pub fn clear_all_data(conn: &mut Connection, user_id: &str) -> DbResult<bool> {
        let tx = conn.transaction()?;
        let meals = tx.execute("DELETE FROM food_entries WHERE user_id = ?1", [user_id])?;
        let weights = tx.execute("DELETE FROM weight_entries WHERE user_id = ?1", [user_id])?;
        let users = tx.execute("DELETE FROM users WHERE user_id = ?1", [user_id])?;
        tx.commit()?;

        debug!(user_id, meals, weights, "Cleared user data");
        Ok(users > 0)
    }
}

#[cfg(test)]
pub(crate) fn sample_save(user_id: &str) -> UserProfileSave {
    UserProfileSave {
        user_id: user_id.to_string(),
        display_name: "Sam".to_string(),
        email: "sam@example.com".to_string(),
        photo_url: None,
        gender: Gender::Male,
        activity_level: ActivityLevel::Sedentary,
        height_cm: 180.0,
        current_weight_kg: 80.0,
        units: UnitSystem::Metric,
        date_of_birth: NaiveDate::from_ymd_opt(1996, 10, 19).unwrap(),
        target_weight_kg: 75.0,
        progress_rate: 0.5,
        motivations: vec!["energy".to_string(), "health".to_string()],
        daily_calorie_target: 1586,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_connection;

    #[test]
    fn test_save_and_get() {
        let conn = test_connection();
        let saved = UserProfile::save(&conn, &sample_save("u1")).unwrap();
        assert_eq!(saved.gender, Gender::Male);
        assert_eq!(saved.motivations, vec!["energy", "health"]);
        assert_eq!(saved.date_of_birth, NaiveDate::from_ymd_opt(1996, 10, 19).unwrap());
        assert!(!saved.onboarding_complete);
        assert!(saved.start_date().is_some());

        assert!(UserProfile::get(&conn, "missing").unwrap().is_none());
    }

    #[test]
    fn test_save_merges_and_keeps_onboarding_flag() {
        let conn = test_connection();
        UserProfile::save(&conn, &sample_save("u1")).unwrap();
        assert!(UserProfile::set_onboarding_complete(&conn, "u1", true).unwrap());

        let mut update = sample_save("u1");
        update.activity_level = ActivityLevel::Active;
        update.units = UnitSystem::Imperial;
        let saved = UserProfile::save(&conn, &update).unwrap();

        assert_eq!(saved.activity_level, ActivityLevel::Active);
        assert_eq!(saved.units, UnitSystem::Imperial);
        assert!(saved.onboarding_complete);
        assert_eq!(UserProfile::list_user_ids(&conn).unwrap(), vec!["u1"]);
    }

    #[test]
    fn test_onboarding_flag_for_unknown_user() {
        let conn = test_connection();
        assert!(!UserProfile::is_onboarding_complete(&conn, "ghost").unwrap());
        assert!(!UserProfile::set_onboarding_complete(&conn, "ghost", true).unwrap());
    }

    #[test]
    fn test_weight_and_target_updates() {
        let conn = test_connection();
        UserProfile::save(&conn, &sample_save("u1")).unwrap();
        assert!(UserProfile::update_current_weight(&conn, "u1", 78.5).unwrap());
        assert!(UserProfile::set_daily_calorie_target(&conn, "u1", 1700).unwrap());

        let profile = UserProfile::get(&conn, "u1").unwrap().unwrap();
        assert_eq!(profile.current_weight_kg, 78.5);
        assert_eq!(profile.daily_calorie_target, 1700);
        assert_eq!(profile.calorie_profile().current_weight, 78.5);
    }

    #[test]
    fn test_stored_and_unsaved_profiles_share_planner_inputs() {
        let conn = test_connection();
        let data = sample_save("u1");
        let stored = UserProfile::save(&conn, &data).unwrap();

        assert_eq!(stored.calorie_profile(), data.calorie_profile());
        assert_eq!(stored.calorie_profile().height, 180.0);
        assert_eq!(stored.calorie_profile().target_weight, 75.0);
    }

    #[test]
    fn test_clear_all_data() {
        let mut conn = test_connection();
        UserProfile::save(&conn, &sample_save("u1")).unwrap();
        conn.execute(
            "INSERT INTO weight_entries (user_id, date, weight_kg) VALUES ('u1', '2026-10-19', 80.0)",
            [],
        )
        .unwrap();

        assert!(UserProfile::clear_all_data(&mut conn, "u1").unwrap());
        assert!(UserProfile::get(&conn, "u1").unwrap().is_none());
        let weights: i64 = conn
            .query_row("SELECT COUNT(*) FROM weight_entries", [], |row| row.get(0))
            .unwrap();
        assert_eq!(weights, 0);
        assert!(!UserProfile::clear_all_data(&mut conn, "u1").unwrap());
    }
}
