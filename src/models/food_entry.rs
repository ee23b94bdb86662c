//! Food entry model
//!
//! A logged meal: name, calories, meal slot and the day it was eaten.

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::db::{DbError, DbResult};
use super::{date_param, read_date};

/// Meal type enum
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    #[default]
    Snack,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }

    /// Parse from string; unknown values are treated as a snack
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => MealType::Breakfast,
            "lunch" => MealType::Lunch,
            "dinner" => MealType::Dinner,
            _ => MealType::Snack,
        }
    }
}

/// A logged food entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodEntry {
    pub id: String,
    pub user_id: String,
    pub food_name: String,
    pub calories: i64,
    pub meal_type: MealType,
    /// Display time, e.g. "2:30 PM"
    pub time: String,
    pub date: NaiveDate,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a food entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodEntryCreate {
    /// Client-chosen ID; generated when absent
    pub id: Option<String>,
    pub food_name: String,
    pub calories: i64,
    pub meal_type: MealType,
    pub time: Option<String>,
    pub date: NaiveDate,
}

/// Data for updating a food entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FoodEntryUpdate {
    pub food_name: Option<String>,
    pub calories: Option<i64>,
    pub meal_type: Option<MealType>,
    pub time: Option<String>,
    pub date: Option<NaiveDate>,
}

impl FoodEntry {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let meal_type_str: String = row.get("meal_type")?;
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            food_name: row.get("food_name")?,
            calories: row.get("calories")?,
            meal_type: MealType::from_str(&meal_type_str),
            time: row.get("time")?,
            date: read_date(row, "date")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Log a new food entry
    pub fn create(conn: &Connection, user_id: &str, data: &FoodEntryCreate) -> DbResult<Self> {
        let id: String = conn.query_row(
            r#"
            INSERT INTO food_entries (id, user_id, food_name, calories, meal_type, time, date)
            VALUES (COALESCE(?1, lower(hex(randomblob(8)))), ?2, ?3, ?4, ?5, ?6, ?7)
            RETURNING id
            "#,
            params![
                data.id,
                user_id,
                data.food_name,
                data.calories,
                data.meal_type.as_str(),
                data.time.clone().unwrap_or_default(),
                date_param(data.date),
            ],
            |row| row.get(0),
        )?;
        debug!(user_id, id = %id, calories = data.calories, "Logged food entry");

        Self::get(conn, user_id, &id)?.ok_or_else(|| {
            DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a food entry by ID
    pub fn get(conn: &Connection, user_id: &str, id: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM food_entries WHERE user_id = ?1 AND id = ?2")?;

        let result = stmt.query_row([user_id, id], Self::from_row);
        match result {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List entries, newest date first
    pub fn list(conn: &Connection, user_id: &str, limit: i64, offset: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM food_entries WHERE user_id = ?1
             ORDER BY date DESC, created_at DESC LIMIT ?2 OFFSET ?3",
        )?;
        let entries = stmt
            .query_map(params![user_id, limit, offset], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Entries for a single day, in logging order
    pub fn list_for_date(conn: &Connection, user_id: &str, date: NaiveDate) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM food_entries WHERE user_id = ?1 AND date = ?2 ORDER BY created_at, rowid",
        )?;
        let entries = stmt
            .query_map(params![user_id, date_param(date)], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Entries with `start <= date <= end`
    pub fn list_range(
        conn: &Connection,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM food_entries WHERE user_id = ?1 AND date >= ?2 AND date <= ?3
             ORDER BY date, created_at",
        )?;
        let entries = stmt
            .query_map(params![user_id, date_param(start), date_param(end)], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Update a food entry
    pub fn update(
        conn: &Connection,
        user_id: &str,
        id: &str,
        data: &FoodEntryUpdate,
    ) -> DbResult<Option<Self>> {
        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref name) = data.food_name {
            params_vec.push(Box::new(name.clone()));
            updates.push(format!("food_name = ?{}", params_vec.len()));
        }
        if let Some(calories) = data.calories {
            params_vec.push(Box::new(calories));
            updates.push(format!("calories = ?{}", params_vec.len()));
        }
        if let Some(meal_type) = data.meal_type {
            params_vec.push(Box::new(meal_type.as_str()));
            updates.push(format!("meal_type = ?{}", params_vec.len()));
        }
        if let Some(ref time) = data.time {
            params_vec.push(Box::new(time.clone()));
            updates.push(format!("time = ?{}", params_vec.len()));
        }
        if let Some(date) = data.date {
            params_vec.push(Box::new(date_param(date)));
            updates.push(format!("date = ?{}", params_vec.len()));
        }

        if updates.is_empty() {
            return Self::get(conn, user_id, id);
        }

        updates.push("updated_at = datetime('now')".to_string());

        params_vec.push(Box::new(user_id.to_string()));
        let user_param = params_vec.len();
        params_vec.push(Box::new(id.to_string()));
        let id_param = params_vec.len();

        let sql = format!(
            "UPDATE food_entries SET {} WHERE user_id = ?{} AND id = ?{}",
            updates.join(", "),
            user_param,
            id_param
        );

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        Self::get(conn, user_id, id)
    }

    /// Delete a food entry
    pub fn delete(conn: &Connection, user_id: &str, id: &str) -> DbResult<bool> {
        let rows = conn.execute(
            "DELETE FROM food_entries WHERE user_id = ?1 AND id = ?2",
            [user_id, id],
        )?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_connection;
    use crate::models::{sample_save, UserProfile};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn meal(name: &str, calories: i64, day: NaiveDate) -> FoodEntryCreate {
        FoodEntryCreate {
            id: None,
            food_name: name.to_string(),
            calories,
            meal_type: MealType::Lunch,
            time: Some("12:30 PM".to_string()),
            date: day,
        }
    }

    fn setup() -> Connection {
        let conn = test_connection();
        UserProfile::save(&conn, &sample_save("u1")).unwrap();
        conn
    }

    #[test]
    fn test_meal_type_parsing() {
        assert_eq!(MealType::from_str("Dinner"), MealType::Dinner);
        assert_eq!(MealType::from_str("brunch"), MealType::Snack);
        assert_eq!(MealType::default(), MealType::Snack);
    }

    #[test]
    fn test_create_generates_id() {
        let conn = setup();
        let a = FoodEntry::create(&conn, "u1", &meal("Salad", 350, date(2026, 10, 19))).unwrap();
        let b = FoodEntry::create(&conn, "u1", &meal("Soup", 200, date(2026, 10, 19))).unwrap();
        assert_eq!(a.id.len(), 16);
        assert_ne!(a.id, b.id);
        assert_eq!(a.meal_type, MealType::Lunch);
        assert_eq!(a.time, "12:30 PM");
    }

    #[test]
    fn test_create_with_client_id() {
        let conn = setup();
        let mut data = meal("Toast", 150, date(2026, 10, 19));
        data.id = Some("1760000000000".to_string());
        let entry = FoodEntry::create(&conn, "u1", &data).unwrap();
        assert_eq!(entry.id, "1760000000000");
    }

    #[test]
    fn test_entries_are_scoped_per_user() {
        let conn = setup();
        UserProfile::save(&conn, &sample_save("u2")).unwrap();
        let entry = FoodEntry::create(&conn, "u1", &meal("Salad", 350, date(2026, 10, 19))).unwrap();

        assert!(FoodEntry::get(&conn, "u2", &entry.id).unwrap().is_none());
        assert!(!FoodEntry::delete(&conn, "u2", &entry.id).unwrap());
        assert!(FoodEntry::delete(&conn, "u1", &entry.id).unwrap());
    }

    #[test]
    fn test_list_orders_and_filters() {
        let conn = setup();
        FoodEntry::create(&conn, "u1", &meal("Old", 100, date(2026, 10, 10))).unwrap();
        FoodEntry::create(&conn, "u1", &meal("New", 200, date(2026, 10, 19))).unwrap();
        FoodEntry::create(&conn, "u1", &meal("Mid", 300, date(2026, 10, 15))).unwrap();

        let all = FoodEntry::list(&conn, "u1", 10, 0).unwrap();
        let names: Vec<_> = all.iter().map(|e| e.food_name.as_str()).collect();
        assert_eq!(names, vec!["New", "Mid", "Old"]);

        let range = FoodEntry::list_range(&conn, "u1", date(2026, 10, 13), date(2026, 10, 19)).unwrap();
        assert_eq!(range.len(), 2);

        let day = FoodEntry::list_for_date(&conn, "u1", date(2026, 10, 15)).unwrap();
        assert_eq!(day.len(), 1);
        assert_eq!(day[0].calories, 300);
    }

    #[test]
    fn test_update() {
        let conn = setup();
        let entry = FoodEntry::create(&conn, "u1", &meal("Salad", 350, date(2026, 10, 19))).unwrap();

        let update = FoodEntryUpdate {
            calories: Some(420),
            meal_type: Some(MealType::Dinner),
            ..Default::default()
        };
        let updated = FoodEntry::update(&conn, "u1", &entry.id, &update).unwrap().unwrap();
        assert_eq!(updated.calories, 420);
        assert_eq!(updated.meal_type, MealType::Dinner);
        assert_eq!(updated.food_name, "Salad");

        assert!(FoodEntry::update(&conn, "u1", "missing", &update).unwrap().is_none());
    }
}
