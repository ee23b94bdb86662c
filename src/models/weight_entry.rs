//! Weight entry model
//!
//! Logged body weight, at most one per user per day.

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::db::DbResult;
use super::{date_param, read_date};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightEntry {
    pub user_id: String,
    pub date: NaiveDate,
    pub weight_kg: f64,
    pub updated_at: String,
}

impl WeightEntry {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            user_id: row.get("user_id")?,
            date: read_date(row, "date")?,
            weight_kg: row.get("weight_kg")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Record the weight for a day, replacing any earlier reading that day
    pub fn upsert(conn: &Connection, user_id: &str, date: NaiveDate, weight_kg: f64) -> DbResult<Self> {
        let entry = conn.query_row(
            r#"
            INSERT INTO weight_entries (user_id, date, weight_kg)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(user_id, date) DO UPDATE SET
                weight_kg = excluded.weight_kg,
                updated_at = datetime('now')
            RETURNING *
            "#,
            params![user_id, date_param(date), weight_kg],
            Self::from_row,
        )?;
        debug!(user_id, date = %date, weight_kg, "Recorded weight");
        Ok(entry)
    }

    /// All entries, oldest first
    pub fn list(conn: &Connection, user_id: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM weight_entries WHERE user_id = ?1 ORDER BY date ASC")?;
        let entries = stmt
            .query_map([user_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Most recent entry
    pub fn latest(conn: &Connection, user_id: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM weight_entries WHERE user_id = ?1 ORDER BY date DESC LIMIT 1",
        )?;

        let result = stmt.query_row([user_id], Self::from_row);
        match result {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn delete(conn: &Connection, user_id: &str, date: NaiveDate) -> DbResult<bool> {
        let rows = conn.execute(
            "DELETE FROM weight_entries WHERE user_id = ?1 AND date = ?2",
            params![user_id, date_param(date)],
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

    #[test]
    fn test_one_entry_per_day() {
        let conn = test_connection();
        UserProfile::save(&conn, &sample_save("u1")).unwrap();

        WeightEntry::upsert(&conn, "u1", date(2026, 10, 19), 80.0).unwrap();
        let replaced = WeightEntry::upsert(&conn, "u1", date(2026, 10, 19), 79.6).unwrap();
        assert_eq!(replaced.weight_kg, 79.6);

        let all = WeightEntry::list(&conn, "u1").unwrap();
        assert_eq!(all.len(), 1);
    }

    #[test]
    fn test_list_ascending_and_latest() {
        let conn = test_connection();
        UserProfile::save(&conn, &sample_save("u1")).unwrap();
        assert!(WeightEntry::latest(&conn, "u1").unwrap().is_none());

        WeightEntry::upsert(&conn, "u1", date(2026, 10, 12), 80.4).unwrap();
        WeightEntry::upsert(&conn, "u1", date(2026, 10, 1), 81.0).unwrap();
        WeightEntry::upsert(&conn, "u1", date(2026, 10, 19), 79.9).unwrap();

        let dates: Vec<_> = WeightEntry::list(&conn, "u1").unwrap().iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![date(2026, 10, 1), date(2026, 10, 12), date(2026, 10, 19)]);
        assert_eq!(WeightEntry::latest(&conn, "u1").unwrap().unwrap().weight_kg, 79.9);

        assert!(WeightEntry::delete(&conn, "u1", date(2026, 10, 19)).unwrap());
        assert_eq!(WeightEntry::latest(&conn, "u1").unwrap().unwrap().weight_kg, 80.4);
    }

    #[test]
    fn test_requires_existing_user() {
        let conn = test_connection();
        assert!(WeightEntry::upsert(&conn, "ghost", date(2026, 10, 19), 70.0).is_err());
    }
}
