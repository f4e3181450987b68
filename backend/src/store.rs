//! SQLite-backed profile store.
//!
//! Holds the flattened ARGO profile data uploaded through the API, one row
//! per depth level, in the same `argo_data` table the generated SQL queries
//! against. Each upload replaces the table wholesale.

use std::str::FromStr;
use std::time::Duration;

use serde_json::{Map, Number, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow};
use sqlx::{Column, Row, SqlitePool, TypeInfo, ValueRef};

use crate::ingest::ProfileRecord;

/// Table the translator is prompted to query.
pub const TABLE_NAME: &str = "argo_data";

#[derive(Debug, Clone)]
pub struct ProfileStore {
    pool: SqlitePool,
}

impl ProfileStore {
    /// Open the store at `path`, creating the database file if missing.
    /// `":memory:"` opens a throwaway in-memory store.
    pub async fn open(path: &str) -> Result<Self, sqlx::Error> {
        let url = if path == ":memory:" {
            "sqlite::memory:".to_string()
        } else {
            format!("sqlite://{path}")
        };
        let options = SqliteConnectOptions::from_str(&url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        // Single connection: SQLite allows one writer, and an in-memory
        // database is per-connection.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// True when the profile table exists and holds at least one row.
    pub async fn has_data(&self) -> Result<bool, sqlx::Error> {
        let table: Option<String> =
            sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1")
                .bind(TABLE_NAME)
                .fetch_optional(&self.pool)
                .await?;
        if table.is_none() {
            return Ok(false);
        }

        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {TABLE_NAME}"))
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    /// Replace the profile table with `records`.
    pub async fn replace_profiles(&self, records: &[ProfileRecord]) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(&format!("DROP TABLE IF EXISTS {TABLE_NAME}"))
            .execute(&mut *tx)
            .await?;
        sqlx::query(&format!(
            "CREATE TABLE {TABLE_NAME} (
                latitude REAL,
                longitude REAL,
                time TEXT,
                depth REAL,
                temperature REAL,
                salinity REAL,
                chla REAL
            )"
        ))
        .execute(&mut *tx)
        .await?;

        for record in records {
            sqlx::query(&format!(
                "INSERT INTO {TABLE_NAME} \
                 (latitude, longitude, time, depth, temperature, salinity, chla) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"
            ))
            .bind(record.latitude)
            .bind(record.longitude)
            .bind(&record.time)
            .bind(record.depth)
            .bind(record.temperature)
            .bind(record.salinity)
            .bind(record.chla)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await
    }

    /// Run a generated SELECT and return the rows as JSON objects keyed by
    /// column name. The caller decides how to treat failures; generated SQL
    /// is allowed to be wrong.
    pub async fn run_select(&self, sql: &str) -> Result<Vec<Map<String, Value>>, sqlx::Error> {
        let rows = sqlx::query(sql).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(row_to_object).collect())
    }
}

fn row_to_object(row: &SqliteRow) -> Map<String, Value> {
    let mut object = Map::new();
    for column in row.columns() {
        object.insert(column.name().to_string(), column_value(row, column.ordinal()));
    }
    object
}

/// Decode one column by its SQLite storage class. Unknown classes fall back
/// to text; anything undecodable becomes null.
fn column_value(row: &SqliteRow, index: usize) -> Value {
    let Ok(raw) = row.try_get_raw(index) else {
        return Value::Null;
    };
    if raw.is_null() {
        return Value::Null;
    }

    match raw.type_info().name() {
        "INTEGER" | "BOOLEAN" => row
            .try_get::<i64, _>(index)
            .map(Value::from)
            .unwrap_or(Value::Null),
        "REAL" | "NUMERIC" => row
            .try_get::<f64, _>(index)
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        _ => row
            .try_get::<String, _>(index)
            .map(Value::String)
            .unwrap_or(Value::Null),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(depth: f64, temperature: f64, salinity: Option<f64>) -> ProfileRecord {
        ProfileRecord {
            latitude: -12.5,
            longitude: 45.0,
            time: "2023-01-15 10:30:00".to_string(),
            depth,
            temperature,
            salinity,
            chla: None,
        }
    }

    #[tokio::test]
    async fn empty_store_reports_no_data() {
        let store = ProfileStore::open(":memory:").await.unwrap();
        assert!(!store.has_data().await.unwrap());
    }

    #[tokio::test]
    async fn replace_then_query_round_trips_rows() {
        let store = ProfileStore::open(":memory:").await.unwrap();
        store
            .replace_profiles(&[record(5.0, 22.1, Some(35.2)), record(100.0, 14.8, None)])
            .await
            .unwrap();

        assert!(store.has_data().await.unwrap());

        let rows = store
            .run_select("SELECT * FROM argo_data ORDER BY depth;")
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["depth"], serde_json::json!(5.0));
        assert_eq!(rows[0]["salinity"], serde_json::json!(35.2));
        assert_eq!(rows[0]["time"], serde_json::json!("2023-01-15 10:30:00"));
        // NULL salinity decodes to JSON null, not a missing key.
        assert_eq!(rows[1]["salinity"], Value::Null);
    }

    #[tokio::test]
    async fn replace_discards_previous_rows() {
        let store = ProfileStore::open(":memory:").await.unwrap();
        store
            .replace_profiles(&[record(5.0, 22.1, None), record(10.0, 20.0, None)])
            .await
            .unwrap();
        store.replace_profiles(&[record(50.0, 18.0, None)]).await.unwrap();

        let rows = store
            .run_select("SELECT COUNT(*) AS n FROM argo_data;")
            .await
            .unwrap();
        assert_eq!(rows[0]["n"], serde_json::json!(1));
    }

    #[tokio::test]
    async fn aggregates_decode_by_storage_class() {
        let store = ProfileStore::open(":memory:").await.unwrap();
        store.replace_profiles(&[record(5.0, 22.0, None)]).await.unwrap();

        let rows = store
            .run_select("SELECT COUNT(*) AS n, AVG(temperature) AS t, 'label' AS s FROM argo_data;")
            .await
            .unwrap();
        assert_eq!(rows[0]["n"], serde_json::json!(1));
        assert_eq!(rows[0]["t"], serde_json::json!(22.0));
        assert_eq!(rows[0]["s"], serde_json::json!("label"));
    }

    #[tokio::test]
    async fn invalid_sql_surfaces_an_error() {
        let store = ProfileStore::open(":memory:").await.unwrap();
        store.replace_profiles(&[record(5.0, 22.0, None)]).await.unwrap();

        assert!(store
            .run_select("SELECT missing_column FROM argo_data;")
            .await
            .is_err());
        assert!(store.run_select("SELECT * FROM no_such_table;").await.is_err());
    }
}
