//! Relational history backend; ordering and the entry cap are enforced
//! server-side.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use tracing::warn;

use super::domain::HistoryEntry;
use super::store::{AppendOutcome, HistoryStore, HISTORY_CAP};

pub struct PostgresHistoryStore {
    pool: PgPool,
}

impl PostgresHistoryStore {
    /// Build a lazy pool; connections are established on first use so a
    /// temporarily unreachable store does not fail startup.
    pub fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect_lazy(database_url)?;
        Ok(Self { pool })
    }

    /// Apply the embedded schema migrations.
    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(sqlx::Error::from)
    }
}

#[async_trait]
impl HistoryStore for PostgresHistoryStore {
    async fn append(&self, identity_id: &str, entry: HistoryEntry) -> AppendOutcome {
        let input = match serde_json::to_value(&entry.input) {
            Ok(value) => value,
            Err(err) => return AppendOutcome::PersistFailed(err.to_string()),
        };
        let results = match serde_json::to_value(&entry.results) {
            Ok(value) => value,
            Err(err) => return AppendOutcome::PersistFailed(err.to_string()),
        };

        let written =
            sqlx::query("INSERT INTO rec_history (user_id, ts, input, results) VALUES ($1, $2, $3, $4)")
                .bind(identity_id)
                .bind(entry.ts)
                .bind(input)
                .bind(results)
                .execute(&self.pool)
                .await;

        match written {
            Ok(_) => AppendOutcome::Persisted,
            Err(err) => AppendOutcome::PersistFailed(err.to_string()),
        }
    }

    async fn list(&self, identity_id: &str) -> Vec<HistoryEntry> {
        let rows = sqlx::query(
            "SELECT ts, input, results FROM rec_history WHERE user_id = $1 ORDER BY ts DESC LIMIT $2",
        )
        .bind(identity_id)
        .bind(HISTORY_CAP as i64)
        .fetch_all(&self.pool)
        .await;

        let rows = match rows {
            Ok(rows) => rows,
            Err(err) => {
                warn!(error = %err, "history store unreachable, answering empty");
                return Vec::new();
            }
        };

        rows.into_iter()
            .filter_map(|row| {
                let ts: DateTime<Utc> = row.get("ts");
                let input = serde_json::from_value(row.get("input")).ok()?;
                let results = serde_json::from_value(row.get("results")).ok()?;
                Some(HistoryEntry { ts, input, results })
            })
            .collect()
    }
}
