//! Bounded admin log.

use serde::Serialize;

use crate::{Database, DbError};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LogRecord {
    pub id: i64,
    pub log_type: String,
    pub message: String,
    pub uri: String,
    /// Unix timestamp (seconds).
    pub created_at: i64,
}

impl Database {
    /// Append a log entry and return its id.
    pub fn add_log(&self, log_type: &str, message: &str, uri: &str) -> Result<i64, DbError> {
        let now = chrono::Utc::now().timestamp();
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO logs (log_type, message, uri, created_at) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![log_type, message, uri, now],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Newest entries first. `None` returns everything.
    pub fn get_logs(&self, limit: Option<usize>) -> Result<Vec<LogRecord>, DbError> {
        let limit = limit.map_or(-1, |l| i64::try_from(l).unwrap_or(i64::MAX));
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, log_type, message, uri, created_at FROM logs
                 ORDER BY id DESC
                 LIMIT ?1",
            )?;
            let rows = stmt.query_map([limit], |row| {
                Ok(LogRecord {
                    id: row.get(0)?,
                    log_type: row.get(1)?,
                    message: row.get(2)?,
                    uri: row.get(3)?,
                    created_at: row.get(4)?,
                })
            })?;
            let mut logs = Vec::new();
            for row in rows {
                logs.push(row?);
            }
            Ok(logs)
        })
    }

    pub fn count_logs(&self) -> Result<usize, DbError> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM logs", [], |row| row.get(0))?;
            Ok(usize::try_from(count).unwrap_or_default())
        })
    }

    /// Keep only the `keep` newest entries. Returns the number of rows removed.
    pub fn trim_logs(&self, keep: usize) -> Result<usize, DbError> {
        let keep = i64::try_from(keep).unwrap_or(i64::MAX);
        self.with_conn(|conn| {
            let removed = conn.execute(
                "DELETE FROM logs WHERE id NOT IN (
                    SELECT id FROM logs ORDER BY id DESC LIMIT ?1
                 )",
                [keep],
            )?;
            Ok(removed)
        })
    }

    pub fn clear_logs(&self) -> Result<usize, DbError> {
        self.with_conn(|conn| {
            let removed = conn.execute("DELETE FROM logs", [])?;
            Ok(removed)
        })
    }
}
