//! Option values, stored as one row per key under an option name.

use std::collections::BTreeMap;

use rusqlite::OptionalExtension;

use crate::{Database, DbError};

impl Database {
    pub fn get_option_value(&self, option_name: &str, key: &str) -> Result<Option<String>, DbError> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT value FROM settings WHERE option_name = ?1 AND key = ?2")?;
            let value = stmt
                .query_row([option_name, key], |row| row.get::<_, String>(0))
                .optional()?;
            Ok(value)
        })
    }

    pub fn set_option_value(&self, option_name: &str, key: &str, value: &str) -> Result<(), DbError> {
        if key.is_empty() {
            return Err(DbError::InvalidData("option key must not be empty".into()));
        }
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO settings (option_name, key, value, updated_at) VALUES (?1, ?2, ?3, CURRENT_TIMESTAMP)
                 ON CONFLICT(option_name, key) DO UPDATE SET value = ?3, updated_at = CURRENT_TIMESTAMP",
                rusqlite::params![option_name, key, value],
            )?;
            Ok(())
        })
    }

    pub fn get_option_values(&self, option_name: &str) -> Result<BTreeMap<String, String>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT key, value FROM settings WHERE option_name = ?1")?;
            let rows = stmt.query_map([option_name], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?;
            let mut map = BTreeMap::new();
            for row in rows {
                let (k, v) = row?;
                map.insert(k, v);
            }
            Ok(map)
        })
    }

    /// Replace every value stored under `option_name` with `values`.
    pub fn replace_option_values(
        &self,
        option_name: &str,
        values: &BTreeMap<String, String>,
    ) -> Result<(), DbError> {
        if values.keys().any(|k| k.is_empty()) {
            return Err(DbError::InvalidData("option key must not be empty".into()));
        }
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM settings WHERE option_name = ?1", [option_name])?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO settings (option_name, key, value, updated_at) VALUES (?1, ?2, ?3, CURRENT_TIMESTAMP)",
                )?;
                for (key, value) in values {
                    stmt.execute(rusqlite::params![option_name, key, value])?;
                }
            }
            tx.commit()?;
            tracing::debug!(option = option_name, keys = values.len(), "Replaced option values");
            Ok(())
        })
    }

    pub fn delete_option(&self, option_name: &str) -> Result<(), DbError> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM settings WHERE option_name = ?1", [option_name])?;
            Ok(())
        })
    }
}
