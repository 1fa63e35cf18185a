//! Bounded admin log backed by the `logs` table.

use std::sync::Arc;

use options_db::{Database, DbError, LogRecord};
use serde::Serialize;

use crate::config::defaults::DEFAULT_LOG_LIMIT;
use crate::config::{SettingsStore, is_truthy};
use crate::settings_page::{LogTable, PageError};
use crate::templates::{LOGS_TABLE, Templates};

#[derive(Serialize)]
struct LogRow<'a> {
    log_type: &'a str,
    date: String,
    uri: &'a str,
    message: &'a str,
}

#[derive(Clone)]
pub struct OptionLogger {
    db: Database,
    templates: Arc<Templates>,
    enabled: bool,
    limit: usize,
}

impl OptionLogger {
    pub fn new(db: Database, templates: Arc<Templates>, enabled: bool, limit: usize) -> Self {
        Self {
            db,
            templates,
            enabled,
            limit,
        }
    }

    /// Take `enable_logging` and `log_limit` from the current settings.
    pub fn from_settings(db: Database, templates: Arc<Templates>, settings: &impl SettingsStore) -> Self {
        let enabled = settings
            .get("enable_logging")
            .is_some_and(|v| is_truthy(&v));
        let limit = settings
            .get("log_limit")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_LOG_LIMIT);
        Self::new(db, templates, enabled, limit)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Record an entry, then drop everything beyond the newest `limit`.
    /// Returns whether anything was written.
    pub fn log(&self, message: &str, log_type: &str, uri: &str) -> Result<bool, DbError> {
        if !self.enabled {
            return Ok(false);
        }
        self.db.add_log(log_type, message, uri)?;
        let removed = self.db.trim_logs(self.limit)?;
        if removed > 0 {
            tracing::debug!(removed, limit = self.limit, "Trimmed admin log");
        }
        Ok(true)
    }

    /// Newest first.
    pub fn get_logs(&self) -> Result<Vec<LogRecord>, DbError> {
        self.db.get_logs(None)
    }

    pub fn get_logs_table(&self) -> Result<String, PageError> {
        let logs = self.get_logs()?;
        let rows: Vec<LogRow<'_>> = logs
            .iter()
            .map(|log| LogRow {
                log_type: &log.log_type,
                date: format_date(log.created_at),
                uri: &log.uri,
                message: &log.message,
            })
            .collect();
        self.templates
            .render(LOGS_TABLE, &serde_json::json!({ "logs": rows }))
    }

    pub fn clear(&self) -> Result<usize, DbError> {
        let removed = self.db.clear_logs()?;
        tracing::info!(removed, "Admin log cleared");
        Ok(removed)
    }
}

impl LogTable for OptionLogger {
    fn logs_table(&self) -> Result<String, PageError> {
        self.get_logs_table()
    }
}

fn format_date(timestamp: i64) -> String {
    chrono::DateTime::from_timestamp(timestamp, 0)
        .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}
