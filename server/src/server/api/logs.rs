//! Admin log API.

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;
use serde_json::json;

use crate::app::SharedState;

use super::{ApiResult, err_json};

#[derive(Debug, Deserialize)]
pub struct LogQuery {
    pub limit: Option<usize>,
}

/// GET /api/logs
pub async fn get_logs(State(state): State<SharedState>, Query(q): Query<LogQuery>) -> ApiResult {
    let limit = q.limit.unwrap_or(100);
    let logs = state
        .db()
        .get_logs(Some(limit))
        .map_err(|e| err_json(500, &format!("Failed to read logs: {e}")))?;

    Ok(Json(json!({
        "count": logs.len(),
        "logs": logs,
        "limit": limit,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })))
}

/// POST /api/logs/clear
pub async fn clear_logs(State(state): State<SharedState>) -> ApiResult {
    let settings = state
        .load_settings()
        .map_err(|e| err_json(500, &format!("Failed to load settings: {e}")))?;
    let removed = state
        .logger_for(&settings)
        .clear()
        .map_err(|e| err_json(500, &format!("Failed to clear logs: {e}")))?;

    Ok(Json(json!({ "status": "ok", "message": "Logs cleared", "removed": removed })))
}
