//! GET /api/settings – field metadata and current values.

use axum::Json;
use axum::extract::State;
use serde_json::json;

use crate::app::SharedState;
use crate::config::SettingsStore;

use super::{ApiResult, err_json};

/// GET /api/settings
pub async fn get_settings(State(state): State<SharedState>) -> ApiResult {
    let page = state
        .settings_page()
        .map_err(|e| err_json(500, &format!("Failed to load settings: {e}")))?;

    let overridden: Vec<&str> = state
        .overrides()
        .overridden_values()
        .map(|(key, _)| key)
        .collect();

    Ok(Json(json!({
        "option_name": page.settings().option_name(),
        "setting_group": page.setting_group(),
        "fields": page.fields(),
        "values": page.settings().values(),
        "overridden": overridden,
        "redirect_uri": page.redirect_uri(),
    })))
}
