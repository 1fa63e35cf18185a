//! HTML routes of the settings page:
//!   GET  /options-general.php?page=<slug> – render the form
//!   POST /options.php                     – sanitize and save a submission

use axum::Form;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;

use crate::app::SharedState;
use crate::config::{OPTION_NAME, SettingsStore};
use crate::settings_page::{MENU_SLUG, PageError, PageQuery, collect_submitted};

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
    pub debug: Option<String>,
    #[serde(rename = "settings-updated")]
    pub settings_updated: Option<String>,
}

/// GET /options-general.php
pub async fn settings_page(
    State(state): State<SharedState>,
    Query(params): Query<PageParams>,
) -> Response {
    if params.page.as_deref() != Some(MENU_SLUG) {
        return error_page(StatusCode::NOT_FOUND, "Unknown settings page.");
    }

    let query = PageQuery {
        debug: params.debug.is_some(),
        settings_updated: params.settings_updated.is_some(),
    };
    match render(&state, query) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Failed to render settings page: {e}");
            error_page(StatusCode::INTERNAL_SERVER_ERROR, "Failed to render settings page.")
        }
    }
}

fn render(state: &SharedState, query: PageQuery) -> Result<String, PageError> {
    let mut page = state.settings_page()?;
    let registration = page.admin_init();
    page.settings_page(&registration, query)
}

/// POST /options.php
pub async fn save_options(
    State(state): State<SharedState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    match save(&state, &pairs) {
        Ok(true) => Redirect::to(&format!(
            "/options-general.php?page={MENU_SLUG}&settings-updated=true"
        ))
        .into_response(),
        Ok(false) => error_page(StatusCode::FORBIDDEN, "Options page not allowed."),
        Err(e) => {
            tracing::error!("Failed to save settings: {e}");
            error_page(StatusCode::INTERNAL_SERVER_ERROR, "Failed to save settings.")
        }
    }
}

/// Returns `false` when the submission lacks this process's form token or
/// does not target this page's group.
fn save(state: &SharedState, pairs: &[(String, String)]) -> Result<bool, PageError> {
    if submitted(pairs, "_wpnonce") != Some(state.form_token()) {
        tracing::warn!("Rejected submission without a valid form token");
        return Ok(false);
    }

    let page = state.settings_page()?;
    let option_page = submitted(pairs, "option_page");
    if option_page != Some(page.setting_group()) {
        tracing::warn!(?option_page, "Rejected submission for foreign option page");
        return Ok(false);
    }

    let input = collect_submitted(OPTION_NAME, pairs);
    let cleaned = page.sanitize_settings(&input);
    let mut settings = page.into_settings();
    settings.replace_values(cleaned);
    settings.save()?;

    let keys = settings.stored_values().len();
    tracing::info!(option = %settings.option_name(), keys, "Settings updated");
    state
        .logger_for(&settings)
        .log(&format!("Settings updated ({keys} keys)"), "settings", "/options.php")?;
    Ok(true)
}

/// Last value submitted under `name`.
fn submitted<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    pairs
        .iter()
        .rev()
        .find(|(n, _)| n == name)
        .map(|(_, value)| value.as_str())
}

fn error_page(status: StatusCode, message: &str) -> Response {
    let body = format!(
        "<!DOCTYPE html>\n<html><body><h1>{status}</h1><p>{}</p></body></html>\n",
        handlebars::html_escape(message)
    );
    (status, Html(body)).into_response()
}
