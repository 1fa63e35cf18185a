use axum::{
    Json, Router,
    http::{StatusCode, Uri},
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use super::{api, pages};
use crate::app::SharedState;

/// Create the axum router with all routes.
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        // --- Core ---
        .route("/status", get(status_handler))
        // --- Settings page ---
        .route("/options-general.php", get(pages::settings_page))
        .route("/options.php", post(pages::save_options))
        // --- JSON API ---
        .route("/api/settings", get(api::settings::get_settings))
        .route("/api/logs", get(api::logs::get_logs))
        .route("/api/logs/clear", post(api::logs::clear_logs))
        .fallback(not_found)
        // --- Middleware ---
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn status_handler() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn not_found(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Not Found", "path": uri.path() })),
    )
}

#[cfg(test)]
mod tests {
    use super::create_router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use options_db::Database;
    use tower::ServiceExt;

    use crate::app::SharedState;
    use crate::config::{AppConfig, EnvOverrides, OPTION_NAME, OptionSettings};
    use crate::templates::Templates;

    const GROUP: &str = "openid_connect_generic_settings-group";

    fn test_state() -> SharedState {
        let db = Database::open_in_memory().expect("Failed to create test DB");
        let mut settings = OptionSettings::load(db.clone(), OPTION_NAME, EnvOverrides::default()).unwrap();
        settings.initialize_defaults().unwrap();
        SharedState::new(
            db,
            AppConfig::default(),
            EnvOverrides::default(),
            Templates::new().unwrap(),
            Vec::new(),
        )
    }

    fn field(key: &str) -> String {
        format!("{OPTION_NAME}%5B{key}%5D")
    }

    fn form(body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/options.php")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn status_reports_ok() {
        let response = create_router(test_state()).oneshot(get("/status")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn settings_page_renders_for_its_slug_only() {
        let app = create_router(test_state());

        let response = app
            .clone()
            .oneshot(get("/options-general.php?page=openid-connect-generic-settings"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("<title>Hitobito Auth</title>"));
        assert!(html.contains(r#"name="openid_connect_generic_settings[client_id]""#));
        assert!(html.contains(r#"<option value="test" selected="selected">"#));

        let response = app
            .oneshot(get("/options-general.php?page=other"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn submission_for_foreign_group_is_forbidden() {
        let state = test_state();
        let body = format!(
            "option_page=general&_wpnonce={}&{}=x",
            state.form_token(),
            field("client_id")
        );
        let response = create_router(state.clone()).oneshot(form(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            state.db().get_option_value(OPTION_NAME, "client_id").unwrap(),
            Some(String::new())
        );
    }

    #[tokio::test]
    async fn submission_without_form_token_is_forbidden() {
        let state = test_state();
        let app = create_router(state.clone());

        let body = format!("option_page={GROUP}&action=update&{}=attacker", field("client_id"));
        let response = app.clone().oneshot(form(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body = format!("option_page={GROUP}&_wpnonce=guessed&{}=attacker", field("client_id"));
        let response = app.oneshot(form(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        assert_eq!(
            state.db().get_option_value(OPTION_NAME, "client_id").unwrap(),
            Some(String::new())
        );
    }

    #[tokio::test]
    async fn rendered_page_carries_form_token() {
        let state = test_state();
        let response = create_router(state.clone())
            .oneshot(get("/options-general.php?page=openid-connect-generic-settings"))
            .await
            .unwrap();
        let html = body_string(response).await;
        assert!(html.contains(&format!(
            r#"<input type="hidden" name="_wpnonce" value="{}">"#,
            state.form_token()
        )));
    }

    #[tokio::test]
    async fn submission_is_sanitized_and_saved() {
        let state = test_state();
        let body = format!(
            "option_page={GROUP}&action=update&_wpnonce={}&{}=%3Cb%3Emy-client%3C%2Fb%3E&{}=0&{}=1&{}=jubla&{}=yes",
            state.form_token(),
            field("client_id"),
            field("enable_logging"),
            field("enable_logging"),
            field("endpoint_url"),
            field("is_admin"),
        );
        let response = create_router(state.clone()).oneshot(form(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/options-general.php?page=openid-connect-generic-settings&settings-updated=true"
        );

        let stored = state.db().get_option_values(OPTION_NAME).unwrap();
        assert_eq!(stored["client_id"], "my-client");
        assert_eq!(stored["enable_logging"], "1");
        assert_eq!(stored["endpoint_url"], "jubla");
        assert_eq!(stored["client_secret"], "");
        assert!(!stored.contains_key("is_admin"));

        let logs = state.db().get_logs(None).unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].log_type, "settings");
    }

    #[tokio::test]
    async fn logs_api_lists_and_clears() {
        let state = test_state();
        let app = create_router(state.clone());
        let body = format!(
            "option_page={GROUP}&_wpnonce={}&{}=1",
            state.form_token(),
            field("enable_logging")
        );
        app.clone().oneshot(form(body)).await.unwrap();

        let response = app.clone().oneshot(get("/api/logs?limit=5")).await.unwrap();
        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["count"], 1);
        assert_eq!(json["limit"], 5);
        assert_eq!(json["logs"][0]["log_type"], "settings");

        let request = Request::builder()
            .method("POST")
            .uri("/api/logs/clear")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(state.db().count_logs().unwrap(), 0);
    }

    #[tokio::test]
    async fn settings_api_describes_fields() {
        let response = create_router(test_state())
            .oneshot(get("/api/settings"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["option_name"], OPTION_NAME);
        assert_eq!(json["fields"].as_array().unwrap().len(), 6);
        assert_eq!(json["fields"][2]["type"], "select");
        assert_eq!(json["values"]["log_limit"], "1000");
        assert!(
            json["redirect_uri"]
                .as_str()
                .unwrap()
                .ends_with("admin-ajax.php?action=openid-connect-authorize")
        );
    }

    #[tokio::test]
    async fn unknown_route_returns_json_404() {
        let response = create_router(test_state())
            .oneshot(get("/wp-login.php"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["path"], "/wp-login.php");
    }
}
