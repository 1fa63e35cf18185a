use std::path::PathBuf;

use options_db::Database;

use crate::config::{AppConfig, EnvOverrides, OPTION_NAME, OptionSettings, SettingsStore};

/// Foundation init (fatal on error): environment, database, defaults, config.
pub fn init_foundation() -> Result<(Database, AppConfig, EnvOverrides), anyhow::Error> {
    load_dotenv();
    let dir = data_dir();
    std::fs::create_dir_all(&dir)?;

    let db_path = dir.join("options.db");
    tracing::info!("Opening database at {}", db_path.display());
    let db = Database::open(&db_path)?;

    let overrides = EnvOverrides::from_env();
    if !overrides.is_empty() {
        let keys: Vec<_> = overrides.overridden_values().map(|(k, _)| k).collect();
        tracing::info!("Environment overrides active for {keys:?}");
    }

    let mut settings = OptionSettings::load(db.clone(), OPTION_NAME, overrides.clone())?;
    settings.initialize_defaults()?;

    let missing: Vec<_> = ["client_id", "client_secret"]
        .into_iter()
        .filter(|key| settings.get(key).unwrap_or_default().is_empty())
        .collect();
    if !missing.is_empty() {
        tracing::warn!("Missing settings: {missing:?}");
    }

    let config = AppConfig::load();
    tracing::info!("Settings loaded (port={})", config.server_port);
    Ok((db, config, overrides))
}

/// Determine the data directory for the application.
/// Priority: OIDC_ADMIN_DATA_DIR env var > ~/.oidc-admin
fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("OIDC_ADMIN_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".oidc-admin")
}

/// Load .env from multiple candidate paths.
fn load_dotenv() {
    let candidates = [".env", "../.env", "../../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::info!("No .env file found, using system environment variables");
}
