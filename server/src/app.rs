use std::sync::Arc;

use options_db::{Database, DbError};
use tokio_util::sync::CancellationToken;

use crate::config::{AppConfig, EnvOverrides, OPTION_NAME, OptionSettings};
use crate::logger::OptionLogger;
use crate::settings_page::{FieldTransform, PageEnv, SettingsPage};
use crate::templates::Templates;

/// Application shared state accessible from axum handlers.
#[derive(Clone)]
pub struct SharedState {
    inner: Arc<SharedStateInner>,
}

struct SharedStateInner {
    db: Database,
    config: AppConfig,
    overrides: EnvOverrides,
    templates: Arc<Templates>,
    /// Applied to the field list of every page, in order.
    transforms: Vec<FieldTransform>,
    /// Per-process token every settings form must carry back.
    form_token: String,
    shutdown_token: CancellationToken,
}

impl SharedState {
    pub fn new(
        db: Database,
        config: AppConfig,
        overrides: EnvOverrides,
        templates: Templates,
        transforms: Vec<FieldTransform>,
    ) -> Self {
        Self {
            inner: Arc::new(SharedStateInner {
                db,
                config,
                overrides,
                templates: Arc::new(templates),
                transforms,
                form_token: uuid::Uuid::new_v4().simple().to_string(),
                shutdown_token: CancellationToken::new(),
            }),
        }
    }

    pub fn server_port(&self) -> u16 {
        self.inner.config.server_port
    }

    pub fn db(&self) -> &Database {
        &self.inner.db
    }

    pub fn overrides(&self) -> &EnvOverrides {
        &self.inner.overrides
    }

    pub fn form_token(&self) -> &str {
        &self.inner.form_token
    }

    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.inner.shutdown_token
    }

    /// Fresh view of the stored option values.
    pub fn load_settings(&self) -> Result<OptionSettings, DbError> {
        OptionSettings::load(self.inner.db.clone(), OPTION_NAME, self.inner.overrides.clone())
    }

    pub fn logger_for(&self, settings: &OptionSettings) -> OptionLogger {
        OptionLogger::from_settings(self.inner.db.clone(), self.inner.templates.clone(), settings)
    }

    /// Build a request-scoped settings page over freshly loaded values.
    pub fn settings_page(&self) -> Result<SettingsPage<'_, OptionSettings, OptionLogger>, DbError> {
        let settings = self.load_settings()?;
        let logger = self.logger_for(&settings);
        Ok(SettingsPage::new(settings, logger, self.page_env()))
    }

    fn page_env(&self) -> PageEnv<'_> {
        PageEnv {
            config: &self.inner.config,
            overrides: &self.inner.overrides,
            templates: &self.inner.templates,
            transforms: &self.inner.transforms,
            form_token: &self.inner.form_token,
        }
    }
}
