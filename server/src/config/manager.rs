//! Option store: DB-backed values with defaults and environment overrides.

use std::collections::BTreeMap;

use options_db::{Database, DbError};

use super::defaults::{DEFAULT_SETTINGS, get_default};
use super::overrides::EnvOverrides;

/// Named option values the settings page reads and rewrites.
pub trait SettingsStore {
    /// Namespace the values live under.
    fn option_name(&self) -> &str;

    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str);

    /// Every known key with its effective value.
    fn values(&self) -> BTreeMap<String, String>;
}

/// Values of one option name, loaded from [`Database`].
///
/// Reads resolve override → stored → default. Writes only touch the stored
/// map until [`OptionSettings::save`] is called.
pub struct OptionSettings {
    db: Database,
    option_name: String,
    stored: BTreeMap<String, String>,
    overrides: EnvOverrides,
}

impl OptionSettings {
    pub fn load(
        db: Database,
        option_name: impl Into<String>,
        overrides: EnvOverrides,
    ) -> Result<Self, DbError> {
        let option_name = option_name.into();
        let stored = db.get_option_values(&option_name)?;
        Ok(Self {
            db,
            option_name,
            stored,
            overrides,
        })
    }

    /// Write defaults for keys never stored. Returns how many were written.
    pub fn initialize_defaults(&mut self) -> Result<u32, DbError> {
        let mut written = 0u32;
        for (key, default) in DEFAULT_SETTINGS.iter() {
            if self.stored.contains_key(*key) {
                continue;
            }
            self.db.set_option_value(&self.option_name, key, default)?;
            self.stored.insert(key.to_string(), default.to_string());
            written += 1;
        }
        if written > 0 {
            tracing::info!(option = %self.option_name, "Initialized {written} default value(s)");
        }
        Ok(written)
    }

    /// Swap the whole stored map, as the save path of the form does.
    pub fn replace_values(&mut self, values: BTreeMap<String, String>) {
        self.stored = values;
    }

    /// Persist the stored map, replacing what the database holds.
    pub fn save(&self) -> Result<(), DbError> {
        self.db
            .replace_option_values(&self.option_name, &self.stored)?;
        tracing::debug!(option = %self.option_name, keys = self.stored.len(), "Option values saved");
        Ok(())
    }

    /// Values as stored, without defaults or overrides.
    pub fn stored_values(&self) -> &BTreeMap<String, String> {
        &self.stored
    }
}

impl SettingsStore for OptionSettings {
    fn option_name(&self) -> &str {
        &self.option_name
    }

    fn get(&self, key: &str) -> Option<String> {
        if let Some(v) = self.overrides.value_for_key(key) {
            return Some(v.to_string());
        }
        if let Some(v) = self.stored.get(key) {
            return Some(v.clone());
        }
        get_default(key).map(str::to_string)
    }

    fn set(&mut self, key: &str, value: &str) {
        self.stored.insert(key.to_string(), value.to_string());
    }

    fn values(&self) -> BTreeMap<String, String> {
        let mut values: BTreeMap<String, String> = DEFAULT_SETTINGS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        values.extend(self.stored.iter().map(|(k, v)| (k.clone(), v.clone())));
        values.extend(
            self.overrides
                .overridden_values()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        );
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OPTION_NAME;

    fn test_db() -> Database {
        Database::open_in_memory().expect("Failed to create test DB")
    }

    #[test]
    fn test_defaults_fill_missing_keys() {
        let settings = OptionSettings::load(test_db(), OPTION_NAME, EnvOverrides::default()).unwrap();
        assert_eq!(settings.get("endpoint_url"), Some("test".into()));
        assert_eq!(settings.get("log_limit"), Some("1000".into()));
        assert_eq!(settings.get("unknown_key"), None);
        assert!(settings.stored_values().is_empty());
    }

    #[test]
    fn test_initialize_defaults_skips_existing() {
        let db = test_db();
        db.set_option_value(OPTION_NAME, "log_limit", "50").unwrap();

        let mut settings = OptionSettings::load(db.clone(), OPTION_NAME, EnvOverrides::default()).unwrap();
        let written = settings.initialize_defaults().unwrap();
        assert_eq!(written as usize, DEFAULT_SETTINGS.len() - 1);
        assert_eq!(
            db.get_option_value(OPTION_NAME, "log_limit").unwrap(),
            Some("50".into())
        );
        assert_eq!(settings.initialize_defaults().unwrap(), 0);
    }

    #[test]
    fn test_override_wins_over_stored_value() {
        let db = test_db();
        db.set_option_value(OPTION_NAME, "client_id", "stored").unwrap();
        let overrides = EnvOverrides::from_pairs([("OIDC_CLIENT_ID", "fixed")]);

        let settings = OptionSettings::load(db, OPTION_NAME, overrides).unwrap();
        assert_eq!(settings.get("client_id"), Some("fixed".into()));
        assert_eq!(settings.values()["client_id"], "fixed");
        assert_eq!(settings.stored_values()["client_id"], "stored");
    }

    #[test]
    fn test_replace_and_save_round_trip() {
        let db = test_db();
        db.set_option_value(OPTION_NAME, "stale", "x").unwrap();

        let mut settings = OptionSettings::load(db.clone(), OPTION_NAME, EnvOverrides::default()).unwrap();
        let mut values = BTreeMap::new();
        values.insert("client_id".to_string(), "abc".to_string());
        settings.replace_values(values.clone());
        settings.save().unwrap();

        let reloaded = OptionSettings::load(db, OPTION_NAME, EnvOverrides::default()).unwrap();
        assert_eq!(reloaded.stored_values(), &values);
        assert_eq!(reloaded.get("stale"), None);
    }

    #[test]
    fn test_set_is_visible_before_save() {
        let db = test_db();
        let mut settings = OptionSettings::load(db.clone(), OPTION_NAME, EnvOverrides::default()).unwrap();
        settings.set("client_secret", "s3cret");
        assert_eq!(settings.get("client_secret"), Some("s3cret".into()));
        assert_eq!(db.get_option_value(OPTION_NAME, "client_secret").unwrap(), None);
    }
}
