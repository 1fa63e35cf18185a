//! Deploy-time overrides read from the environment.
//!
//! A defined variable fixes the value of its key and disables the matching
//! form control.

use std::collections::BTreeMap;

/// Override variable name → option key.
pub const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("OIDC_CLIENT_ID", "client_id"),
    ("OIDC_CLIENT_SECRET", "client_secret"),
    ("OIDC_ENDPOINT_URL", "endpoint_url"),
    ("OIDC_CREATE_IF_DOES_NOT_EXIST", "create_if_does_not_exist"),
    ("OIDC_ENABLE_LOGGING", "enable_logging"),
    ("OIDC_LOG_LIMIT", "log_limit"),
];

#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    defined: BTreeMap<String, String>,
}

impl EnvOverrides {
    /// Read every known override variable from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read every known override variable through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defined = ENV_OVERRIDES
            .iter()
            .filter_map(|(name, _)| lookup(name).map(|v| (name.to_string(), v)))
            .collect();
        Self { defined }
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let defined = pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self { defined }
    }

    /// Whether the override variable `name` is defined (even if empty).
    pub fn is_defined(&self, name: &str) -> bool {
        self.defined.contains_key(name)
    }

    /// Override variable governing `key`, if any.
    pub fn constant_for(key: &str) -> Option<&'static str> {
        ENV_OVERRIDES
            .iter()
            .find(|(_, k)| *k == key)
            .map(|(name, _)| *name)
    }

    /// Whether the value of `key` is fixed by a defined override.
    pub fn is_key_overridden(&self, key: &str) -> bool {
        Self::constant_for(key).is_some_and(|name| self.is_defined(name))
    }

    /// Override value for `key`, if its variable is defined.
    pub fn value_for_key(&self, key: &str) -> Option<&str> {
        Self::constant_for(key)
            .and_then(|name| self.defined.get(name))
            .map(String::as_str)
    }

    /// Keys whose value is fixed by an override, with that value.
    pub fn overridden_values(&self) -> impl Iterator<Item = (&'static str, &str)> {
        ENV_OVERRIDES.iter().filter_map(|(name, key)| {
            self.defined.get(*name).map(|v| (*key, v.as_str()))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.defined.is_empty()
    }
}
