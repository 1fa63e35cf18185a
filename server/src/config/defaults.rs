//! Default values for every stored option key.

use std::collections::BTreeMap;
use std::sync::LazyLock;

const DEFS: &[(&str, &str)] = &[
    ("client_id", ""),
    ("client_secret", ""),
    ("endpoint_url", "test"),
    ("create_if_does_not_exist", "1"),
    ("enable_logging", "0"),
    ("log_limit", "1000"),
    ("alternate_redirect_uri", "0"),
];

/// Default values indexed by key.
pub static DEFAULT_SETTINGS: LazyLock<BTreeMap<&'static str, &'static str>> =
    LazyLock::new(|| DEFS.iter().copied().collect());

/// Get the default value for a setting key, or `None` if not defined.
pub fn get_default(key: &str) -> Option<&'static str> {
    DEFAULT_SETTINGS.get(key).copied()
}

/// Log limit used when the stored value is missing or not a number.
pub const DEFAULT_LOG_LIMIT: usize = 1000;
