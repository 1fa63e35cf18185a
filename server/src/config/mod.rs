//! Configuration management: defaults, environment overrides, option store.

pub mod app_config;
pub mod defaults;
pub mod manager;
pub mod overrides;

pub use app_config::AppConfig;
pub use manager::{OptionSettings, SettingsStore};
pub use overrides::EnvOverrides;

/// Namespace all plugin values are stored under. Input names are
/// `{OPTION_NAME}[{key}]`.
pub const OPTION_NAME: &str = "openid_connect_generic_settings";

/// Truthiness of a stored string value: `""` and `"0"` are false.
pub fn is_truthy(value: &str) -> bool {
    !value.is_empty() && value != "0"
}
