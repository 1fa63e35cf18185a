//! Runtime application configuration loaded from the environment.

/// Runtime configuration of the admin service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_port: u16,
    /// Public root of the site, without trailing slash.
    pub site_url: String,
    /// Admin root of the site, with trailing slash.
    pub admin_url: String,
    /// Honor the `debug` query parameter on the settings page.
    pub allow_debug_dump: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_port: 8080,
            site_url: "http://localhost:8080".into(),
            admin_url: "http://localhost:8080/wp-admin/".into(),
            allow_debug_dump: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from process environment variables.
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, falling back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let g = |key: &str| -> String { lookup(key).unwrap_or_default() };
        let defaults = Self::default();

        let site_url = {
            let s = g("OIDC_ADMIN_SITE_URL");
            if s.trim().is_empty() {
                defaults.site_url
            } else {
                s.trim().trim_end_matches('/').to_string()
            }
        };
        let admin_url = {
            let s = g("OIDC_ADMIN_ADMIN_URL");
            if s.trim().is_empty() {
                format!("{site_url}/wp-admin/")
            } else {
                format!("{}/", s.trim().trim_end_matches('/'))
            }
        };

        Self {
            server_port: parse_u16(&g("OIDC_ADMIN_PORT"), defaults.server_port),
            site_url,
            admin_url,
            allow_debug_dump: g("OIDC_ADMIN_DEBUG") == "true",
        }
    }

    /// Absolute URL of `path` under the site root.
    pub fn site_url(&self, path: &str) -> String {
        format!("{}/{}", self.site_url, path.trim_start_matches('/'))
    }

    /// Absolute URL of `path` under the admin root.
    pub fn admin_url(&self, path: &str) -> String {
        format!("{}{}", self.admin_url, path.trim_start_matches('/'))
    }
}

fn parse_u16(s: &str, default: u16) -> u16 {
    if s.is_empty() {
        return default;
    }
    s.parse().unwrap_or(default)
}
