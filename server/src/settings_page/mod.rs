//! Admin settings page: field schema, registration, rendering and
//! sanitization of submitted values.
//!
//! The page is request-scoped. It is built from an injected settings store
//! and logger, registers its sections and fields into a [`Registration`],
//! renders the form from that registration, and reduces a submitted form to
//! exactly the declared keys.

pub mod fields;
pub mod sanitize;
pub mod widgets;

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::Serialize;
use serde_json::json;

use crate::config::{AppConfig, EnvOverrides, SettingsStore, is_truthy};
use crate::templates::{SETTINGS_PAGE, Templates};

pub use fields::{FieldDefinition, FieldTransform, FieldType, Section, SelectOption};
pub use sanitize::{collect_submitted, escape_html, sanitize_text_field};
pub use widgets::Widget;

/// Slug the page is mounted under.
pub const MENU_SLUG: &str = "openid-connect-generic-settings";
/// Endpoint the form posts to.
pub const FORM_ACTION: &str = "options.php";

const PAGE_TITLE: &str = "Hitobito Auth";
const CAPABILITY: &str = "manage_options";

/// Settings page failures. Only rendering plumbing can fail.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("Template error: {0}")]
    Template(#[from] Box<handlebars::TemplateError>),

    #[error("Render error: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error("Store error: {0}")]
    Store(#[from] options_db::DbError),
}

/// Source of the log table embedded under the form.
pub trait LogTable {
    fn logs_table(&self) -> Result<String, PageError>;
}

/// Menu entry the host mounts the page under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuPage {
    pub page_title: &'static str,
    pub menu_title: &'static str,
    pub capability: &'static str,
    pub menu_slug: &'static str,
}

#[derive(Debug, Clone)]
pub struct FieldRegistration {
    pub field: FieldDefinition,
    pub widget: Widget,
}

#[derive(Debug, Clone)]
pub struct SectionRegistration {
    pub section: Section,
    pub fields: Vec<FieldRegistration>,
}

/// Result of the registration pass.
#[derive(Debug, Clone)]
pub struct Registration {
    pub setting_group: String,
    pub option_name: String,
    pub sections: Vec<SectionRegistration>,
}

impl Registration {
    pub fn field(&self, key: &str) -> Option<&FieldRegistration> {
        self.sections
            .iter()
            .flat_map(|s| s.fields.iter())
            .find(|f| f.field.key == key)
    }
}

/// Query flags of a page request.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageQuery {
    /// Dump the current values under the form.
    pub debug: bool,
    /// Show the "Settings saved." notice.
    pub settings_updated: bool,
}

/// What the page needs from the running service besides store and logger.
#[derive(Clone, Copy)]
pub struct PageEnv<'a> {
    pub config: &'a AppConfig,
    pub overrides: &'a EnvOverrides,
    pub templates: &'a Templates,
    pub transforms: &'a [FieldTransform],
    /// Submitted back as `_wpnonce`; a save without it is refused.
    pub form_token: &'a str,
}

pub struct SettingsPage<'a, S, L> {
    settings: S,
    logger: L,
    env: PageEnv<'a>,
    fields: Vec<FieldDefinition>,
    setting_group: String,
}

impl<'a, S: SettingsStore, L: LogTable> SettingsPage<'a, S, L> {
    pub fn new(settings: S, logger: L, env: PageEnv<'a>) -> Self {
        let option_name = settings.option_name().to_string();
        let setting_group = format!("{option_name}-group");

        let mut fields = fields::default_fields(env.overrides);
        for transform in env.transforms {
            transform(&mut fields);
        }
        for field in &mut fields {
            field.name = format!("{option_name}[{}]", field.key);
        }

        tracing::debug!(fields = fields.len(), "Settings page constructed");
        Self {
            settings,
            logger,
            env,
            fields,
            setting_group,
        }
    }

    pub fn admin_menu(&self) -> MenuPage {
        MenuPage {
            page_title: PAGE_TITLE,
            menu_title: PAGE_TITLE,
            capability: CAPABILITY,
            menu_slug: MENU_SLUG,
        }
    }

    /// Register the setting, its sections and a widget for every field.
    pub fn admin_init(&mut self) -> Registration {
        let mut sections: Vec<SectionRegistration> = Section::ALL
            .iter()
            .map(|&section| SectionRegistration {
                section,
                fields: Vec::new(),
            })
            .collect();

        for field in &self.fields {
            if self.settings.get(&field.key).is_none() {
                self.settings.set(&field.key, "");
            }

            let registration = FieldRegistration {
                field: field.clone(),
                widget: Widget::for_type(&field.field_type),
            };
            if let Some(section) = sections.iter_mut().find(|s| s.section == field.section) {
                section.fields.push(registration);
            }
        }

        Registration {
            setting_group: self.setting_group.clone(),
            option_name: self.settings.option_name().to_string(),
            sections,
        }
    }

    /// Reduce submitted values to exactly the declared keys.
    pub fn sanitize_settings(&self, input: &BTreeMap<String, String>) -> BTreeMap<String, String> {
        self.fields
            .iter()
            .map(|field| {
                let value = input
                    .get(&field.key)
                    .map(|v| sanitize_text_field(v.trim_ascii()))
                    .unwrap_or_default();
                (field.key.clone(), value)
            })
            .collect()
    }

    /// Callback URL to configure at the identity provider.
    pub fn redirect_uri(&self) -> String {
        let alternate = self
            .settings
            .get("alternate_redirect_uri")
            .is_some_and(|v| is_truthy(&v));
        if alternate {
            self.env.config.site_url("/openid-connect-authorize")
        } else {
            self.env
                .config
                .admin_url("admin-ajax.php?action=openid-connect-authorize")
        }
    }

    pub fn logging_enabled(&self) -> bool {
        self.settings
            .get("enable_logging")
            .is_some_and(|v| is_truthy(&v))
    }

    /// Render the whole page from `registration`.
    pub fn settings_page(
        &self,
        registration: &Registration,
        query: PageQuery,
    ) -> Result<String, PageError> {
        let mut sections = Vec::with_capacity(registration.sections.len());
        for section in &registration.sections {
            let mut rows = Vec::with_capacity(section.fields.len());
            for reg in &section.fields {
                let value = self.settings.get(&reg.field.key).unwrap_or_default();
                rows.push(json!({
                    "key": reg.field.key,
                    "title": reg.field.title,
                    "html": reg.widget.render(self.env.templates, &reg.field, &value)?,
                }));
            }
            sections.push(json!({
                "id": section.section.id(),
                "title": section.section.title(),
                "description": section.section.description(),
                "fields": rows,
            }));
        }

        let debug_dump = (query.debug && self.env.config.allow_debug_dump)
            .then(|| dump_values(&self.settings.values()));
        let logs_table = if self.logging_enabled() {
            Some(self.logger.logs_table()?)
        } else {
            None
        };

        self.env.templates.render(
            SETTINGS_PAGE,
            &json!({
                "page_title": PAGE_TITLE,
                "updated": query.settings_updated,
                "form_action": FORM_ACTION,
                "option_page": registration.setting_group,
                "form_token": self.env.form_token,
                "referer": format!("/options-general.php?page={MENU_SLUG}"),
                "sections": sections,
                "debug_dump": debug_dump,
                "redirect_uri": self.redirect_uri(),
                "logs_table": logs_table,
            }),
        )
    }

    pub fn setting_group(&self) -> &str {
        &self.setting_group
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn settings(&self) -> &S {
        &self.settings
    }

    /// Give the store back, e.g. to persist sanitized values.
    pub fn into_settings(self) -> S {
        self.settings
    }
}

fn dump_values(values: &BTreeMap<String, String>) -> String {
    let mut out = String::from("array(\n");
    for (key, value) in values {
        let _ = writeln!(out, "  [{key:?}] => {value:?}");
    }
    out.push(')');
    out
}
