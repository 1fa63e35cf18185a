//! Field schema of the settings page.

use serde::{Serialize, Serializer};

use crate::config::EnvOverrides;

/// Input type of a field. `Other` keeps types added by transforms; those
/// render through the text widget with the type as the input `type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Checkbox,
    Select,
    Number,
    Other(String),
}

impl FieldType {
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Text => "text",
            FieldType::Checkbox => "checkbox",
            FieldType::Select => "select",
            FieldType::Number => "number",
            FieldType::Other(s) => s,
        }
    }
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Group of fields shown together on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    ClientSettings,
    UserSettings,
    LogSettings,
}

impl Section {
    /// Registration order on the page.
    pub const ALL: [Section; 3] = [
        Section::ClientSettings,
        Section::UserSettings,
        Section::LogSettings,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Section::ClientSettings => "client_settings",
            Section::UserSettings => "user_settings",
            Section::LogSettings => "log_settings",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Section::ClientSettings => "Client Settings",
            Section::UserSettings => "WordPress User Settings",
            Section::LogSettings => "Log Settings",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Section::ClientSettings => "Enter your OpenID Connect identity provider settings.",
            Section::UserSettings => {
                "Modify the interaction between your Hitobito and WordPress the users."
            }
            Section::LogSettings => {
                "Log information about login attempts through OpenID Connect Generic."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// Display and validation metadata of one setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDefinition {
    pub key: String,
    /// Input element name, `{option_name}[{key}]`. Filled in by the page.
    pub name: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub section: Section,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    pub disabled: bool,
}

impl FieldDefinition {
    pub fn new(
        key: impl Into<String>,
        title: impl Into<String>,
        field_type: FieldType,
        section: Section,
    ) -> Self {
        Self {
            key: key.into(),
            name: String::new(),
            title: title.into(),
            description: String::new(),
            field_type,
            section,
            options: Vec::new(),
            example: None,
            disabled: false,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }

    pub fn options<'a>(mut self, options: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        self.options = options
            .into_iter()
            .map(|(value, label)| SelectOption {
                value: value.to_string(),
                label: label.to_string(),
            })
            .collect();
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// Adjusts the field list before the page uses it. Transforms run in the
/// order they were supplied.
pub type FieldTransform = Box<dyn Fn(&mut Vec<FieldDefinition>) + Send + Sync>;

/// The built-in schema. `disabled` reflects which overrides are defined.
pub fn default_fields(overrides: &EnvOverrides) -> Vec<FieldDefinition> {
    let locked = |key: &str| overrides.is_key_overridden(key);

    vec![
        FieldDefinition::new("client_id", "Client ID", FieldType::Text, Section::ClientSettings)
            .description(
                "The ID this client will be recognized as when connecting the to Identity provider server.",
            )
            .example("my-wordpress-client-id")
            .disabled(locked("client_id")),
        FieldDefinition::new(
            "client_secret",
            "Client Secret Key",
            FieldType::Text,
            Section::ClientSettings,
        )
        .description(
            "Arbitrary secret key the server expects from this client. Can be anything, but should be very unique.",
        )
        .disabled(locked("client_secret")),
        FieldDefinition::new(
            "endpoint_url",
            "Hitobito URL",
            FieldType::Select,
            Section::ClientSettings,
        )
        .description(
            "For testing please use: XXX.puzzle.ch/ and for production please use e.g. db.scout.ch",
        )
        .options([
            ("test", "TEST MiData [pbs.puzzle.ch]"),
            ("prod", "PRODUCTION MiData [db.scout.ch]"),
            ("jubla", "PRODUCTION jubla.db [db.jubla.ch]"),
            ("jublatest", "TEST jubla.db [jubla.puzzle.ch]"),
        ])
        .disabled(locked("endpoint_url")),
        FieldDefinition::new(
            "create_if_does_not_exist",
            "Create user if does not exist",
            FieldType::Checkbox,
            Section::UserSettings,
        )
        .description(
            "If the user identity is not linked to an existing WordPress user, it is created. \
             If this setting is not enabled, and if the user authenticates with an account which \
             is not linked to an existing WordPress user, then the authentication will fail.",
        )
        .disabled(locked("create_if_does_not_exist")),
        FieldDefinition::new(
            "enable_logging",
            "Enable Logging",
            FieldType::Checkbox,
            Section::LogSettings,
        )
        .description("Very simple log messages for debugging purposes.")
        .disabled(locked("enable_logging")),
        FieldDefinition::new("log_limit", "Log Limit", FieldType::Number, Section::LogSettings)
            .description(
                "Number of items to keep in the log. These logs are stored as an option in the \
                 database, so space is limited.",
            )
            .disabled(locked("log_limit")),
    ]
}
