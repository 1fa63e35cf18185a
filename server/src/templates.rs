//! Handlebars templates for the settings page, its widgets and the log table.
//!
//! `{{value}}` is HTML-escaped; `{{{value}}}` is reserved for fragments this
//! crate rendered itself and for values already passed through
//! [`escape_html`](crate::settings_page::escape_html).

use handlebars::Handlebars;
use serde::Serialize;

use crate::settings_page::PageError;

pub const TEXT_FIELD: &str = "text_field";
pub const CHECKBOX: &str = "checkbox";
pub const SELECT: &str = "select";
pub const FIELD_DESCRIPTION: &str = "field_description";
pub const SETTINGS_PAGE: &str = "settings_page";
pub const LOGS_TABLE: &str = "logs_table";

const TEXT_FIELD_TPL: &str = r#"<input type="{{type}}" id="{{key}}" class="large-text{{#if disabled}} disabled{{/if}}" name="{{name}}"{{#if disabled}} disabled{{/if}} value="{{{value}}}">
{{> field_description}}"#;

const CHECKBOX_TPL: &str = r#"<input type="hidden" name="{{name}}" value="{{hidden_value}}">
<input type="checkbox" id="{{key}}" name="{{name}}"{{#if disabled}} disabled="disabled"{{/if}} value="1"{{#if checked}} checked="checked"{{/if}}>
{{> field_description}}"#;

const SELECT_TPL: &str = r#"<select id="{{key}}" name="{{name}}"{{#if disabled}} disabled{{/if}}>
{{#each options}}<option value="{{value}}"{{#if selected}} selected="selected"{{/if}}>{{label}}</option>
{{/each}}</select>
{{> field_description}}"#;

const FIELD_DESCRIPTION_TPL: &str = r#"<p class="description">{{description}}{{#if example}}<br/><strong>Example: </strong><code>{{example}}</code>{{/if}}</p>"#;

const SETTINGS_PAGE_TPL: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{{page_title}}</title>
</head>
<body>
<div class="wrap">
<h2>{{page_title}}</h2>
{{#if updated}}<div id="setting-error-settings_updated" class="notice notice-success settings-error"><p><strong>Settings saved.</strong></p></div>
{{/if}}<form method="post" action="{{form_action}}">
<input type="hidden" name="option_page" value="{{option_page}}">
<input type="hidden" name="action" value="update">
<input type="hidden" name="_wpnonce" value="{{form_token}}">
<input type="hidden" name="_wp_http_referer" value="{{referer}}">
{{#each sections}}<h2>{{title}}</h2>
<p>{{description}}</p>
<table class="form-table" role="presentation">
{{#each fields}}<tr><th scope="row"><label for="{{key}}">{{title}}</label></th><td>{{{html}}}</td></tr>
{{/each}}</table>
{{/each}}<p class="submit"><input type="submit" name="submit" id="submit" class="button button-primary" value="Save Changes"></p>
{{#if debug_dump}}<pre class="debug-dump">{{debug_dump}}</pre>
{{/if}}</form>
<h4>Notes</h4>
<p class="description"><strong>Redirect URL:</strong> <code>{{redirect_uri}}</code></p>
<p class="description"><strong>Login Button Shortcode</strong> <code>[openid_connect_generic_login_button]</code></p>
<p class="description"><strong>Authentication URL Shortcode</strong> <code>[openid_connect_generic_auth_url]</code></p>
<p class="description"><strong>MiData Docu</strong> <code><a href="https://docu.scout.ch/">docu.scout.ch/</a></code></p>
<p class="description"><strong>This Plugin was developed by Schlumpf and Vivo during the Hitobito Hackathon 2025.</strong></p>
<p class="description"><strong>(c) 2025 Swiss Guide and Scout Movement</strong></p>
{{#if logs_table}}<h2>Logs</h2>
<div id="logger-table-wrapper">{{{logs_table}}}</div>
{{/if}}</div>
</body>
</html>
"#;

const LOGS_TABLE_TPL: &str = r#"<table id="logger-table" class="wp-list-table widefat fixed striped posts">
<thead><tr><th class="col-details">Details</th><th class="col-data">Data</th></tr></thead>
<tbody>
{{#each logs}}<tr>
<td class="col-details"><div><strong>Type: </strong>{{log_type}}</div><div><strong>Date: </strong>{{date}}</div><div><strong>URI: </strong>{{uri}}</div></td>
<td class="col-data"><pre>{{message}}</pre></td>
</tr>
{{else}}<tr><td colspan="2">No logs yet.</td></tr>
{{/each}}</tbody>
</table>"#;

/// Registered templates, built once at startup and shared.
pub struct Templates {
    handlebars: Handlebars<'static>,
}

impl Templates {
    pub fn new() -> Result<Self, PageError> {
        let mut handlebars = Handlebars::new();

        for (name, source) in [
            (TEXT_FIELD, TEXT_FIELD_TPL),
            (CHECKBOX, CHECKBOX_TPL),
            (SELECT, SELECT_TPL),
            (FIELD_DESCRIPTION, FIELD_DESCRIPTION_TPL),
            (SETTINGS_PAGE, SETTINGS_PAGE_TPL),
            (LOGS_TABLE, LOGS_TABLE_TPL),
        ] {
            handlebars
                .register_template_string(name, source)
                .map_err(Box::new)?;
        }

        Ok(Self { handlebars })
    }

    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String, PageError> {
        Ok(self.handlebars.render(name, data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_templates_register() {
        let templates = Templates::new().unwrap();
        let html = templates
            .render(
                FIELD_DESCRIPTION,
                &serde_json::json!({ "description": "Plain", "example": null }),
            )
            .unwrap();
        assert_eq!(html, r#"<p class="description">Plain</p>"#);
    }

    #[test]
    fn test_values_are_escaped() {
        let templates = Templates::new().unwrap();
        let html = templates
            .render(
                FIELD_DESCRIPTION,
                &serde_json::json!({ "description": "<b>bold</b>", "example": "<i>" }),
            )
            .unwrap();
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
        assert!(html.contains("<code>&lt;i&gt;</code>"));
        assert!(!html.contains("<b>"));
    }
}
