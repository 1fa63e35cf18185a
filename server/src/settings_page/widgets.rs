//! Form controls, one per field type.

use serde_json::json;

use super::PageError;
use super::fields::{FieldDefinition, FieldType};
use super::sanitize::escape_html;
use crate::templates::{CHECKBOX, SELECT, TEXT_FIELD, Templates};

/// Render callback bound to a field at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Widget {
    TextField,
    Checkbox,
    Select,
}

impl Widget {
    /// Unknown types fall back to the text field.
    pub fn for_type(field_type: &FieldType) -> Self {
        match field_type {
            FieldType::Checkbox => Widget::Checkbox,
            FieldType::Select => Widget::Select,
            FieldType::Text | FieldType::Number | FieldType::Other(_) => Widget::TextField,
        }
    }

    /// Render `field` with `value` as the current stored value.
    pub fn render(
        self,
        templates: &Templates,
        field: &FieldDefinition,
        value: &str,
    ) -> Result<String, PageError> {
        match self {
            Widget::TextField => text_field(templates, field, value),
            Widget::Checkbox => checkbox(templates, field, value),
            Widget::Select => select(templates, field, value),
        }
    }
}

fn text_field(templates: &Templates, field: &FieldDefinition, value: &str) -> Result<String, PageError> {
    templates.render(
        TEXT_FIELD,
        &json!({
            "type": field.field_type.as_str(),
            "key": field.key,
            "name": field.name,
            "disabled": field.disabled,
            "value": escape_html(value),
            "description": field.description,
            "example": field.example,
        }),
    )
}

/// The hidden input makes an unchecked box submit `0`. A disabled box is not
/// submitted at all, so its hidden input carries the stored value instead.
fn checkbox(templates: &Templates, field: &FieldDefinition, value: &str) -> Result<String, PageError> {
    let hidden_value = if field.disabled { int_value(value) } else { 0 };
    templates.render(
        CHECKBOX,
        &json!({
            "key": field.key,
            "name": field.name,
            "disabled": field.disabled,
            "hidden_value": hidden_value.to_string(),
            "checked": value == "1",
            "description": field.description,
            "example": field.example,
        }),
    )
}

fn select(templates: &Templates, field: &FieldDefinition, value: &str) -> Result<String, PageError> {
    let options: Vec<_> = field
        .options
        .iter()
        .map(|opt| {
            json!({
                "value": opt.value,
                "label": opt.label,
                "selected": opt.value == value,
            })
        })
        .collect();
    templates.render(
        SELECT,
        &json!({
            "key": field.key,
            "name": field.name,
            "disabled": field.disabled,
            "options": options,
            "description": field.description,
            "example": field.example,
        }),
    )
}

/// Leading integer of `value`, or 0.
fn int_value(value: &str) -> i64 {
    let s = value.trim_start();
    let digits_end = s
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
        .map_or(s.len(), |(i, _)| i);
    s[..digits_end].parse().unwrap_or(0)
}
