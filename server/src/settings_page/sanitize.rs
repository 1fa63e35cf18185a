//! Reduction of submitted form values to plain text.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

static RE_SCRIPT_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style)[^>]*?>.*?</(script|style)>").unwrap()
});
static RE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());
static RE_BREAKS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\r\n\t ]+").unwrap());
static RE_SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(" +").unwrap());
static RE_OCTET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"%[a-fA-F0-9]{2}").unwrap());
static RE_ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^&(?:#[0-9]+|#[xX][0-9a-fA-F]+|[A-Za-z][A-Za-z0-9]*);").unwrap()
});

/// Reduce a submitted value to a single line of plain text.
pub fn sanitize_text_field(value: &str) -> String {
    let mut text = if value.contains('<') {
        strip_all_tags(&escape_lone_less_than(value))
    } else {
        value.to_string()
    };

    text = RE_BREAKS.replace_all(&text, " ").trim_ascii().to_string();

    let mut found = false;
    while let Some(m) = RE_OCTET.find(&text) {
        let range = m.range();
        text.replace_range(range, "");
        found = true;
    }
    if found {
        text = RE_SPACES.replace_all(&text, " ").trim_ascii().to_string();
    }

    text
}

/// HTML-escape `text` for element content or attribute values. Entities
/// already present are kept, so escaping twice changes nothing.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, c) in text.char_indices() {
        match c {
            '&' if RE_ENTITY.is_match(&text[i..]) => out.push('&'),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape every `<…` span that is not closed by `>` before the next `<` or
/// the end of input. Closed tags are left for [`strip_all_tags`].
fn escape_lone_less_than(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(pos) = rest.find('<') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        let end = tail[1..].find(['<', '>']).map_or(tail.len(), |i| i + 1);
        if tail[end..].starts_with('>') {
            out.push_str(&tail[..=end]);
            rest = &tail[end + 1..];
        } else {
            out.push_str(&escape_html(&tail[..end]));
            rest = &tail[end..];
        }
    }
    out.push_str(rest);
    out
}

fn strip_all_tags(value: &str) -> String {
    let without_blocks = RE_SCRIPT_STYLE.replace_all(value, "");
    let without_tags = RE_TAG.replace_all(&without_blocks, "");
    RE_BREAKS.replace_all(&without_tags, " ").trim_ascii().to_string()
}

/// Collect `{option_name}[key]` pairs of a form body. Later pairs win, so a
/// checked checkbox overrides the hidden input rendered before it.
pub fn collect_submitted(option_name: &str, pairs: &[(String, String)]) -> BTreeMap<String, String> {
    let prefix = format!("{option_name}[");
    pairs
        .iter()
        .filter_map(|(name, value)| {
            let key = name.strip_prefix(&prefix)?.strip_suffix(']')?;
            (!key.is_empty() && !key.contains('[')).then(|| (key.to_string(), value.clone()))
        })
        .collect()
}
