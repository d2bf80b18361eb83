//! Frontmatter codec: split a raw document into `(frontmatter, body)` and
//! reassemble it with a deterministic, bit-stable wire format.
//!
//! The wire format is a `---` line, one `key: value` line per field in
//! insertion order, a closing `---` line, one blank line, then the body:
//!
//! ```text
//! ---
//! processed_datetime: 2026-08-25T10:00:00Z
//! note_hash: sha256:9330...
//! summary: Grocery run
//! tags: ["#errand", "#home"]
//! ---
//!
//! - Buy milk
//! ```
//!
//! Scalars are written bare where YAML-safe and as JSON-style double-quoted
//! strings otherwise (JSON string syntax is a YAML subset); arrays render
//! inline with every string element quoted. Parsing accepts any YAML
//! mapping, so hand-edited frontmatter still round-trips.

use serde_json::{Map, Value};

const DELIMITER_LINE: &str = "---\n";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("frontmatter block is never closed")]
    Unterminated,
    #[error("frontmatter block is not a YAML mapping: {0}")]
    InvalidYaml(String),
}

/// Ordered string-keyed metadata mapping.
///
/// Key order is preserved end to end: fields parse in document order and
/// serialize in insertion order, which keeps the wire format deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frontmatter {
    fields: Map<String, Value>,
}

impl Frontmatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// String value of `key`, if present and a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Boolean value of `key`, also accepting the quoted forms `"true"` /
    /// `"false"` (any case) that user-authored frontmatter often carries.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            Value::Bool(flag) => Some(*flag),
            Value::String(s) if s.eq_ignore_ascii_case("true") => Some(true),
            Value::String(s) if s.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        }
    }

    /// Insert or replace a field. A replaced key keeps its original
    /// position; new keys append.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.fields.insert(key.into(), value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }
}

/// Split a raw document into frontmatter and body.
///
/// A document without an opening delimiter parses as an empty mapping with
/// the whole text as body. At most one blank line after the closing
/// delimiter is consumed (the one [`serialize`] emits), so bodies keep any
/// further leading whitespace.
pub fn parse(raw: &str) -> Result<(Frontmatter, &str), ParseError> {
    let Some(rest) = raw.strip_prefix(DELIMITER_LINE) else {
        return Ok((Frontmatter::new(), raw));
    };

    let (block, after) = if let Some(after) = rest.strip_prefix(DELIMITER_LINE) {
        ("", after)
    } else if rest == "---" {
        ("", "")
    } else if let Some(end) = rest.find("\n---\n") {
        (&rest[..end], &rest[end + 5..])
    } else if let Some(block) = rest.strip_suffix("\n---") {
        (block, "")
    } else {
        return Err(ParseError::Unterminated);
    };

    let frontmatter = if block.trim().is_empty() {
        Frontmatter::new()
    } else {
        let fields: Map<String, Value> = serde_yaml::from_str(block)
            .map_err(|err| ParseError::InvalidYaml(err.to_string()))?;
        Frontmatter::from_map(fields)
    };

    let body = after.strip_prefix('\n').unwrap_or(after);
    Ok((frontmatter, body))
}

/// Lenient variant: any parse failure yields an empty mapping and the whole
/// document as body.
pub fn parse_lenient(raw: &str) -> (Frontmatter, &str) {
    parse(raw).unwrap_or((Frontmatter::new(), raw))
}

/// Reassemble a document. Inverse of [`parse`] for mappings whose values are
/// scalars, strings, or arrays.
pub fn serialize(frontmatter: &Frontmatter, body: &str) -> String {
    let mut out = String::from(DELIMITER_LINE);
    for (key, value) in frontmatter.iter() {
        out.push_str(key);
        out.push_str(": ");
        render_value(value, &mut out);
        out.push('\n');
    }
    out.push_str("---\n\n");
    out.push_str(body);
    out
}

fn render_value(value: &Value, out: &mut String) {
    match value {
        Value::String(s) if plain_yaml_safe(s) => out.push_str(s),
        Value::Array(items) => {
            out.push('[');
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    out.push_str(", ");
                }
                // Array strings are always quoted on the wire.
                out.push_str(&item.to_string());
            }
            out.push(']');
        }
        // Everything else (quoted strings, numbers, bools, null, nested
        // structures) renders in JSON form, which YAML parses back to the
        // same value.
        other => out.push_str(&other.to_string()),
    }
}

/// Whether a string can appear unquoted after `key: ` and survive a YAML
/// round trip unchanged. Deliberately conservative: over-quoting costs
/// nothing, under-quoting corrupts the document.
fn plain_yaml_safe(s: &str) -> bool {
    let Some(first) = s.chars().next() else {
        return false;
    };
    if s.trim() != s {
        return false;
    }
    // Would resolve to a non-string scalar. The yes/no/on/off forms are for
    // YAML 1.1 readers of our output, not our own parser.
    if s.parse::<f64>().is_ok()
        || matches!(
            s.to_ascii_lowercase().as_str(),
            "true" | "false" | "null" | "~" | "yes" | "no" | "on" | "off"
        )
        || s.starts_with("0x")
        || s.starts_with("0o")
        || s.starts_with("0b")
    {
        return false;
    }
    if "#&*!|>'\"%@`?:-,[]{}".contains(first) {
        return false;
    }
    if s.contains(": ") || s.contains(" #") || s.ends_with(':') {
        return false;
    }
    !s.chars()
        .any(|c| matches!(c, '\n' | '\r' | '\t' | '"' | '\\' | '[' | ']' | '{' | '}' | ','))
}
