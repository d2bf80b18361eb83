//! Validation of the model's structured output.
//!
//! The provider is asked for a JSON object with `content` and `metadata`
//! fields, but the response is only semi-trusted: models wrap JSON in code
//! fences, drop the `#` off hashtags, or return prose. This module is the
//! last line of defense — it either yields a well-formed
//! [`EnhancementResponse`] or a [`ValidationError`] naming what was wrong.
//!
//! Policy is lenient where the intent is recoverable (code fences stripped,
//! bare tags get `#` prepended) and strict where it is not (missing fields,
//! non-string tags). Unknown `metadata` fields pass through untouched; extra
//! structure never fails validation.

use serde_json::{Map, Value};

/// Why a raw response was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The response text is not parseable JSON (after fence stripping).
    #[error("malformed JSON: {0}")]
    MalformedJson(String),

    /// A required field is missing or has the wrong type. Carries the field
    /// path, e.g. `metadata.tags`.
    #[error("schema error: {0}")]
    SchemaError(String),
}

/// The model's validated output: enhanced body text plus open-schema
/// metadata destined for frontmatter.
#[derive(Debug, Clone, PartialEq)]
pub struct EnhancementResponse {
    /// Enhanced note body. Replaces the original on persist.
    pub content: String,
    /// Provider metadata in response order. Always contains a normalized
    /// `tags` array; any other fields pass through unvalidated.
    pub metadata: Map<String, Value>,
}

impl EnhancementResponse {
    /// The normalized `#`-prefixed tags.
    pub fn tags(&self) -> Vec<&str> {
        self.metadata
            .get("tags")
            .and_then(Value::as_array)
            .map(|tags| tags.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

/// Validate and normalize a raw provider response.
pub fn validate(raw: &str) -> Result<EnhancementResponse, ValidationError> {
    let text = strip_code_fence(raw.trim());

    let parsed: Value = serde_json::from_str(text)
        .map_err(|err| ValidationError::MalformedJson(err.to_string()))?;

    let Value::Object(mut root) = parsed else {
        return Err(ValidationError::SchemaError(format!(
            "expected a JSON object, got {}",
            type_name(&parsed)
        )));
    };

    let content = match root.remove("content") {
        Some(Value::String(content)) => content,
        Some(other) => {
            return Err(ValidationError::SchemaError(format!(
                "content: expected string, got {}",
                type_name(&other)
            )))
        }
        None => return Err(ValidationError::SchemaError("content".into())),
    };

    let mut metadata = match root.remove("metadata") {
        Some(Value::Object(metadata)) => metadata,
        Some(other) => {
            return Err(ValidationError::SchemaError(format!(
                "metadata: expected object, got {}",
                type_name(&other)
            )))
        }
        None => return Err(ValidationError::SchemaError("metadata".into())),
    };

    normalize_tags(&mut metadata)?;

    Ok(EnhancementResponse { content, metadata })
}

/// Require `tags` to be an array of strings and prepend `#` to any element
/// missing it. Malformed tags are normalized, never dropped.
fn normalize_tags(metadata: &mut Map<String, Value>) -> Result<(), ValidationError> {
    let Some(tags) = metadata.get_mut("tags") else {
        return Err(ValidationError::SchemaError("metadata.tags".into()));
    };
    let Value::Array(items) = tags else {
        return Err(ValidationError::SchemaError(format!(
            "metadata.tags: expected array, got {}",
            type_name(tags)
        )));
    };

    for item in items.iter_mut() {
        let Value::String(tag) = item else {
            return Err(ValidationError::SchemaError(format!(
                "metadata.tags: expected string element, got {}",
                type_name(item)
            )));
        };
        if !tag.starts_with('#') {
            *tag = format!("#{tag}");
        }
    }
    Ok(())
}

/// Strip one surrounding markdown code fence, with or without a language
/// tag. Anything not shaped like a fence passes through unchanged.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Skip the info string (e.g. "json") on the opening line.
    let Some(newline) = rest.find('\n') else {
        return text;
    };
    rest[newline + 1..]
        .trim_end()
        .strip_suffix("```")
        .map(str::trim_end)
        .unwrap_or(text)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
