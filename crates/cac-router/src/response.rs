//! Minimal shape checks on provider replies.

use serde_json::Value;

use crate::error::{RouterError, RouterResult};

/// What the caller expects back from a dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResponseShape {
    /// Free text, forwarded as-is.
    #[default]
    Text,
    /// A JSON object that must carry at least these keys.
    JsonObject { required: Vec<String> },
}

impl ResponseShape {
    pub fn json_object<I, S>(required: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ResponseShape::JsonObject {
            required: required.into_iter().map(Into::into).collect(),
        }
    }
}

/// Pull the JSON payload out of a reply that may wrap it in a markdown fence
/// or surround it with prose.
pub fn extract_json(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        return Some(trimmed);
    }

    if let Some(fence) = trimmed.find("```") {
        let after = &trimmed[fence + 3..];
        let body_start = after.find('\n').map(|i| i + 1).unwrap_or(0);
        let body = &after[body_start..];
        if let Some(end) = body.find("```") {
            let inner = body[..end].trim();
            if inner.starts_with('{') {
                return Some(inner);
            }
        }
    }

    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => Some(&trimmed[start..=end]),
        _ => None,
    }
}

/// Check a reply against the expected shape.
///
/// Returns the parsed JSON for object shapes. Undecodable output is a
/// `ResponseFormat` error; a well-formed object missing required keys is a
/// `SchemaMismatch`.
pub fn check_shape(endpoint: &str, raw: &str, shape: &ResponseShape) -> RouterResult<Option<Value>> {
    let required = match shape {
        ResponseShape::Text => return Ok(None),
        ResponseShape::JsonObject { required } => required,
    };

    let candidate = extract_json(raw).ok_or_else(|| RouterError::ResponseFormat {
        endpoint: endpoint.to_string(),
        reason: "no JSON object found in reply".into(),
    })?;

    let value: Value =
        serde_json::from_str(candidate).map_err(|e| RouterError::ResponseFormat {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;

    let Some(object) = value.as_object() else {
        return Err(RouterError::ResponseFormat {
            endpoint: endpoint.to_string(),
            reason: "reply is JSON but not an object".into(),
        });
    };

    let missing: Vec<&str> = required
        .iter()
        .filter(|key| !object.contains_key(key.as_str()))
        .map(String::as_str)
        .collect();
    if !missing.is_empty() {
        return Err(RouterError::SchemaMismatch {
            endpoint: endpoint.to_string(),
            reason: format!("missing keys: {}", missing.join(", ")),
        });
    }

    Ok(Some(value))
}
