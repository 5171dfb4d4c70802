// Path-template resolution and argument validation

use serde_json::Value;

use crate::endpoint::CallArgs;

/// Argument errors, raised before anything is sent
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgumentError {
    #[error("missing required path parameter `{0}`")]
    MissingPathParam(String),

    #[error("path parameter `{0}` must be a string, number or boolean")]
    NonScalarPathParam(String),

    #[error("malformed path template `{0}`")]
    MalformedTemplate(String),

    #[error("query parameter `{0}` cannot be an object")]
    NonScalarQueryParam(String),

    #[error("arguments must serialize to a JSON object")]
    NotAnObject,

    #[error("failed to serialize arguments: {0}")]
    Serialize(String),
}

/// List the `{name}` placeholders of a path template, in order
pub fn placeholders(template: &str) -> Result<Vec<&str>, ArgumentError> {
    let mut names = Vec::new();
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        let close = after
            .find('}')
            .ok_or_else(|| ArgumentError::MalformedTemplate(template.to_string()))?;
        let name = &after[..close];
        if name.is_empty() || name.contains('{') {
            return Err(ArgumentError::MalformedTemplate(template.to_string()));
        }
        names.push(name);
        rest = &after[close + 1..];
    }
    Ok(names)
}

/// Substitute placeholders from `args`, consuming the values used.
///
/// A placeholder counts as missing when the argument is absent, null or an
/// empty string. Values are percent-encoded as a single path segment.
pub fn resolve_path(template: &str, args: &mut CallArgs) -> Result<String, ArgumentError> {
    let names = placeholders(template)?;

    let mut segments = Vec::with_capacity(names.len());
    for name in &names {
        let value = match args.get(name) {
            None | Some(Value::Null) => {
                return Err(ArgumentError::MissingPathParam(name.to_string()))
            }
            Some(value) => value,
        };
        let text = scalar_to_string(value)
            .ok_or_else(|| ArgumentError::NonScalarPathParam(name.to_string()))?;
        if text.is_empty() {
            return Err(ArgumentError::MissingPathParam(name.to_string()));
        }
        segments.push(urlencoding::encode(&text).into_owned());
    }

    let mut resolved = String::with_capacity(template.len());
    let mut rest = template;
    for (name, segment) in names.iter().zip(segments) {
        let placeholder = format!("{{{}}}", name);
        // placeholders() already proved each one is present, in order
        if let Some(at) = rest.find(&placeholder) {
            resolved.push_str(&rest[..at]);
            resolved.push_str(&segment);
            rest = &rest[at + placeholder.len()..];
        }
        args.take(name);
    }
    resolved.push_str(rest);
    Ok(resolved)
}

/// Flatten leftover arguments into query pairs.
///
/// Nulls are skipped and arrays repeat the key once per element.
pub fn query_pairs(values: &[(String, Value)]) -> Result<Vec<(String, String)>, ArgumentError> {
    let mut pairs = Vec::new();
    for (key, value) in values {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items.iter().filter(|item| !item.is_null()) {
                    let text = scalar_to_string(item)
                        .ok_or_else(|| ArgumentError::NonScalarQueryParam(key.clone()))?;
                    pairs.push((key.clone(), text));
                }
            }
            other => {
                let text = scalar_to_string(other)
                    .ok_or_else(|| ArgumentError::NonScalarQueryParam(key.clone()))?;
                pairs.push((key.clone(), text));
            }
        }
    }
    Ok(pairs)
}

pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
