// Endpoint descriptors and per-call arguments

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validation::{placeholders, ArgumentError};

/// HTTP method of a catalog operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the arguments left over after path substitution end up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// Query string (GET)
    Query,
    /// JSON object body
    Json,
    /// multipart/form-data body; file parts become file fields
    Multipart,
}

/// Static description of one REST operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointDescriptor {
    /// Operation name used in logs (e.g. "getRockDetail")
    pub name: &'static str,

    pub method: HttpMethod,

    /// Path relative to the client base URL, with `{name}` placeholders
    pub path_template: &'static str,

    pub payload: PayloadShape,
}

impl EndpointDescriptor {
    pub const fn get(name: &'static str, path_template: &'static str) -> Self {
        Self {
            name,
            method: HttpMethod::Get,
            path_template,
            payload: PayloadShape::Query,
        }
    }

    pub const fn post_json(name: &'static str, path_template: &'static str) -> Self {
        Self {
            name,
            method: HttpMethod::Post,
            path_template,
            payload: PayloadShape::Json,
        }
    }

    pub const fn post_multipart(name: &'static str, path_template: &'static str) -> Self {
        Self {
            name,
            method: HttpMethod::Post,
            path_template,
            payload: PayloadShape::Multipart,
        }
    }

    /// Placeholder names required by the path template, in order
    pub fn path_params(&self) -> Result<Vec<&'static str>, ArgumentError> {
        placeholders(self.path_template)
    }
}

/// A file attached to a multipart call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Named arguments for a single call.
///
/// Keys are unique and keep insertion order, so query strings come out in
/// the order the caller supplied them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs {
    values: Vec<(String, Value)>,
    files: Vec<FilePart>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`CallArgs::insert`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn with_file(mut self, file: FilePart) -> Self {
        self.files.push(file);
        self
    }

    /// Insert or replace an argument
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.values.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.values.push((key, value)),
        }
    }

    /// Build arguments from any struct that serializes to a JSON object.
    ///
    /// Null fields are dropped.
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self, ArgumentError> {
        let mut args = Self::new();
        args.extend_serialize(value)?;
        Ok(args)
    }

    pub fn extend_serialize<T: Serialize>(&mut self, value: &T) -> Result<(), ArgumentError> {
        let value =
            serde_json::to_value(value).map_err(|e| ArgumentError::Serialize(e.to_string()))?;
        match value {
            Value::Object(map) => {
                for (key, value) in map {
                    if !value.is_null() {
                        self.insert(key, value);
                    }
                }
                Ok(())
            }
            Value::Null => Ok(()),
            _ => Err(ArgumentError::NotAnObject),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Remove an argument, returning its value
    pub fn take(&mut self, key: &str) -> Option<Value> {
        let index = self.values.iter().position(|(k, _)| k == key)?;
        Some(self.values.remove(index).1)
    }

    pub fn values(&self) -> &[(String, Value)] {
        &self.values
    }

    pub fn files(&self) -> &[FilePart] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.files.is_empty()
    }

    pub fn into_parts(self) -> (Vec<(String, Value)>, Vec<FilePart>) {
        (self.values, self.files)
    }
}
