use crate::common::DEFAULT_PRETTY_INDENT;
use crate::errors::{ErrorKind, StormError, StormResult};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Turns a document into the payload an engine stores.
pub type SerializeFn = Arc<dyn Fn(&Value) -> StormResult<String> + Send + Sync>;

/// Turns a stored payload back into a document.
pub type DeserializeFn = Arc<dyn Fn(&str) -> StormResult<Value> + Send + Sync>;

/// Serialization settings bound to an engine at construction.
///
/// Both halves default to JSON and can be overridden independently:
/// replacing the serializer leaves loading untouched, and replacing the
/// deserializer leaves saving untouched.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use stormdb::engine::EngineOptions;
///
/// let options = EngineOptions::new().serialize(|_| Ok("serialized data".to_string()));
/// assert_eq!(options.serialize_value(&json!({"a": 1})).unwrap(), "serialized data");
/// assert_eq!(options.deserialize_payload(r#"{"a": 1}"#).unwrap(), json!({"a": 1}));
/// ```
#[derive(Clone, Default)]
pub struct EngineOptions {
    serialize: Option<SerializeFn>,
    deserialize: Option<DeserializeFn>,
    pretty: Option<usize>,
}

impl EngineOptions {
    /// Creates options using JSON for both directions.
    pub fn new() -> Self {
        EngineOptions::default()
    }

    /// Replaces the serializer used by `save`.
    pub fn serialize<F>(mut self, serialize: F) -> Self
    where
        F: Fn(&Value) -> StormResult<String> + Send + Sync + 'static,
    {
        self.serialize = Some(Arc::new(serialize));
        self
    }

    /// Replaces the deserializer used when a store is opened.
    pub fn deserialize<F>(mut self, deserialize: F) -> Self
    where
        F: Fn(&str) -> StormResult<Value> + Send + Sync + 'static,
    {
        self.deserialize = Some(Arc::new(deserialize));
        self
    }

    /// Makes the default serializer write indented JSON.
    ///
    /// Has no effect once a custom serializer is set.
    pub fn pretty(mut self, indent: usize) -> Self {
        self.pretty = Some(indent);
        self
    }

    /// Indented JSON with the default width.
    pub fn pretty_default(self) -> Self {
        self.pretty(DEFAULT_PRETTY_INDENT)
    }

    pub fn has_custom_serializer(&self) -> bool {
        self.serialize.is_some()
    }

    pub fn has_custom_deserializer(&self) -> bool {
        self.deserialize.is_some()
    }

    pub fn pretty_indent(&self) -> Option<usize> {
        self.pretty
    }

    /// Runs the configured serializer. Custom output is returned unchanged.
    pub fn serialize_value(&self, document: &Value) -> StormResult<String> {
        match (&self.serialize, self.pretty) {
            (Some(serialize), _) => serialize(document),
            (None, Some(indent)) => json_serialize_pretty(document, indent),
            (None, None) => json_serialize(document),
        }
    }

    /// Runs the configured deserializer.
    pub fn deserialize_payload(&self, payload: &str) -> StormResult<Value> {
        match &self.deserialize {
            Some(deserialize) => deserialize(payload),
            None => json_deserialize(payload),
        }
    }
}

impl Debug for EngineOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineOptions")
            .field("custom_serialize", &self.serialize.is_some())
            .field("custom_deserialize", &self.deserialize.is_some())
            .field("pretty", &self.pretty)
            .finish()
    }
}

/// Default serializer: compact JSON.
pub fn json_serialize(document: &Value) -> StormResult<String> {
    serde_json::to_string(document).map_err(|err| {
        log::error!("Failed to serialize document: {}", err);
        StormError::new_with_cause(
            "Failed to serialize document",
            ErrorKind::SerializationError,
            err.into(),
        )
    })
}

/// Serializer writing JSON indented by `indent` spaces.
pub fn json_serialize_pretty(document: &Value, indent: usize) -> StormResult<String> {
    let indent = " ".repeat(indent);
    let mut buffer = Vec::with_capacity(128);
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    document.serialize(&mut serializer).map_err(|err| {
        log::error!("Failed to serialize document: {}", err);
        StormError::new_with_cause(
            "Failed to serialize document",
            ErrorKind::SerializationError,
            err.into(),
        )
    })?;
    Ok(String::from_utf8(buffer)?)
}

/// Default deserializer: JSON text to document.
pub fn json_deserialize(payload: &str) -> StormResult<Value> {
    serde_json::from_str(payload).map_err(|err| {
        log::error!("Failed to deserialize payload: {}", err);
        StormError::new_with_cause(
            "Failed to deserialize payload",
            ErrorKind::DeserializationError,
            err.into(),
        )
    })
}
