use crate::common::{atomic, Atomic, FieldPath, FieldRef, ReadExecutor, WriteExecutor};
use crate::engine::Engine;
use crate::errors::{ErrorKind, StormError, StormResult};
use crate::store::navigation::{length_of, lookup, push_at, remove_at, write_at};
use crate::store::{Chain, StormDbBuilder};
use serde_json::{Map, Value};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// An open document store.
///
/// `StormDb` holds exactly one in-memory document, loaded from its
/// [`Engine`] when the store is opened. Reads and writes only touch that
/// document; nothing reaches the engine until [`StormDb::save`] is called.
///
/// Cloning a `StormDb` is cheap and every clone (and every [`Chain`]
/// obtained from it) works on the same document.
///
/// # Opening
///
/// - nothing stored at the engine's location: the document starts as `{}`
///   and nothing is written back
/// - a payload is stored: it goes through the engine's deserializer once;
///   if that fails, `open` fails and no document is substituted
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use stormdb::engine::memory::InMemoryEngine;
/// use stormdb::StormDb;
///
/// let db = StormDb::open(InMemoryEngine::new()).unwrap();
/// assert_eq!(db.value(), json!({}));
///
/// db.set("user.name", "storm").unwrap();
/// assert_eq!(db.get("user").get("name").value(), "storm");
/// db.save().unwrap();
/// ```
#[derive(Clone)]
pub struct StormDb {
    inner: Arc<StormDbInner>,
}

impl StormDb {
    /// Opens a store on `engine` with the default configuration.
    pub fn open(engine: impl Into<Engine>) -> StormResult<StormDb> {
        StormDbBuilder::new().open(engine)
    }

    pub fn builder() -> StormDbBuilder {
        StormDbBuilder::new()
    }

    pub(crate) fn open_with(engine: Engine, field_separator: String) -> StormResult<StormDb> {
        let document = match engine.load()? {
            None => {
                log::debug!(
                    "Nothing stored at {}, starting with an empty document",
                    engine.location()
                );
                Value::Object(Map::new())
            }
            Some(payload) => engine.deserialize(&payload).map_err(|err| {
                log::error!("Failed to load document from {}: {}", engine.location(), err);
                StormError::new_with_cause(
                    &format!("Failed to load document from {}", engine.location()),
                    err.kind().clone(),
                    err,
                )
            })?,
        };

        log::debug!("Opened document store on {}", engine.location());
        Ok(StormDb {
            inner: Arc::new(StormDbInner {
                engine,
                document: atomic(document),
                field_separator,
            }),
        })
    }

    /// A copy of the whole document.
    pub fn value(&self) -> Value {
        self.inner.document.read_with(|doc| doc.clone())
    }

    /// Accessor scoped to the whole document.
    pub fn root(&self) -> Chain {
        Chain::new(self.clone(), FieldPath::root(&self.inner.field_separator))
    }

    /// Accessor scoped to `field`. Nothing is copied until `value()`.
    pub fn get(&self, field: impl Into<FieldRef>) -> Chain {
        self.root().get(field)
    }

    /// Writes `value` at `field`, creating intermediate objects, and
    /// returns the root accessor.
    pub fn set(&self, field: impl Into<FieldRef>, value: impl Into<Value>) -> StormResult<Chain> {
        self.root().set(field, value)
    }

    /// Replaces the document with `value` only if it is empty (`{}` or
    /// `null`).
    pub fn default(&self, value: impl Into<Value>) -> StormResult<Chain> {
        let value = value.into();
        self.inner.document.write_with(|doc| {
            let is_empty = match doc {
                Value::Null => true,
                Value::Object(map) => map.is_empty(),
                _ => false,
            };
            if is_empty {
                *doc = value;
            }
        });
        Ok(self.root())
    }

    /// Removes the value at `field`. Missing targets are ignored. Use
    /// `root().delete()` to clear the whole document.
    pub fn delete(&self, field: impl Into<FieldRef>) -> StormResult<()> {
        let field = field.into();
        StormDb::reject_empty_field(&field)?;
        self.get(field).delete()
    }

    /// Serializes the document with the engine's serializer and hands the
    /// payload to the engine.
    pub fn save(&self) -> StormResult<()> {
        let engine = &self.inner.engine;
        let payload = self
            .inner
            .document
            .read_with(|doc| engine.serialize(doc))?;

        engine.save(&payload).map_err(|err| {
            log::error!("Failed to save document to {}: {}", engine.location(), err);
            err
        })?;
        log::debug!("Saved document to {}", engine.location());
        Ok(())
    }

    pub fn engine(&self) -> &Engine {
        &self.inner.engine
    }

    pub fn field_separator(&self) -> &str {
        &self.inner.field_separator
    }

    pub(crate) fn read_path(&self, path: &FieldPath) -> Value {
        self.inner
            .document
            .read_with(|doc| lookup(doc, path.segments()).cloned().unwrap_or(Value::Null))
    }

    pub(crate) fn write_path(&self, path: &FieldPath, value: Value) -> StormResult<()> {
        path.validate()?;
        self.inner
            .document
            .write_with(|doc| write_at(doc, path.segments(), value))
    }

    pub(crate) fn remove_path(&self, path: &FieldPath) -> StormResult<()> {
        self.inner.document.write_with(|doc| {
            if path.is_root() {
                *doc = Value::Object(Map::new());
            } else {
                remove_at(doc, path.segments());
            }
        });
        Ok(())
    }

    pub(crate) fn push_path(&self, path: &FieldPath, value: Value) -> StormResult<()> {
        path.validate()?;
        self.inner
            .document
            .write_with(|doc| push_at(doc, path.segments(), value))
    }

    pub(crate) fn length_path(&self, path: &FieldPath) -> StormResult<usize> {
        self.inner
            .document
            .read_with(|doc| length_of(lookup(doc, path.segments())))
    }

    pub(crate) fn same_document(&self, other: &StormDb) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn reject_empty_field(field: &FieldRef) -> StormResult<()> {
        match field {
            FieldRef::Name(name) if name.is_empty() => {
                log::error!("Document does not support empty key");
                Err(StormError::new(
                    "Document does not support empty key",
                    ErrorKind::InvalidFieldName,
                ))
            }
            _ => Ok(()),
        }
    }
}

impl Debug for StormDb {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StormDb")
            .field("engine", &self.inner.engine)
            .field("field_separator", &self.inner.field_separator)
            .finish()
    }
}

struct StormDbInner {
    engine: Engine,
    document: Atomic<Value>,
    field_separator: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::memory::InMemoryEngine;
    use crate::engine::EngineOptions;
    use serde_json::json;

    #[test]
    fn test_open_absent_seeds_empty_object() {
        let engine = InMemoryEngine::new();
        let db = StormDb::open(engine.clone()).unwrap();
        assert_eq!(db.value(), json!({}));
        assert_eq!(engine.payload(), None);
        assert_eq!(engine.save_count(), 0);
    }

    #[test]
    fn test_open_loads_once() {
        let engine = InMemoryEngine::with_payload(r#"{"a": 1}"#);
        let db = StormDb::open(engine.clone()).unwrap();
        db.get("a").value();
        db.set("b", 2).unwrap();
        assert_eq!(engine.load_count(), 1);
    }

    #[test]
    fn test_open_deserializes_payload() {
        let db = StormDb::open(InMemoryEngine::with_payload(r#"{ "key": "value" }"#)).unwrap();
        assert_eq!(db.value(), json!({"key": "value"}));
        assert_eq!(db.get("key").value(), json!("value"));
    }

    #[test]
    fn test_open_corrupt_payload_fails() {
        let err = StormDb::open(InMemoryEngine::with_payload("{")).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::DeserializationError);
        assert!(err.message().contains("memory"));
        assert!(err.cause().is_some());
    }

    #[test]
    fn test_open_empty_payload_fails() {
        let result = StormDb::open(InMemoryEngine::with_payload(""));
        assert!(result.is_err());
    }

    #[test]
    fn test_open_non_object_payload() {
        let db = StormDb::open(InMemoryEngine::with_payload("[1, 2, 3]")).unwrap();
        assert_eq!(db.value(), json!([1, 2, 3]));
        assert_eq!(db.get(1usize).value(), json!(2));
    }

    #[test]
    fn test_custom_deserializer_error_kind_is_kept() {
        let options = EngineOptions::new()
            .deserialize(|_| Err(StormError::new("bad magic", ErrorKind::EncodingError)));
        let engine = InMemoryEngine::with_options(Some("anything"), options);
        let err = StormDb::open(engine).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::EncodingError);
        assert_eq!(err.cause().map(|c| c.message()), Some("bad magic"));
    }

    #[test]
    fn test_custom_deserializer_not_called_when_absent() {
        let options = EngineOptions::new()
            .deserialize(|_| Err(StormError::new("must not run", ErrorKind::InternalError)));
        let db = StormDb::open(InMemoryEngine::with_options(None, options)).unwrap();
        assert_eq!(db.value(), json!({}));
    }

    #[test]
    fn test_set_is_in_memory_only() {
        let engine = InMemoryEngine::with_payload(r#"{"key":"value"}"#);
        let db = StormDb::open(engine.clone()).unwrap();
        db.set("key", "newValue").unwrap();
        assert_eq!(db.get("key").value(), json!("newValue"));
        assert_eq!(engine.payload().as_deref(), Some(r#"{"key":"value"}"#));
    }

    #[test]
    fn test_save_writes_serialized_document() {
        let engine = InMemoryEngine::with_payload(r#"{"key":"value"}"#);
        let db = StormDb::open(engine.clone()).unwrap();
        db.set("key", "newValue").unwrap();
        db.save().unwrap();

        let saved: Value = serde_json::from_str(&engine.payload().unwrap()).unwrap();
        assert_eq!(saved["key"], json!("newValue"));
    }

    #[test]
    fn test_save_repeatable() {
        let engine = InMemoryEngine::new();
        let db = StormDb::open(engine.clone()).unwrap();
        db.set("n", 1).unwrap();
        db.save().unwrap();
        db.set("n", 2).unwrap();
        db.save().unwrap();
        assert_eq!(engine.save_count(), 2);
        assert_eq!(engine.payload().as_deref(), Some(r#"{"n":2}"#));
    }

    #[test]
    fn test_save_custom_serializer_passthrough() {
        let options = EngineOptions::new().serialize(|_| Ok("serialized data".to_string()));
        let engine = InMemoryEngine::with_options(Some(r#"{"key":"value"}"#), options);
        let db = StormDb::open(engine.clone()).unwrap();
        assert_eq!(db.value(), json!({"key": "value"}));
        db.save().unwrap();
        assert_eq!(engine.payload().as_deref(), Some("serialized data"));
    }

    #[test]
    fn test_save_serializer_failure_leaves_payload() {
        let options = EngineOptions::new()
            .serialize(|_| Err(StormError::new("nope", ErrorKind::SerializationError)));
        let engine = InMemoryEngine::with_options(Some("{}"), options);
        let db = StormDb::open(engine.clone()).unwrap();
        db.set("a", 1).unwrap();
        assert!(db.save().is_err());
        assert_eq!(engine.payload().as_deref(), Some("{}"));
        assert_eq!(engine.save_count(), 0);
    }

    #[test]
    fn test_round_trip_through_fresh_store() {
        let engine = InMemoryEngine::new();
        let db = StormDb::open(engine.clone()).unwrap();
        db.set("user.name", "storm").unwrap();
        db.set("user.tags", json!(["a", "b"])).unwrap();
        db.set("count", 3).unwrap();
        db.save().unwrap();

        let reopened = StormDb::open(engine).unwrap();
        assert_eq!(reopened.value(), db.value());
    }

    #[test]
    fn test_set_empty_key_fails() {
        let db = StormDb::open(InMemoryEngine::new()).unwrap();
        let err = db.set("", 1).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidFieldName);
        assert_eq!(db.value(), json!({}));
    }

    #[test]
    fn test_set_with_empty_segment_fails() {
        let db = StormDb::open(InMemoryEngine::new()).unwrap();
        let err = db.set("a..b", 1).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidFieldName);
    }

    #[test]
    fn test_default_seeds_empty_document() {
        let db = StormDb::open(InMemoryEngine::new()).unwrap();
        db.default(json!({"users": []})).unwrap();
        assert_eq!(db.value(), json!({"users": []}));
    }

    #[test]
    fn test_default_keeps_loaded_document() {
        let db = StormDb::open(InMemoryEngine::with_payload(r#"{"users": [1]}"#)).unwrap();
        db.default(json!({"users": []})).unwrap();
        assert_eq!(db.value(), json!({"users": [1]}));
    }

    #[test]
    fn test_delete() {
        let db = StormDb::open(InMemoryEngine::with_payload(r#"{"a": 1, "b": 2}"#)).unwrap();
        db.delete("a").unwrap();
        db.delete("missing").unwrap();
        assert_eq!(db.value(), json!({"b": 2}));
    }

    #[test]
    fn test_delete_empty_key_fails_and_keeps_document() {
        let engine = InMemoryEngine::with_payload(r#"{"a": 1, "b": 2}"#);
        let db = StormDb::open(engine.clone()).unwrap();

        let err = db.delete("").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidFieldName);
        assert_eq!(db.value(), json!({"a": 1, "b": 2}));

        db.save().unwrap();
        assert_eq!(engine.payload().as_deref(), Some(r#"{"a":1,"b":2}"#));
    }

    #[test]
    fn test_clones_share_document() {
        let db = StormDb::open(InMemoryEngine::new()).unwrap();
        let other = db.clone();
        other.set("shared", true).unwrap();
        assert_eq!(db.get("shared").value(), json!(true));
        assert!(db.same_document(&other));
    }

    #[test]
    fn test_independent_stores_do_not_share_document() {
        let engine = InMemoryEngine::new();
        let first = StormDb::open(engine.clone()).unwrap();
        let second = StormDb::open(engine.clone()).unwrap();
        first.set("owner", "first").unwrap();
        second.set("owner", "second").unwrap();
        first.save().unwrap();
        second.save().unwrap();

        assert!(!first.same_document(&second));
        assert_eq!(engine.payload().as_deref(), Some(r#"{"owner":"second"}"#));
    }

    #[test]
    fn test_debug_mentions_engine() {
        let db = StormDb::open(InMemoryEngine::new()).unwrap();
        assert!(format!("{:?}", db).contains("memory"));
    }
}
