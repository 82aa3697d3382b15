use crate::engine::EngineOptions;
use crate::errors::StormResult;
use serde_json::Value;
use std::fmt::{Debug, Formatter};
use std::ops::Deref;
use std::sync::Arc;

/// Contract every persistence backend must follow.
///
/// # Purpose
/// An engine owns one storage location and moves raw text payloads in and
/// out of it. It also carries the [`EngineOptions`] the document store uses
/// to turn payloads into documents, but `load` and `save` never apply them.
///
/// # Contract
/// - `load` returns `Ok(None)` when nothing is stored at the location. This
///   must be distinguishable from an empty but present payload.
/// - `save` replaces whatever was stored before. Calling it repeatedly is
///   fine and the last write wins.
/// - Backend failures (permissions, exhausted storage, ...) are returned
///   as errors and never retried.
///
/// # Implementations
/// - `InMemoryEngine`: shared in-memory slot
/// - `LocalFileEngine`: a single file on disk
/// - `BrowserEngine`: a key in an injected key-value storage
pub trait EngineProvider: Send + Sync {
    /// Identifies where the payload lives (a key name or a file path).
    fn location(&self) -> String;

    /// Reads the stored payload verbatim, or `None` if there is none.
    fn load(&self) -> StormResult<Option<String>>;

    /// Replaces the stored payload.
    fn save(&self, payload: &str) -> StormResult<()>;

    /// The serializer/deserializer pair bound to this engine.
    fn options(&self) -> &EngineOptions;
}

/// Cloneable handle over any [`EngineProvider`].
///
/// Dereferences to the provider so `load`, `save` and `location` can be
/// called directly, and adds the codec helpers the store relies on.
///
/// ```rust
/// use stormdb::engine::memory::InMemoryEngine;
/// use stormdb::engine::Engine;
///
/// let engine = Engine::new(InMemoryEngine::new());
/// assert_eq!(engine.load().unwrap(), None);
/// ```
#[derive(Clone)]
pub struct Engine {
    inner: Arc<dyn EngineProvider>,
}

impl Engine {
    pub fn new<T: EngineProvider + 'static>(inner: T) -> Self {
        Engine {
            inner: Arc::new(inner),
        }
    }

    /// Encodes `document` with the engine's serializer.
    pub fn serialize(&self, document: &Value) -> StormResult<String> {
        self.inner.options().serialize_value(document)
    }

    /// Decodes `payload` with the engine's deserializer.
    pub fn deserialize(&self, payload: &str) -> StormResult<Value> {
        self.inner.options().deserialize_payload(payload)
    }
}

impl<T: EngineProvider + 'static> From<T> for Engine {
    fn from(inner: T) -> Self {
        Engine::new(inner)
    }
}

impl Deref for Engine {
    type Target = Arc<dyn EngineProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Debug for Engine {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("location", &self.inner.location())
            .field("options", self.inner.options())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{atomic, Atomic, ReadExecutor, WriteExecutor};
    use crate::errors::{ErrorKind, StormError};
    use serde_json::json;

    struct MockEngine {
        payload: Atomic<Option<String>>,
        options: EngineOptions,
        fail: bool,
    }

    impl MockEngine {
        fn new(payload: Option<&str>) -> Self {
            MockEngine {
                payload: atomic(payload.map(str::to_string)),
                options: EngineOptions::new(),
                fail: false,
            }
        }
    }

    impl EngineProvider for MockEngine {
        fn location(&self) -> String {
            "mock".to_string()
        }

        fn load(&self) -> StormResult<Option<String>> {
            if self.fail {
                return Err(StormError::new("backend down", ErrorKind::BackendError));
            }
            Ok(self.payload.read_with(|it| it.clone()))
        }

        fn save(&self, payload: &str) -> StormResult<()> {
            if self.fail {
                return Err(StormError::new("backend down", ErrorKind::BackendError));
            }
            self.payload.write_with(|it| *it = Some(payload.to_string()));
            Ok(())
        }

        fn options(&self) -> &EngineOptions {
            &self.options
        }
    }

    #[test]
    fn test_engine_delegates_load() {
        let engine = Engine::new(MockEngine::new(Some("{}")));
        assert_eq!(engine.load().unwrap(), Some("{}".to_string()));
        assert_eq!(engine.location(), "mock");
    }

    #[test]
    fn test_engine_absent_payload() {
        let engine = Engine::new(MockEngine::new(None));
        assert_eq!(engine.load().unwrap(), None);
    }

    #[test]
    fn test_engine_empty_payload_is_not_absent() {
        let engine = Engine::new(MockEngine::new(Some("")));
        assert_eq!(engine.load().unwrap(), Some(String::new()));
    }

    #[test]
    fn test_engine_save_last_write_wins() {
        let engine = Engine::new(MockEngine::new(None));
        engine.save("first").unwrap();
        engine.save("second").unwrap();
        assert_eq!(engine.load().unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn test_engine_codec_uses_options() {
        let engine = Engine::new(MockEngine::new(None));
        assert_eq!(engine.serialize(&json!({"a": 1})).unwrap(), r#"{"a":1}"#);
        assert_eq!(engine.deserialize(r#"{"a":1}"#).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_engine_backend_failure_propagates() {
        let mut mock = MockEngine::new(None);
        mock.fail = true;
        let engine = Engine::new(mock);
        assert_eq!(engine.load().unwrap_err().kind(), &ErrorKind::BackendError);
        assert_eq!(engine.save("x").unwrap_err().kind(), &ErrorKind::BackendError);
    }

    #[test]
    fn test_engine_from_provider() {
        let engine: Engine = MockEngine::new(None).into();
        let cloned = engine.clone();
        engine.save("shared").unwrap();
        assert_eq!(cloned.load().unwrap().as_deref(), Some("shared"));
    }

    #[test]
    fn test_engine_debug() {
        let engine = Engine::new(MockEngine::new(None));
        assert!(format!("{:?}", engine).contains("mock"));
    }
}
