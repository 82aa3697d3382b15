use crate::common::{atomic, Atomic, ReadExecutor, WriteExecutor};
use crate::engine::{EngineOptions, EngineProvider};
use crate::errors::StormResult;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Engine keeping its payload in memory.
///
/// # Purpose
/// Backs a store without touching any real medium. Clones share the same
/// payload slot, so a test can keep one clone to inspect what the store
/// saved through the other.
///
/// # Characteristics
/// - **Shared**: clones point at the same slot
/// - **Observable**: counts `load` and `save` calls
/// - **Temporary**: everything is lost once the last clone is dropped
///
/// ```rust
/// use stormdb::engine::memory::InMemoryEngine;
/// use stormdb::StormDb;
///
/// let engine = InMemoryEngine::with_payload(r#"{"key":"value"}"#);
/// let db = StormDb::open(engine.clone()).unwrap();
/// db.set("key", "newValue").unwrap();
/// db.save().unwrap();
/// assert_eq!(engine.payload().as_deref(), Some(r#"{"key":"newValue"}"#));
/// ```
#[derive(Clone)]
pub struct InMemoryEngine {
    inner: Arc<InMemoryEngineInner>,
}

impl InMemoryEngine {
    /// Creates an engine with nothing stored.
    pub fn new() -> InMemoryEngine {
        InMemoryEngine::with_options(None, EngineOptions::new())
    }

    /// Creates an engine already holding `payload`.
    pub fn with_payload(payload: &str) -> InMemoryEngine {
        InMemoryEngine::with_options(Some(payload), EngineOptions::new())
    }

    pub fn with_options(payload: Option<&str>, options: EngineOptions) -> InMemoryEngine {
        InMemoryEngine {
            inner: Arc::new(InMemoryEngineInner::new(payload, options)),
        }
    }

    /// The raw payload currently stored.
    pub fn payload(&self) -> Option<String> {
        self.inner.payload.read_with(|it| it.clone())
    }

    /// Number of times `load` was called.
    pub fn load_count(&self) -> usize {
        self.inner.load_count.load(Ordering::Relaxed)
    }

    /// Number of times `save` was called.
    pub fn save_count(&self) -> usize {
        self.inner.save_count.load(Ordering::Relaxed)
    }
}

impl Default for InMemoryEngine {
    fn default() -> Self {
        InMemoryEngine::new()
    }
}

impl EngineProvider for InMemoryEngine {
    fn location(&self) -> String {
        "memory".to_string()
    }

    fn load(&self) -> StormResult<Option<String>> {
        self.inner.load_count.fetch_add(1, Ordering::Relaxed);
        Ok(self.payload())
    }

    fn save(&self, payload: &str) -> StormResult<()> {
        self.inner.save_count.fetch_add(1, Ordering::Relaxed);
        self.inner
            .payload
            .write_with(|it| *it = Some(payload.to_string()));
        Ok(())
    }

    fn options(&self) -> &EngineOptions {
        &self.inner.options
    }
}

struct InMemoryEngineInner {
    payload: Atomic<Option<String>>,
    options: EngineOptions,
    load_count: AtomicUsize,
    save_count: AtomicUsize,
}

impl InMemoryEngineInner {
    fn new(payload: Option<&str>, options: EngineOptions) -> InMemoryEngineInner {
        InMemoryEngineInner {
            payload: atomic(payload.map(str::to_string)),
            options,
            load_count: AtomicUsize::new(0),
            save_count: AtomicUsize::new(0),
        }
    }
}
