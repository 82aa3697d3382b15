use crate::engine::browser::KeyValueStorage;
use crate::engine::{EngineOptions, EngineProvider};
use crate::errors::{StormError, StormResult};

/// Engine storing the document as one item of a key-value storage.
///
/// The storage handle is injected at construction; nothing is looked up
/// from global state. An unset key loads as "nothing stored".
///
/// ```rust
/// use stormdb::engine::browser::{BrowserEngine, InMemoryKeyValueStorage, KeyValueStorage};
/// use stormdb::StormDb;
///
/// let storage = InMemoryKeyValueStorage::new();
/// storage.set_item("db", r#"{ "key": "value" }"#).unwrap();
///
/// let db = StormDb::open(BrowserEngine::new(storage, "db")).unwrap();
/// assert_eq!(db.get("key").value(), "value");
/// ```
pub struct BrowserEngine<S: KeyValueStorage> {
    storage: S,
    key: String,
    options: EngineOptions,
}

impl<S: KeyValueStorage> BrowserEngine<S> {
    pub fn new(storage: S, key: &str) -> BrowserEngine<S> {
        BrowserEngine::with_options(storage, key, EngineOptions::new())
    }

    pub fn with_options(storage: S, key: &str, options: EngineOptions) -> BrowserEngine<S> {
        BrowserEngine {
            storage,
            key: key.to_string(),
            options,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

impl<S: KeyValueStorage> EngineProvider for BrowserEngine<S> {
    fn location(&self) -> String {
        self.key.clone()
    }

    fn load(&self) -> StormResult<Option<String>> {
        match self.storage.get_item(&self.key) {
            Ok(item) => {
                log::debug!(
                    "Loaded item {} ({})",
                    self.key,
                    if item.is_some() { "present" } else { "absent" }
                );
                Ok(item)
            }
            Err(err) => {
                log::error!("Failed to read item {}: {}", self.key, err);
                let kind = err.kind().clone();
                Err(StormError::new_with_cause(
                    &format!("Failed to read item {}", self.key),
                    kind,
                    err,
                ))
            }
        }
    }

    fn save(&self, payload: &str) -> StormResult<()> {
        match self.storage.set_item(&self.key, payload) {
            Ok(()) => {
                log::debug!("Saved {} bytes to item {}", payload.len(), self.key);
                Ok(())
            }
            Err(err) => {
                log::error!("Failed to write item {}: {}", self.key, err);
                let kind = err.kind().clone();
                Err(StormError::new_with_cause(
                    &format!("Failed to write item {}", self.key),
                    kind,
                    err,
                ))
            }
        }
    }

    fn options(&self) -> &EngineOptions {
        &self.options
    }
}
