use crate::errors::StormResult;
use dashmap::DashMap;
use std::sync::Arc;

/// String key-value storage in the shape of the browser `localStorage`
/// API.
///
/// The handle is always passed to [`super::BrowserEngine`] explicitly, so
/// a real binding and [`InMemoryKeyValueStorage`] are interchangeable.
pub trait KeyValueStorage: Send + Sync {
    /// Returns the item stored under `key`, or `None` if the key is unset.
    fn get_item(&self, key: &str) -> StormResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous item.
    fn set_item(&self, key: &str, value: &str) -> StormResult<()>;
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for Arc<T> {
    fn get_item(&self, key: &str) -> StormResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StormResult<()> {
        (**self).set_item(key, value)
    }
}

/// Key-value storage held in memory.
///
/// Clones share the same items, which makes it a stand-in for the browser
/// storage object in tests.
#[derive(Clone, Default)]
pub struct InMemoryKeyValueStorage {
    items: Arc<DashMap<String, String>>,
}

impl InMemoryKeyValueStorage {
    pub fn new() -> InMemoryKeyValueStorage {
        InMemoryKeyValueStorage::default()
    }

    pub fn remove_item(&self, key: &str) -> Option<String> {
        self.items.remove(key).map(|(_, value)| value)
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn clear(&self) {
        self.items.clear()
    }
}

impl KeyValueStorage for InMemoryKeyValueStorage {
    fn get_item(&self, key: &str) -> StormResult<Option<String>> {
        Ok(self.items.get(key).map(|entry| entry.value().clone()))
    }

    fn set_item(&self, key: &str, value: &str) -> StormResult<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
