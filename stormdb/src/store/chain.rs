use crate::common::{FieldPath, FieldRef};
use crate::errors::{ErrorKind, StormError, StormResult};
use crate::store::StormDb;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt::{Debug, Formatter};

/// Fluent handle onto part of a store's document.
///
/// A chain is a path plus a reference back to the [`StormDb`] it came
/// from; it never holds a copy of the document. Navigating with `get` only
/// extends the path, and writes land in the one document the store owns,
/// so they are visible through the store and every other chain.
///
/// ```rust
/// use serde_json::json;
/// use stormdb::engine::memory::InMemoryEngine;
/// use stormdb::StormDb;
///
/// let db = StormDb::open(InMemoryEngine::new()).unwrap();
/// let user = db.get("user");
/// user.set("name", "storm").unwrap().set("age", 7).unwrap();
/// db.get("user").get("tags").push("admin").unwrap();
///
/// assert_eq!(db.value(), json!({"user": {"name": "storm", "age": 7, "tags": ["admin"]}}));
/// assert_eq!(user.length().unwrap(), 3);
/// ```
#[derive(Clone)]
pub struct Chain {
    db: StormDb,
    path: FieldPath,
}

impl Chain {
    pub(crate) fn new(db: StormDb, path: FieldPath) -> Chain {
        Chain { db, path }
    }

    /// Descends into `field`.
    pub fn get(&self, field: impl Into<FieldRef>) -> Chain {
        let path = self.path.join(field.into());
        Chain::new(self.db.clone(), path)
    }

    /// A copy of the value this chain points at, or `Value::Null` if the
    /// path leads nowhere.
    pub fn value(&self) -> Value {
        self.db.read_path(&self.path)
    }

    /// Decodes the value this chain points at into `T`.
    pub fn value_as<T: DeserializeOwned>(&self) -> StormResult<T> {
        serde_json::from_value(self.value()).map_err(|err| {
            log::error!("Failed to map value at {}: {}", self.path, err);
            StormError::new_with_cause(
                &format!("Failed to map value at {}", self.path),
                ErrorKind::DeserializationError,
                err.into(),
            )
        })
    }

    /// Writes `value` at `field` below this chain and returns this chain.
    pub fn set(&self, field: impl Into<FieldRef>, value: impl Into<Value>) -> StormResult<Chain> {
        let field = field.into();
        StormDb::reject_empty_field(&field)?;
        let target = self.path.join(field);
        self.db.write_path(&target, value.into())?;
        Ok(self.clone())
    }

    /// Replaces the value this chain points at. On the root chain this
    /// replaces the whole document.
    pub fn replace(&self, value: impl Into<Value>) -> StormResult<Chain> {
        self.db.write_path(&self.path, value.into())?;
        Ok(self.clone())
    }

    /// Appends `value` to the array this chain points at.
    pub fn push(&self, value: impl Into<Value>) -> StormResult<Chain> {
        self.db.push_path(&self.path, value.into())?;
        Ok(self.clone())
    }

    /// Removes the value this chain points at. Deleting the root resets
    /// the document to `{}`.
    pub fn delete(&self) -> StormResult<()> {
        self.db.remove_path(&self.path)
    }

    /// Size of the array, object or string this chain points at.
    pub fn length(&self) -> StormResult<usize> {
        self.db.length_path(&self.path)
    }

    /// Persists the whole document through the store's engine.
    pub fn save(&self) -> StormResult<()> {
        self.db.save()
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    pub fn db(&self) -> &StormDb {
        &self.db
    }
}

impl Debug for Chain {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chain").field("path", &self.path).finish()
    }
}
