use crate::common::DEFAULT_FIELD_SEPARATOR;
use crate::engine::Engine;
use crate::errors::{ErrorKind, StormError, StormResult};
use crate::store::StormDb;

/// Builder for opening a [`StormDb`] with non-default settings.
///
/// Configuration errors are captured as they happen and returned by
/// [`StormDbBuilder::open`], so the chain of calls never has to be broken
/// up.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use stormdb::engine::memory::InMemoryEngine;
/// use stormdb::StormDb;
///
/// let db = StormDb::builder()
///     .field_separator("/")
///     .open(InMemoryEngine::new())
///     .unwrap();
///
/// db.set("version/1.0", "first").unwrap();
/// assert_eq!(db.value(), json!({"version": {"1.0": "first"}}));
/// ```
pub struct StormDbBuilder {
    error: Option<StormError>,
    field_separator: String,
}

impl StormDbBuilder {
    /// Creates a builder using `.` as the field separator.
    pub fn new() -> Self {
        StormDbBuilder {
            error: None,
            field_separator: DEFAULT_FIELD_SEPARATOR.to_string(),
        }
    }

    /// Sets the separator used to split textual paths into segments.
    ///
    /// An empty separator is rejected when the store is opened.
    pub fn field_separator(mut self, field_separator: &str) -> Self {
        if self.error.is_none() {
            if field_separator.is_empty() {
                log::error!("Field separator cannot be empty");
                self.error = Some(StormError::new(
                    "Field separator cannot be empty",
                    ErrorKind::InvalidOperation,
                ));
            } else {
                self.field_separator = field_separator.to_string();
            }
        }
        self
    }

    /// Loads the initial document from `engine` and opens the store.
    pub fn open(self, engine: impl Into<Engine>) -> StormResult<StormDb> {
        if let Some(error) = self.error {
            return Err(error);
        }
        StormDb::open_with(engine.into(), self.field_separator)
    }
}

impl Default for StormDbBuilder {
    fn default() -> Self {
        StormDbBuilder::new()
    }
}
