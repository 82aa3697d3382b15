use crate::common::TEMP_FILE_EXTENSION;
use crate::engine::EngineOptions;
use crate::errors::{ErrorKind, StormError, StormResult};
use serde_json::Value;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Settings of a [`super::LocalFileEngine`]: where the document lives and
/// how it is encoded.
#[derive(Clone, Debug)]
pub struct LocalFileConfig {
    path: PathBuf,
    options: EngineOptions,
}

impl LocalFileConfig {
    pub fn new(path: impl Into<PathBuf>, options: EngineOptions) -> LocalFileConfig {
        LocalFileConfig {
            path: path.into(),
            options,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Sibling file written before it is renamed over [`Self::path`].
    pub fn temp_path(&self) -> StormResult<PathBuf> {
        let file_name = self.path.file_name().ok_or_else(|| {
            log::error!("Path {} does not name a file", self.path.display());
            StormError::new(
                &format!("Path {} does not name a file", self.path.display()),
                ErrorKind::InvalidOperation,
            )
        })?;

        let mut temp_name = OsString::from(file_name);
        temp_name.push(".");
        temp_name.push(TEMP_FILE_EXTENSION);
        Ok(self.path.with_file_name(temp_name))
    }
}

/// Fluent builder for a [`super::LocalFileEngine`].
///
/// Configuration errors are reported by [`Self::build`].
///
/// ```rust
/// use stormdb::engine::local_file::LocalFileEngine;
///
/// let engine = LocalFileEngine::with_config()
///     .path("db.stormdb")
///     .pretty(2)
///     .build()
///     .unwrap();
/// ```
#[derive(Default)]
pub struct LocalFileEngineBuilder {
    path: Option<PathBuf>,
    options: EngineOptions,
}

impl LocalFileEngineBuilder {
    pub fn new() -> LocalFileEngineBuilder {
        LocalFileEngineBuilder::default()
    }

    /// File the document is read from and written to.
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Replaces the whole option set.
    pub fn options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn pretty(mut self, indent: usize) -> Self {
        self.options = self.options.pretty(indent);
        self
    }

    pub fn serialize<F>(mut self, serialize: F) -> Self
    where
        F: Fn(&Value) -> StormResult<String> + Send + Sync + 'static,
    {
        self.options = self.options.serialize(serialize);
        self
    }

    pub fn deserialize<F>(mut self, deserialize: F) -> Self
    where
        F: Fn(&str) -> StormResult<Value> + Send + Sync + 'static,
    {
        self.options = self.options.deserialize(deserialize);
        self
    }

    pub fn build(self) -> StormResult<super::LocalFileEngine> {
        match self.path {
            Some(path) if !path.as_os_str().is_empty() => Ok(super::LocalFileEngine::from_config(
                LocalFileConfig::new(path, self.options),
            )),
            _ => {
                log::error!("Local file engine requires a file path");
                Err(StormError::new(
                    "Local file engine requires a file path",
                    ErrorKind::InvalidOperation,
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_path_is_sibling() {
        let config = LocalFileConfig::new("/data/db.json", EngineOptions::new());
        assert_eq!(config.temp_path().unwrap(), PathBuf::from("/data/db.json.tmp"));
    }

    #[test]
    fn test_temp_path_without_file_name_fails() {
        let config = LocalFileConfig::new("/", EngineOptions::new());
        let err = config.temp_path().unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidOperation);
    }

    #[test]
    fn test_builder_requires_path() {
        let err = LocalFileEngineBuilder::new().build().unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidOperation);
    }

    #[test]
    fn test_builder_rejects_empty_path() {
        let result = LocalFileEngineBuilder::new().path("").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_collects_options() {
        let engine = LocalFileEngineBuilder::new()
            .path("db.json")
            .pretty(3)
            .deserialize(|_| Ok(Value::Null))
            .build()
            .unwrap();
        assert_eq!(engine.config().path(), Path::new("db.json"));
        assert_eq!(engine.config().options().pretty_indent(), Some(3));
        assert!(engine.config().options().has_custom_deserializer());
        assert!(!engine.config().options().has_custom_serializer());
    }
}
