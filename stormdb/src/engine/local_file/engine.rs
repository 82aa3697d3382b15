use crate::engine::local_file::{LocalFileConfig, LocalFileEngineBuilder};
use crate::engine::{EngineOptions, EngineProvider};
use crate::errors::StormResult;
use std::fs::{self, File};
use std::io::{self, ErrorKind as IoErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Engine storing the document in a single file.
///
/// # Purpose
/// Reads the whole file as UTF-8 text on `load` and replaces it on `save`.
/// A missing file is reported as "nothing stored", so a store opened on a
/// fresh path starts empty and no file appears until the first save.
///
/// # Characteristics
/// - **Crash safe writes**: the payload goes to `<file>.tmp` first, is
///   synced to disk and only then renamed over the target
/// - **No locking**: two engines on the same path overwrite each other
/// - **Cheap clones**: configuration is shared through `Arc`
///
/// ```rust,no_run
/// use stormdb::engine::local_file::LocalFileEngine;
/// use stormdb::StormDb;
///
/// let db = StormDb::open(LocalFileEngine::new("db.stormdb")).unwrap();
/// db.set("name", "storm").unwrap();
/// db.save().unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct LocalFileEngine {
    inner: Arc<LocalFileConfig>,
}

impl LocalFileEngine {
    /// Engine on `path` with JSON encoding.
    pub fn new(path: impl Into<PathBuf>) -> LocalFileEngine {
        LocalFileEngine::with_options(path, EngineOptions::new())
    }

    pub fn with_options(path: impl Into<PathBuf>, options: EngineOptions) -> LocalFileEngine {
        LocalFileEngine::from_config(LocalFileConfig::new(path, options))
    }

    pub fn with_config() -> LocalFileEngineBuilder {
        LocalFileEngineBuilder::new()
    }

    pub(crate) fn from_config(config: LocalFileConfig) -> LocalFileEngine {
        LocalFileEngine {
            inner: Arc::new(config),
        }
    }

    pub fn config(&self) -> &LocalFileConfig {
        &self.inner
    }
}

impl EngineProvider for LocalFileEngine {
    fn location(&self) -> String {
        self.inner.path().display().to_string()
    }

    fn load(&self) -> StormResult<Option<String>> {
        let path = self.inner.path();
        match fs::read(path) {
            Ok(bytes) => {
                log::debug!("Loaded {} bytes from {}", bytes.len(), path.display());
                Ok(Some(String::from_utf8(bytes)?))
            }
            Err(err) if err.kind() == IoErrorKind::NotFound => {
                log::debug!("No document stored at {}", path.display());
                Ok(None)
            }
            Err(err) => {
                log::error!("Failed to read {}: {}", path.display(), err);
                Err(err.into())
            }
        }
    }

    fn save(&self, payload: &str) -> StormResult<()> {
        let path = self.inner.path();
        let temp_path = self.inner.temp_path()?;

        if let Err(err) = write_synced(&temp_path, payload) {
            log::error!("Failed to write {}: {}", temp_path.display(), err);
            let _ = fs::remove_file(&temp_path);
            return Err(err.into());
        }

        if let Err(err) = fs::rename(&temp_path, path) {
            log::error!(
                "Failed to move {} over {}: {}",
                temp_path.display(),
                path.display(),
                err
            );
            // the temporary file is useless without the rename
            let _ = fs::remove_file(&temp_path);
            return Err(err.into());
        }

        log::debug!("Saved {} bytes to {}", payload.len(), path.display());
        Ok(())
    }

    fn options(&self) -> &EngineOptions {
        self.inner.options()
    }
}

/// Writes `payload` to `path` and flushes it to disk before returning.
fn write_synced(path: &Path, payload: &str) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(payload.as_bytes())?;
    file.sync_all()
}
