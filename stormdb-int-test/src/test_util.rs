use std::path::{Path, PathBuf};
use std::sync::Once;
use std::{env, fs};
use stormdb::engine::browser::{BrowserEngine, InMemoryKeyValueStorage, KeyValueStorage};
use stormdb::engine::EngineProvider;
use stormdb::errors::StormResult;

static LOGGER: Once = Once::new();

/// Installs the colored test logger once per test binary.
pub fn init_logger() {
    LOGGER.call_once(|| {
        let mut builder = colog::default_builder();
        builder.filter_level(log::LevelFilter::Debug);
        builder.is_test(true);
        // another test binary in the same process may have set a logger
        let _ = builder.try_init();
    });
}

/// A fresh file path under the system temp directory.
pub fn random_path() -> PathBuf {
    env::temp_dir().join(format!("stormdb-{}.json", uuid::Uuid::new_v4()))
}

/// Removes a test file and its temporary sibling if they exist.
pub fn cleanup(path: &Path) {
    let _ = fs::remove_file(path);
    let mut temp = path.as_os_str().to_owned();
    temp.push(".tmp");
    let _ = fs::remove_file(PathBuf::from(temp));
}

/// Removes the file when dropped, so a failing assertion still cleans up.
pub struct TempFile {
    path: PathBuf,
}

impl TempFile {
    pub fn new() -> Self {
        init_logger();
        TempFile {
            path: random_path(),
        }
    }

    /// A temp file already holding `contents`.
    pub fn with_contents(contents: &[u8]) -> Self {
        let file = TempFile::new();
        fs::write(&file.path, contents).expect("failed to seed test file");
        file
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> String {
        fs::read_to_string(&self.path).expect("failed to read test file")
    }
}

impl Default for TempFile {
    fn default() -> Self {
        TempFile::new()
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        cleanup(&self.path);
    }
}

/// A key-value storage seeded with `item` under `key`, plus an engine on it.
pub fn seeded_browser_engine(
    key: &str,
    item: Option<&str>,
) -> StormResult<(InMemoryKeyValueStorage, BrowserEngine<InMemoryKeyValueStorage>)> {
    init_logger();
    let storage = InMemoryKeyValueStorage::new();
    if let Some(item) = item {
        storage.set_item(key, item)?;
    }
    let engine = BrowserEngine::new(storage.clone(), key);
    Ok((storage, engine))
}

/// Raw payload currently stored by any engine.
pub fn raw_payload<E: EngineProvider>(engine: &E) -> Option<String> {
    engine.load().expect("engine failed to load")
}
