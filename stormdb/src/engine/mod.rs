//! Storage engines and the load/save contract.
//!
//! An engine moves raw text payloads between the document store and one
//! persistence medium. It also owns the serializer/deserializer pair the
//! store uses to turn those payloads into documents and back, but never
//! calls them itself.
//!
//! # Engines
//!
//! - **In-Memory**: [`memory::InMemoryEngine`] for tests and throwaway data
//! - **Local File**: [`local_file::LocalFileEngine`] for a document on disk
//! - **Browser**: [`browser::BrowserEngine`] over an injected key-value storage
//!
//! Any other backend plugs in by implementing [`EngineProvider`].
//!
//! # Absence
//!
//! `load()` returns `Ok(None)` when nothing is stored at the location. A
//! missing file or an unset key is a normal outcome, not an error, and the
//! store opens with an empty document in that case.

pub mod browser;
pub mod local_file;
pub mod memory;
mod options;
mod storage_engine;

pub use options::*;
pub use storage_engine::*;
