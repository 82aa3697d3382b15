//! # StormDB - Embedded JSON Document Store
//!
//! StormDB keeps a single JSON document in memory, lets you read and
//! mutate it through chainable path accessors, and writes it back through a
//! pluggable storage engine when you ask it to.
//!
//! ## Key Features
//!
//! - **Pluggable engines**: in-memory, local file and key-value storage
//!   backends behind one [`engine::EngineProvider`] trait
//! - **Explicit persistence**: nothing is written until [`StormDb::save`]
//! - **Safe loading**: missing data opens as `{}`, corrupt data fails to open
//! - **Custom codecs**: serializer and deserializer can be swapped
//!   independently through [`engine::EngineOptions`]
//! - **Chain accessors**: `db.get("a").get("b").value()` style navigation
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use stormdb::engine::memory::InMemoryEngine;
//! use stormdb::StormDb;
//!
//! # fn main() -> stormdb::errors::StormResult<()> {
//! let engine = InMemoryEngine::new();
//! let db = StormDb::open(engine.clone())?;
//!
//! db.default(json!({"users": []}))?;
//! db.get("users").push(json!({"name": "storm"}))?;
//! db.save()?;
//!
//! let reopened = StormDb::open(engine)?;
//! assert_eq!(reopened.get("users").get(0usize).get("name").value(), "storm");
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`common`] - Paths, constants and shared-state helpers
//! - [`engine`] - Engine contract, codec options and built-in engines
//! - [`errors`] - Error types and result definitions
//! - [`store`] - The document store, its builder and chain accessor

pub mod common;
pub mod engine;
pub mod errors;
pub mod store;

pub use serde_json::Value;
pub use store::{Chain, StormDb, StormDbBuilder};
