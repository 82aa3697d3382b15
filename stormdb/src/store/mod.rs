//! The document store and its chain accessor.
//!
//! [`StormDb`] owns one in-memory JSON document per open store. [`Chain`]
//! handles point into that document by path, and [`StormDbBuilder`]
//! carries the store's configuration.

mod builder;
mod chain;
mod navigation;
mod storm_db;

pub use builder::*;
pub use chain::*;
pub use storm_db::*;
