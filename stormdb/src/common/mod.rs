//! Common types and helpers shared by engines and the document store.

mod constants;
mod field_path;
mod type_utils;

pub use constants::*;
pub use field_path::*;
pub use type_utils::*;
