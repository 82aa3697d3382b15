mod engine;
mod storage;

pub use engine::*;
pub use storage::*;
