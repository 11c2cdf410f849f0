//! In-memory worker engine for tests

mod engine;

pub use engine::*;
