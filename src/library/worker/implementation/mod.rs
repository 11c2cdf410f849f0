//! Implementations of the worker engine contract using third-party crates

pub mod redis;

#[cfg(test)]
pub(crate) mod mock;
