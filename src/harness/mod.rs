//! Runtime harness to execute the worker in the context of a managed process

mod heart;
mod module;
mod redis;
mod work;

pub use self::redis::*;
pub use heart::*;
pub use module::*;
pub use work::*;
