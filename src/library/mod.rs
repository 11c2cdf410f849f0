//! Independent and project agnostic libraries
//!
//! Ideally, any of the library submodules in this module can be extracted into their own crate
//! at any given time. The worker engine in here speaks the plain Resque protocol and knows nothing
//! about ResqueBus, everything bus specific lives in the [`domain`](super::domain) module.

pub mod helpers;
pub mod worker;

/// Generic error type
pub type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result with no value and a [`BoxedError`]
pub type EmptyResult = Result<(), BoxedError>;
