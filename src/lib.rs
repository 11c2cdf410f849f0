//! This library crate contains everything needed to register ResqueBus subscribers and process the jobs routed to them.
//!
//! Submodules have been introduced to split responsibilities. They form a chain of dependencies from the
//! low-level [`library`] (a Resque compatible worker engine), over the ResqueBus [`domain`] specific logic,
//! through the executable [`harness`], up to the runnable [`modules`](module).

#![deny(missing_docs)]

pub mod constants;
pub mod domain;
pub mod harness;
pub mod library;
pub mod module;
