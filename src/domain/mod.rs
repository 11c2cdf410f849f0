//! ResqueBus specific structures, implementations, and logic
//!
//! A subscription consists of a subscriber identity, the queue its jobs should be routed to and a
//! [`Matcher`] describing which events it is interested in. Subscriptions are written to redis in the
//! format the ResqueBus driver expects so that it can route matching events into the subscribers queue,
//! and the subscriber is registered with the local [`WorkerEngine`](crate::library::worker::WorkerEngine)
//! so that the routed jobs can be processed.

mod bus;
mod config;
mod dispatch;
mod identity;
mod matcher;
mod store;
mod subscription;

pub mod keys;

pub use bus::*;
pub use config::*;
pub use dispatch::*;
pub use identity::*;
pub use matcher::*;
pub use store::*;
pub use subscription::*;
