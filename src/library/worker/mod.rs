//! Contract of a Resque compatible worker engine
//!
//! A worker engine owns the connection to the job store, a registry of job classes and a blocking
//! loop which leases jobs and hands them to the registered [`JobHandler`]. Consumers borrow
//! [`EngineConnection`]s from the engine to issue their own batched commands against the same store.
//!
//! Jobs are encoded in the format used by Resque itself (see [`QueuedJob`]) so that any
//! Resque producer can enqueue work for engines implementing this contract.

mod error;
mod job;
mod registry;

pub mod implementation;

pub use error::WorkerError;
pub use job::{FailedJob, QueuedJob};
pub use registry::JobRegistry;

use super::{BoxedError, EmptyResult};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Executable callback for jobs of a registered class
#[async_trait]
pub trait JobHandler: Send + Sync {
    /// Processes a job leased from the given queue with its positional arguments
    async fn perform(&self, queue: &str, args: Vec<Value>) -> EmptyResult;
}

/// Dynamic dispatch version of [`JobHandler`]
pub type BoxedJobHandler = Arc<dyn JobHandler>;

/// Connection borrowed from a [`WorkerEngine`]
///
/// Commands are buffered locally and only sent when [`flush`](EngineConnection::flush) is called,
/// resulting in a single round trip for all queued commands.
#[async_trait]
pub trait EngineConnection: Send {
    /// Appends a command to the current batch
    fn queue_command(&mut self, name: &str, args: &[&str]) -> EmptyResult;

    /// Sends all queued commands and clears the batch
    async fn flush(&mut self) -> EmptyResult;
}

/// Resque compatible worker engine
#[async_trait]
pub trait WorkerEngine: Send + Sync {
    /// Connection type handed out by [`acquire_connection`](WorkerEngine::acquire_connection)
    type Connection: EngineConnection;

    /// Verifies that the engine is able to reach its backing store
    async fn init(&self) -> EmptyResult;

    /// Tears down any resources held by the engine
    async fn close(&self);

    /// Borrows a connection from the engines pool
    async fn acquire_connection(&self) -> Result<Self::Connection, BoxedError>;

    /// Returns a previously acquired connection to the pool
    async fn release_connection(&self, connection: Self::Connection);

    /// Prefix prepended to every key used by the engine
    fn namespace(&self) -> &str;

    /// Registers a handler for jobs with the given class, replacing any previous one
    fn register_job_class(&self, class: String, handler: BoxedJobHandler);

    /// Processes jobs until an unrecoverable error occurs
    async fn run_work_loop(&self) -> EmptyResult;
}
