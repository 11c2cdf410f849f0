use crate::library::BoxedError;
use thiserror::Error;

/// Errors raised while processing jobs
#[derive(Error, Debug)]
pub enum WorkerError {
    /// No handler has been registered for the class of a leased job
    #[error("no job handler registered for class {0}")]
    UnknownClass(String),
    /// Job payload could not be decoded
    #[error("malformed job payload")]
    MalformedJob(#[from] serde_json::Error),
    /// Connection to the job store failed
    #[error("connection to job store failed")]
    Connection(#[source] BoxedError),
    /// Job handler panicked while processing a job
    #[error("job handler panicked: {0}")]
    Panicked(String),
    /// Work loop was started without any queues to watch
    #[error("no queues configured to work on")]
    NoQueues,
}
