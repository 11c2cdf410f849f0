use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Job as stored in a Resque queue
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct QueuedJob {
    /// Class name used to look up the [`JobHandler`](super::JobHandler)
    pub class: String,
    /// Positional arguments passed to the handler
    #[serde(default)]
    pub args: Vec<Value>,
}

impl QueuedJob {
    /// Creates a new instance from raw parts
    pub fn new(class: String, args: Vec<Value>) -> Self {
        Self { class, args }
    }

    /// Key of the list containing the jobs of a queue
    pub fn queue_key(namespace: &str, queue: &str) -> String {
        format!("{}queue:{}", namespace, queue)
    }

    /// Key of the set containing the names of all known queues
    pub fn queue_list_key(namespace: &str) -> String {
        format!("{}queues", namespace)
    }
}

/// Record of a job that failed to process, stored in the Resque failure list
#[derive(Serialize, Debug, Clone)]
pub struct FailedJob {
    /// Point in time at which the job failed, serialized the way Resque formats it
    #[serde(serialize_with = "serialize_resque_time")]
    pub failed_at: DateTime<Utc>,
    /// Job that failed, or the raw payload if it could not be decoded
    pub payload: Value,
    /// Short name of the error
    pub exception: String,
    /// Full error message
    pub error: String,
    /// Causes of the error, outermost first
    pub backtrace: Vec<String>,
    /// Identifier of the worker that processed the job
    pub worker: String,
    /// Queue the job was leased from
    pub queue: String,
}

impl FailedJob {
    /// Creates a failure record for the given payload and error chain
    pub fn new(
        payload: Value,
        error: &(dyn std::error::Error + 'static),
        worker: String,
        queue: String,
    ) -> Self {
        let mut backtrace = Vec::new();
        let mut source = error.source();

        while let Some(cause) = source {
            backtrace.push(cause.to_string());
            source = cause.source();
        }

        Self {
            failed_at: Utc::now(),
            payload,
            exception: exception_name(error),
            error: error.to_string(),
            backtrace,
            worker,
            queue,
        }
    }

    /// Key of the list containing all failed jobs
    pub fn list_key(namespace: &str) -> String {
        format!("{}failed", namespace)
    }
}

fn serialize_resque_time<S: Serializer>(time: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&time.format("%Y/%m/%d %H:%M:%S %Z"))
}

fn exception_name(error: &(dyn std::error::Error + 'static)) -> String {
    let debug = format!("{:?}", error);

    debug
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or("Error")
        .to_string()
}
