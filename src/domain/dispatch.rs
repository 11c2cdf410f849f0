use super::SubscriberIdentity;
use crate::constants::BUS_EVENT_TYPE;
use crate::library::worker::JobHandler;
use crate::library::EmptyResult;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, instrument};

/// Attributes of a bus event as delivered to a [`Subscriber`]
pub type Payload = Map<String, Value>;

/// Callback receiving the events a subscription matched
#[async_trait]
pub trait Subscriber: Send + Sync {
    /// Processes one event
    async fn handle(&self, payload: Payload) -> EmptyResult;
}

#[async_trait]
impl<F, Fut> Subscriber for F
where
    F: Fn(Payload) -> Fut + Send + Sync,
    Fut: Future<Output = EmptyResult> + Send,
{
    async fn handle(&self, payload: Payload) -> EmptyResult {
        (self)(payload).await
    }
}

/// Errors raised while unwrapping an inbound job
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    /// First job argument is missing or not an object
    #[error("expected the first job argument to be an object, found {found}")]
    TypeMismatch {
        /// Description of what was found instead
        found: &'static str,
    },
}

/// [`JobHandler`] unwrapping the event payload from a job and passing it to a [`Subscriber`]
pub struct SubscriberJob<S: Subscriber> {
    subscriber: Arc<S>,
    identity: SubscriberIdentity,
    application: String,
}

impl<S: Subscriber> SubscriberJob<S> {
    /// Wraps a subscriber registered by an application under the given identity
    pub fn new(subscriber: Arc<S>, identity: SubscriberIdentity, application: String) -> Self {
        Self {
            subscriber,
            identity,
            application,
        }
    }
}

/// Extracts the event payload from the positional job arguments
pub fn extract_payload(mut args: Vec<Value>) -> Result<Payload, DispatchError> {
    if args.is_empty() {
        return Err(DispatchError::TypeMismatch { found: "nothing" });
    }

    match args.swap_remove(0) {
        Value::Object(payload) => Ok(payload),
        other => Err(DispatchError::TypeMismatch {
            found: value_kind(&other),
        }),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[async_trait]
impl<S: Subscriber> JobHandler for SubscriberJob<S> {
    #[instrument(
        skip(self, args),
        fields(application = %self.application, subscriber = %self.identity)
    )]
    async fn perform(&self, queue: &str, args: Vec<Value>) -> EmptyResult {
        let payload = extract_payload(args)?;

        debug!(
            event = ?payload.get(BUS_EVENT_TYPE),
            "Bus subscriber activated"
        );

        self.subscriber.handle(payload).await
    }
}
