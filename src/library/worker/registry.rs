use super::{BoxedJobHandler, QueuedJob, WorkerError};
use crate::library::EmptyResult;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, instrument, warn};

/// Thread-safe mapping from job class names to their handlers
///
/// Clones share the same underlying map.
#[derive(Clone, Default)]
pub struct JobRegistry {
    handlers: Arc<RwLock<HashMap<String, BoxedJobHandler>>>,
}

impl JobRegistry {
    /// Registers a handler for a class and returns the one it replaced, if any
    pub fn register(&self, class: String, handler: BoxedJobHandler) -> Option<BoxedJobHandler> {
        let previous = self
            .handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(class.clone(), handler);

        if previous.is_some() {
            warn!(%class, "Replaced existing job handler");
        } else {
            debug!(%class, "Registered job handler");
        }

        previous
    }

    /// Looks up the handler for a class
    pub fn get(&self, class: &str) -> Option<BoxedJobHandler> {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(class)
            .cloned()
    }

    /// Names of all registered classes in no particular order
    pub fn classes(&self) -> Vec<String> {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    /// Number of registered classes
    pub fn len(&self) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no class has been registered yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Hands a job to the handler registered for its class
    #[instrument(skip(self, job), fields(class = %job.class))]
    pub async fn dispatch(&self, queue: &str, job: QueuedJob) -> EmptyResult {
        let handler = self
            .get(&job.class)
            .ok_or_else(|| WorkerError::UnknownClass(job.class.clone()))?;

        handler.perform(queue, job.args).await
    }
}
