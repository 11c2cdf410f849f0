//! Registers a subscriber which logs every event it receives and processes the routed jobs

mod options;

use crate::constants::BUS_EVENT_TYPE;
use crate::domain::{Bus, Criteria, Payload, Subscriber};
use crate::harness::{
    Heart, Module, ModuleTerminationReason, MonitoredRedisFactory, WorkLoopJob,
};
use crate::library::worker::implementation::redis::RedisWorkerEngine;
use crate::library::worker::WorkerEngine;
use crate::library::{BoxedError, EmptyResult};
use crate::module::options::redis_engine;
use async_trait::async_trait;
use jatsl::JobScheduler;
use std::sync::Arc;
use tracing::{error, info};

pub use options::Options;

/// Subscriber writing received events to the log
pub struct LoggingSubscriber;

#[async_trait]
impl Subscriber for LoggingSubscriber {
    async fn handle(&self, payload: Payload) -> EmptyResult {
        info!(event = ?payload.get(BUS_EVENT_TYPE), ?payload, "Received event");
        Ok(())
    }
}

/// Module implementation
pub struct Worker {
    options: Options,
    engine: Arc<RedisWorkerEngine<MonitoredRedisFactory>>,
}

impl Worker {
    /// Creates a new instance from raw parts
    pub fn new(options: Options) -> Self {
        let config = options
            .worker
            .engine_config(&options.bus.namespace, vec![options.queue.clone()]);
        let engine = Arc::new(redis_engine(&options.redis, config));

        Self { options, engine }
    }

    fn criteria(&self) -> Criteria {
        let mut criteria: Criteria = self.options.criteria.iter().cloned().collect();

        if let Some(event) = &self.options.event {
            criteria.insert(BUS_EVENT_TYPE.to_string(), event.clone());
        }

        criteria
    }
}

#[async_trait]
impl Module for Worker {
    async fn pre_startup(&mut self) -> EmptyResult {
        self.engine.init().await?;

        let bus = Bus::new(self.engine.clone(), self.options.bus.config());
        let subscription = bus
            .subscribe(
                &self.options.application,
                &self.options.queue,
                &self.options.identity,
                LoggingSubscriber,
                Some(self.criteria()),
            )
            .await?;

        info!(
            application = %self.options.application,
            queue = %subscription.queue_name,
            event = subscription.event_type(),
            "Subscription registered"
        );

        Ok(())
    }

    async fn run(&mut self, scheduler: &JobScheduler) -> Result<Option<Heart>, BoxedError> {
        let (heart, stone) = Heart::new();
        let job = WorkLoopJob::new(self.engine.clone(), stone);

        scheduler.spawn_job(job).await;

        Ok(Some(heart))
    }

    async fn post_shutdown(&mut self, termination_reason: &ModuleTerminationReason) {
        self.engine.close().await;

        if termination_reason.is_failure() {
            error!(%termination_reason, "Worker terminated with an error");
        } else {
            info!("Worker shut down");
        }
    }
}
