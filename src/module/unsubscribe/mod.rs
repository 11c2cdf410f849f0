//! Removes an application and all of its subscriptions from the bus

use crate::domain::Bus;
use crate::harness::{Heart, Module, ModuleTerminationReason, MonitoredRedisFactory};
use crate::library::worker::implementation::redis::{RedisEngineConfig, RedisWorkerEngine};
use crate::library::worker::WorkerEngine;
use crate::library::BoxedError;
use crate::module::options::{redis_engine, BusOptions, RedisOptions};
use async_trait::async_trait;
use jatsl::JobScheduler;
use std::sync::Arc;
use structopt::StructOpt;
use tracing::info;

/// Options for the unsubscribe module
#[derive(Debug, StructOpt)]
pub struct Options {
    /// Application to remove
    #[structopt(long, env = "APPLICATION")]
    pub application: String,

    #[allow(missing_docs)]
    #[structopt(flatten)]
    pub redis: RedisOptions,

    #[allow(missing_docs)]
    #[structopt(flatten)]
    pub bus: BusOptions,
}

/// Module implementation
pub struct Unsubscribe {
    options: Options,
    engine: Arc<RedisWorkerEngine<MonitoredRedisFactory>>,
}

impl Unsubscribe {
    /// Creates a new instance from raw parts
    pub fn new(options: Options) -> Self {
        let config = RedisEngineConfig {
            namespace: options.bus.namespace.clone(),
            pool_size: 1,
            ..Default::default()
        };
        let engine = Arc::new(redis_engine(&options.redis, config));

        Self { options, engine }
    }
}

#[async_trait]
impl Module for Unsubscribe {
    async fn run(&mut self, _scheduler: &JobScheduler) -> Result<Option<Heart>, BoxedError> {
        let bus = Bus::new(self.engine.clone(), self.options.bus.config());
        bus.unsubscribe(&self.options.application).await?;

        info!(application = %self.options.application, "Application removed");

        Ok(None)
    }

    async fn post_shutdown(&mut self, _termination_reason: &ModuleTerminationReason) {
        self.engine.close().await;
    }
}
