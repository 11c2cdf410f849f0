use super::{HeartStone, MonitoredRedisFactory};
use crate::library::worker::implementation::redis::RedisWorkerEngine;
use crate::library::EmptyResult;
use async_trait::async_trait;
use jatsl::Job;
use std::sync::Arc;
use tracing::error;

/// Job which runs the work loop of a [`RedisWorkerEngine`]
///
/// The blocking connections of the loop are monitored by the job so that it is restarted when
/// redis goes away. Once the loop gives up, the heart linked to the stone is killed.
pub struct WorkLoopJob {
    engine: Arc<RedisWorkerEngine<MonitoredRedisFactory>>,
    heart_stone: HeartStone,
}

impl WorkLoopJob {
    /// Creates a new instance working on the given engine
    pub fn new(engine: Arc<RedisWorkerEngine<MonitoredRedisFactory>>, heart_stone: HeartStone) -> Self {
        Self {
            engine,
            heart_stone,
        }
    }
}

#[async_trait]
impl Job for WorkLoopJob {
    const NAME: &'static str = module_path!();

    async fn execute(&self, manager: jatsl::JobManager) -> EmptyResult {
        let manager = Arc::new(manager);
        let factory = self.engine.factory().with_handle_provider(manager.clone());

        manager.ready().await;

        let result = self.engine.work_with(&factory).await;

        let reason = match &result {
            Ok(_) => "Work loop exited".to_string(),
            Err(e) => {
                error!(error = %e, "Work loop failed");
                format!("Work loop failed: {}", e)
            }
        };

        self.heart_stone.clone().kill(reason).await;

        result
    }
}
