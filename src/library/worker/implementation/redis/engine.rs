use super::{
    ConnectionPool, PipelinedConnection, RedisConnectionVariant, RedisEngineConfig, RedisFactory,
};
use crate::library::worker::{
    BoxedJobHandler, EngineConnection, FailedJob, JobRegistry, QueuedJob, WorkerEngine,
    WorkerError,
};
use crate::library::{BoxedError, EmptyResult};
use async_trait::async_trait;
use futures::future::try_join_all;
use futures::FutureExt;
use redis::aio::ConnectionLike;
use redis::{AsyncCommands, RedisError};
use serde_json::Value;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use tracing::{debug, info, instrument, trace, warn};

/// [`WorkerEngine`] leasing Resque jobs from redis lists
pub struct RedisWorkerEngine<F: RedisFactory> {
    factory: F,
    config: RedisEngineConfig,
    registry: JobRegistry,
    pool: ConnectionPool<F::Connection>,
}

impl<F: RedisFactory> RedisWorkerEngine<F> {
    /// Creates a new engine which obtains its connections from the given factory
    pub fn new(factory: F, config: RedisEngineConfig) -> Self {
        let pool = ConnectionPool::new(config.pool_size);

        Self {
            factory,
            config,
            registry: JobRegistry::default(),
            pool,
        }
    }

    /// Factory used for pooled connections
    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Registry containing all job handlers
    pub fn registry(&self) -> &JobRegistry {
        &self.registry
    }

    /// Runs the work loop with connections provided by a different factory
    ///
    /// Useful when the blocking connections of the pollers should be monitored by a different party
    /// than the one owning the engine.
    #[instrument(skip(self, factory), fields(queues = ?self.config.queues))]
    pub async fn work_with<G: RedisFactory>(&self, factory: &G) -> EmptyResult {
        if self.config.queues.is_empty() {
            return Err(WorkerError::NoQueues.into());
        }

        self.announce_queues().await?;

        let concurrency = self.config.concurrency.max(1);
        info!(concurrency, "Starting work loop");

        let pollers = (0..concurrency).map(|index| self.poll(factory, index));
        try_join_all(pollers).await?;

        Ok(())
    }

    /// Adds the watched queues to the set of known queues so that producers and dashboards can find them
    async fn announce_queues(&self) -> EmptyResult {
        let mut con = self.acquire_connection().await?;
        let queue_list_key = QueuedJob::queue_list_key(&self.config.namespace);

        for queue in self.config.queues.iter() {
            con.queue_command("SADD", &[&queue_list_key, queue])?;
        }

        let result = con.flush().await;
        self.release_connection(con).await;

        result
    }

    #[instrument(skip(self, factory))]
    async fn poll<G: RedisFactory>(&self, factory: &G, index: usize) -> EmptyResult {
        let mut con = factory
            .connection(RedisConnectionVariant::Owned)
            .await
            .map_err(WorkerError::Connection)?;

        let worker = self.worker_identifier(index);
        let queue_prefix = QueuedJob::queue_key(&self.config.namespace, "");
        let keys: Vec<String> = self
            .config
            .queues
            .iter()
            .map(|queue| QueuedJob::queue_key(&self.config.namespace, queue))
            .collect();

        let timeout = self.config.interval.as_secs().max(1) as usize;

        loop {
            let popped: Option<(String, String)> = con
                .blpop(keys.clone(), timeout)
                .await
                .map_err(connection_error)?;

            match popped {
                Some((key, payload)) => {
                    let queue = key.strip_prefix(&queue_prefix).unwrap_or(&key);
                    self.process(&mut con, &worker, queue, &payload).await?;
                }
                None => trace!("No jobs available"),
            }
        }
    }

    /// Dispatches a raw job payload and records the outcome.
    /// Only errors talking to redis are returned, job failures end up in the failure list.
    #[instrument(skip(self, con, payload))]
    async fn process<C: ConnectionLike + Send>(
        &self,
        con: &mut C,
        worker: &str,
        queue: &str,
        payload: &str,
    ) -> EmptyResult {
        let namespace = &self.config.namespace;

        let result = match serde_json::from_str::<QueuedJob>(payload) {
            Ok(job) => {
                debug!(class = %job.class, "Processing job");
                AssertUnwindSafe(self.registry.dispatch(queue, job))
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|panic| {
                        Err(WorkerError::Panicked(panic_message(panic.as_ref())).into())
                    })
            }
            Err(error) => Err(WorkerError::MalformedJob(error).into()),
        };

        match result {
            Ok(_) => {
                con.incr::<_, _, ()>(format!("{}stat:processed", namespace), 1)
                    .await
                    .map_err(connection_error)?;
            }
            Err(error) => {
                warn!(?error, "Job failed");

                let payload = serde_json::from_str(payload)
                    .unwrap_or_else(|_| Value::String(payload.to_string()));
                let failure =
                    FailedJob::new(payload, error.as_ref(), worker.to_string(), queue.to_string());
                let serialized = serde_json::to_string(&failure)?;

                redis::pipe()
                    .rpush(FailedJob::list_key(namespace), serialized)
                    .ignore()
                    .incr(format!("{}stat:failed", namespace), 1)
                    .ignore()
                    .query_async::<_, ()>(con)
                    .await
                    .map_err(connection_error)?;
            }
        }

        Ok(())
    }

    fn worker_identifier(&self, index: usize) -> String {
        let hostname = std::env::var("HOSTNAME").unwrap_or_else(|_| "localhost".to_string());

        format!(
            "{}:{}-{}:{}",
            hostname,
            std::process::id(),
            index,
            self.config.queues.join(",")
        )
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

fn connection_error(error: RedisError) -> WorkerError {
    WorkerError::Connection(error.into())
}

#[async_trait]
impl<F: RedisFactory> WorkerEngine for RedisWorkerEngine<F> {
    type Connection = PipelinedConnection<F::Connection>;

    async fn init(&self) -> EmptyResult {
        let mut con = self.pool.acquire(&self.factory).await?;
        let reply = redis::cmd("PING")
            .query_async::<_, String>(&mut con)
            .await
            .map_err(connection_error)?;
        self.pool.release(con).await;

        debug!(%reply, "Redis server reachable");

        Ok(())
    }

    async fn close(&self) {
        self.pool.drain().await;
    }

    async fn acquire_connection(&self) -> Result<Self::Connection, BoxedError> {
        let con = self.pool.acquire(&self.factory).await?;
        Ok(PipelinedConnection::new(con))
    }

    async fn release_connection(&self, connection: Self::Connection) {
        if connection.is_broken() {
            debug!("Dropping connection that failed to flush");
            return;
        }

        self.pool.release(connection.into_inner()).await;
    }

    fn namespace(&self) -> &str {
        &self.config.namespace
    }

    fn register_job_class(&self, class: String, handler: BoxedJobHandler) {
        self.registry.register(class, handler);
    }

    async fn run_work_loop(&self) -> EmptyResult {
        self.work_with(&self.factory).await
    }
}
