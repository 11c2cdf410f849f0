//! Worker engine implementation using [`redis`](::redis)

mod connection;
mod engine;
mod pool;

#[cfg(test)]
pub(crate) mod fake;

pub use connection::*;
pub use engine::*;
pub use pool::*;

use crate::constants::DEFAULT_NAMESPACE;
use crate::library::BoxedError;
use async_trait::async_trait;
use redis::aio::ConnectionLike;
use std::time::Duration;

/// Variant for redis connections
pub enum RedisConnectionVariant {
    /// Individual connection that may allow for blocking commands without disturbing other users.
    /// The work loop uses this variant for its `BLPOP` calls as they block for up to the poll interval.
    Owned,
    /// Connection which is expected to only be used for short, non-blocking batches
    /// so that the use of a connection pool is viable.
    Pooled,
}

/// Factory for redis connections of different [types](RedisConnectionVariant)
#[async_trait]
pub trait RedisFactory: Send + Sync {
    /// Type of connection returned by the factory
    type Connection: ConnectionLike + Send + Sync + 'static;

    /// Establishes a new connection
    async fn connection(
        &self,
        variant: RedisConnectionVariant,
    ) -> Result<Self::Connection, BoxedError>;
}

/// Configuration of a [`RedisWorkerEngine`]
#[derive(Debug, Clone)]
pub struct RedisEngineConfig {
    /// Prefix prepended to every key
    pub namespace: String,
    /// Queues to lease jobs from, in order of priority
    pub queues: Vec<String>,
    /// Number of jobs processed in parallel
    pub concurrency: usize,
    /// Maximum duration a poller blocks waiting for a job before polling again
    pub interval: Duration,
    /// Maximum number of idle connections kept in the pool
    pub pool_size: usize,
}

impl Default for RedisEngineConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            queues: Vec::new(),
            concurrency: 1,
            interval: Duration::from_secs(5),
            pool_size: 4,
        }
    }
}
