use super::{RedisConnectionVariant, RedisFactory};
use crate::library::BoxedError;
use futures::lock::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::trace;

/// Bounded pool of idle connections created by a [`RedisFactory`]
pub struct ConnectionPool<C> {
    idle: Mutex<Vec<C>>,
    capacity: usize,
    closed: AtomicBool,
}

impl<C> ConnectionPool<C> {
    /// Creates an empty pool retaining at most `capacity` idle connections
    pub fn new(capacity: usize) -> Self {
        Self {
            idle: Mutex::new(Vec::with_capacity(capacity)),
            capacity,
            closed: AtomicBool::new(false),
        }
    }

    /// Reuses an idle connection or creates a new one
    pub async fn acquire<F>(&self, factory: &F) -> Result<C, BoxedError>
    where
        F: RedisFactory<Connection = C>,
    {
        if let Some(con) = self.idle.lock().await.pop() {
            trace!("Reusing pooled connection");
            return Ok(con);
        }

        trace!("Creating pooled connection");
        factory.connection(RedisConnectionVariant::Pooled).await
    }

    /// Puts a connection back into the pool or drops it if the pool is full or has been drained
    pub async fn release(&self, con: C) {
        let mut idle = self.idle.lock().await;

        if self.closed.load(Ordering::SeqCst) {
            trace!("Pool is closed, dropping connection");
        } else if idle.len() < self.capacity {
            idle.push(con);
        } else {
            trace!("Pool is full, dropping connection");
        }
    }

    /// Number of idle connections
    pub async fn idle(&self) -> usize {
        self.idle.lock().await.len()
    }

    /// Drops all idle connections and closes the pool for connections released later on
    pub async fn drain(&self) {
        let mut idle = self.idle.lock().await;
        self.closed.store(true, Ordering::SeqCst);
        idle.clear();
    }
}
