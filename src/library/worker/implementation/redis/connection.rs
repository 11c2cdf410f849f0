use crate::library::worker::EngineConnection;
use crate::library::EmptyResult;
use async_trait::async_trait;
use redis::aio::ConnectionLike;
use redis::Pipeline;
use tracing::{trace, warn};

/// [`EngineConnection`] buffering commands in a redis [`Pipeline`]
pub struct PipelinedConnection<C> {
    con: C,
    pipeline: Pipeline,
    queued: usize,
    broken: bool,
}

impl<C> PipelinedConnection<C>
where
    C: ConnectionLike + Send,
{
    /// Wraps an existing connection
    pub fn new(con: C) -> Self {
        Self {
            con,
            pipeline: redis::pipe(),
            queued: 0,
            broken: false,
        }
    }

    /// Number of commands waiting to be flushed
    pub fn queued(&self) -> usize {
        self.queued
    }

    /// Whether a previous flush failed, leaving the connection in an unknown state
    pub fn is_broken(&self) -> bool {
        self.broken
    }

    /// Unwraps the underlying connection, discarding any commands that have not been flushed
    pub fn into_inner(self) -> C {
        if self.queued > 0 {
            warn!(queued = self.queued, "Discarding unflushed commands");
        }

        self.con
    }
}

#[async_trait]
impl<C> EngineConnection for PipelinedConnection<C>
where
    C: ConnectionLike + Send,
{
    fn queue_command(&mut self, name: &str, args: &[&str]) -> EmptyResult {
        self.pipeline.cmd(name);

        for arg in args {
            self.pipeline.arg(*arg);
        }

        self.pipeline.ignore();
        self.queued += 1;

        Ok(())
    }

    async fn flush(&mut self) -> EmptyResult {
        if self.queued == 0 {
            return Ok(());
        }

        trace!(commands = self.queued, "Flushing pipeline");

        let pipeline = std::mem::replace(&mut self.pipeline, redis::pipe());
        self.queued = 0;

        if let Err(e) = pipeline.query_async::<_, ()>(&mut self.con).await {
            self.broken = true;
            return Err(e.into());
        }

        Ok(())
    }
}
