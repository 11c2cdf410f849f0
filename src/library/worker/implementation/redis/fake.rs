//! In-process stand-ins for redis connections used by the tests of this module

use super::{RedisConnectionVariant, RedisFactory};
use crate::library::BoxedError;
use async_trait::async_trait;
use futures::FutureExt;
use redis::aio::ConnectionLike;
use redis::{Cmd, Pipeline, RedisError, RedisFuture, Value};
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Connection recording every packed request it receives
#[derive(Clone, Default)]
pub struct RecordingConnection {
    pub requests: Arc<Mutex<Vec<String>>>,
}

impl ConnectionLike for RecordingConnection {
    fn req_packed_command<'a>(&'a mut self, cmd: &'a Cmd) -> RedisFuture<'a, Value> {
        let packed = String::from_utf8_lossy(&cmd.get_packed_command()).to_string();
        self.requests.lock().unwrap().push(packed);

        async { Ok(Value::Status("PONG".into())) }.boxed()
    }

    fn req_packed_commands<'a>(
        &'a mut self,
        cmd: &'a Pipeline,
        _offset: usize,
        count: usize,
    ) -> RedisFuture<'a, Vec<Value>> {
        let packed = String::from_utf8_lossy(&cmd.get_packed_pipeline()).to_string();
        self.requests.lock().unwrap().push(packed);

        async move { Ok(vec![Value::Okay; count]) }.boxed()
    }

    fn get_db(&self) -> i64 {
        0
    }
}

/// Factory counting the connections it creates
#[derive(Default)]
pub struct CountingFactory {
    pub created: AtomicUsize,
    pub connection: RecordingConnection,
}

#[async_trait]
impl RedisFactory for CountingFactory {
    type Connection = RecordingConnection;

    async fn connection(
        &self,
        _variant: RedisConnectionVariant,
    ) -> Result<Self::Connection, BoxedError> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(self.connection.clone())
    }
}

/// Connection whose requests all fail as if the server hung up
#[derive(Clone, Default)]
pub struct BrokenConnection;

impl BrokenConnection {
    fn reset() -> RedisError {
        RedisError::from(io::Error::new(io::ErrorKind::BrokenPipe, "connection reset"))
    }
}

impl ConnectionLike for BrokenConnection {
    fn req_packed_command<'a>(&'a mut self, _cmd: &'a Cmd) -> RedisFuture<'a, Value> {
        async { Err(BrokenConnection::reset()) }.boxed()
    }

    fn req_packed_commands<'a>(
        &'a mut self,
        _cmd: &'a Pipeline,
        _offset: usize,
        _count: usize,
    ) -> RedisFuture<'a, Vec<Value>> {
        async { Err(BrokenConnection::reset()) }.boxed()
    }

    fn get_db(&self) -> i64 {
        0
    }
}

/// Factory handing out [`BrokenConnection`] instances
#[derive(Default)]
pub struct BrokenFactory;

#[async_trait]
impl RedisFactory for BrokenFactory {
    type Connection = BrokenConnection;

    async fn connection(
        &self,
        _variant: RedisConnectionVariant,
    ) -> Result<Self::Connection, BoxedError> {
        Ok(BrokenConnection)
    }
}
