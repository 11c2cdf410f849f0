use futures::FutureExt;
use jatsl::TaskResourceHandle;
use redis::aio::{Connection, ConnectionLike};
use redis::{Client, Cmd, ErrorKind, Pipeline, RedisError, RedisFuture, RedisResult, Value};
use std::time::Duration;
use tokio::task::yield_now;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, instrument, trace, warn};

const CONNECT_ATTEMPTS: usize = 5;
const CONNECT_RETRY_INTERVAL: Duration = Duration::from_secs(2);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(4);

/// Handle a redis command result.
macro_rules! notify_if_disconnected {
    ($self:expr, $result:expr) => {
        if let Err(ref e) = $result {
            if e.is_connection_dropped()
                || e.is_io_error()
                || e.is_connection_refusal()
                || e.is_timeout()
            {
                $self.notify(e).await;
            }
        }
    };
}

/// Redis connection that reports connection errors to a [`TaskResourceHandle`]
///
/// When the resource dies, the job owning the handle is terminated by its scheduler.
pub struct RedisResource<C: ConnectionLike> {
    con: C,
    handle: TaskResourceHandle,
    logging_enabled: bool,
}

impl<C: ConnectionLike> RedisResource<C> {
    /// Wraps an existing connection
    pub fn new(con: C, handle: TaskResourceHandle) -> Self {
        Self {
            con,
            handle,
            logging_enabled: false,
        }
    }

    /// Enables request logging
    pub fn set_logging(&mut self, enabled: bool) {
        self.logging_enabled = enabled;
    }

    async fn notify(&mut self, error: &RedisError) {
        error!(?error, "Redis connection encountered error");
        self.handle.resource_died().await;
        yield_now().await;
    }
}

impl RedisResource<Connection> {
    /// Opens a standalone connection, retrying a couple of times before giving up
    #[instrument(skip(handle))]
    pub async fn connect(url: &str, handle: TaskResourceHandle) -> RedisResult<Self> {
        debug!("Instantiating new standalone redis client");

        let client = Client::open(url)?;
        let mut attempt = 0;

        loop {
            trace!(attempt, "Connecting to redis");

            let error = match timeout(CONNECT_TIMEOUT, client.get_async_connection()).await {
                Ok(Ok(con)) => return Ok(Self::new(con, handle)),
                Ok(Err(error)) => {
                    warn!(?error, "Failed to connect to redis");
                    error
                }
                Err(_) => {
                    warn!("Timeout connecting to redis");
                    RedisError::from((ErrorKind::IoError, "connection attempt timed out"))
                }
            };

            attempt += 1;

            if attempt >= CONNECT_ATTEMPTS {
                return Err(error);
            }

            sleep(CONNECT_RETRY_INTERVAL).await;
        }
    }
}

impl<C: ConnectionLike + Send> ConnectionLike for RedisResource<C> {
    fn req_packed_command<'a>(&'a mut self, cmd: &'a Cmd) -> RedisFuture<'a, Value> {
        (async move {
            if self.logging_enabled {
                trace!(command = %readable_command(&cmd.get_packed_command()), "Redis TX");
            }

            let result = self.con.req_packed_command(cmd).await;

            if self.logging_enabled {
                match result {
                    Ok(ref value) => trace!(?value, "Redis RECV"),
                    Err(ref error) => trace!(?error, "Redis RECV failed"),
                }
            }

            notify_if_disconnected!(self, result);
            result
        })
        .boxed()
    }

    fn req_packed_commands<'a>(
        &'a mut self,
        cmd: &'a Pipeline,
        offset: usize,
        count: usize,
    ) -> RedisFuture<'a, Vec<Value>> {
        (async move {
            if self.logging_enabled {
                trace!(command = %readable_command(&cmd.get_packed_pipeline()), "Redis TX");
            }

            let result = self.con.req_packed_commands(cmd, offset, count).await;

            if self.logging_enabled {
                match result {
                    Ok(ref values) => trace!(?values, "Redis RECV"),
                    Err(ref error) => trace!(?error, "Redis RECV failed"),
                }
            }

            notify_if_disconnected!(self, result);
            result
        })
        .boxed()
    }

    fn get_db(&self) -> i64 {
        self.con.get_db()
    }
}

/// Renders packed RESP commands as space separated arguments, one command per line
fn readable_command(packed: &[u8]) -> String {
    let input = String::from_utf8_lossy(packed);
    let mut lines = input.split("\r\n");
    let mut commands: Vec<String> = Vec::new();

    while let Some(line) = lines.next() {
        if line.starts_with('*') {
            commands.push(String::new());
        } else if line.starts_with('$') {
            if let (Some(command), Some(argument)) = (commands.last_mut(), lines.next()) {
                if !command.is_empty() {
                    command.push(' ');
                }

                command.push_str(argument);
            }
        }
    }

    commands.join("\n")
}
