//! Various options usable by modules
//!
//! The structs in this module allow other modules to flatten them into
//! their own options struct. This allows for a unified yet non-cluttered
//! option set.

use crate::domain::BusConfig;
use crate::harness::{DummyResourceHandleProvider, MonitoredRedisFactory};
use crate::library::helpers::parse_seconds;
use crate::library::worker::implementation::redis::{RedisEngineConfig, RedisWorkerEngine};
use std::time::Duration;
use structopt::StructOpt;

/// Options for connecting to the Redis server
#[derive(Debug, StructOpt)]
pub struct RedisOptions {
    /// Redis database server URL
    #[structopt(
        short = "r",
        long = "redis",
        env = "REDIS",
        default_value = "redis://localhost:6379/",
        value_name = "url"
    )]
    pub url: String,

    /// Log every command sent to redis at trace level
    #[structopt(long = "log-redis")]
    pub log_commands: bool,
}

impl RedisOptions {
    /// Creates a connection factory for the configured server
    pub fn factory(&self) -> MonitoredRedisFactory {
        let mut factory =
            MonitoredRedisFactory::new(self.url.clone(), DummyResourceHandleProvider::new());
        factory.set_logging(self.log_commands);
        factory
    }
}

/// Options describing how bus data is laid out in redis
#[derive(Debug, StructOpt)]
pub struct BusOptions {
    /// Prefix prepended to every key
    #[structopt(long, env = "RESQUE_NAMESPACE", default_value = "resque:")]
    pub namespace: String,

    /// Name of the set listing all registered applications
    #[structopt(long, default_value = "resquebus_apps", value_name = "key")]
    pub app_list_key: String,

    /// Prefix of the hashes holding the subscriptions of each application
    #[structopt(long, default_value = "resquebus_app", value_name = "key")]
    pub app_single_key: String,

    /// Marker separating identity prefix and name in subscription keys
    #[structopt(long, default_value = "__busSubscriber__", value_name = "marker")]
    pub subscriber_marker: String,
}

impl BusOptions {
    /// Immutable bus configuration derived from the options
    pub fn config(&self) -> BusConfig {
        BusConfig {
            app_list_key: self.app_list_key.clone(),
            app_single_key: self.app_single_key.clone(),
            subscriber_marker: self.subscriber_marker.clone(),
        }
    }
}

/// Options tuning the work loop
#[derive(Debug, StructOpt)]
pub struct WorkerOptions {
    /// Number of jobs processed in parallel
    #[structopt(long, env = "CONCURRENCY", default_value = "1")]
    pub concurrency: usize,

    /// Maximum number of seconds to block while waiting for a job
    #[structopt(long, default_value = "5", parse(try_from_str = parse_seconds), value_name = "seconds")]
    pub interval: Duration,

    /// Maximum number of idle redis connections kept around
    #[structopt(long, default_value = "4")]
    pub pool_size: usize,
}

impl WorkerOptions {
    /// Engine configuration leasing jobs from the given queues
    pub fn engine_config(&self, namespace: &str, queues: Vec<String>) -> RedisEngineConfig {
        RedisEngineConfig {
            namespace: namespace.to_string(),
            queues,
            concurrency: self.concurrency,
            interval: self.interval,
            pool_size: self.pool_size,
        }
    }
}

/// Creates an engine talking to the configured redis server
pub fn redis_engine(
    redis: &RedisOptions,
    config: RedisEngineConfig,
) -> RedisWorkerEngine<MonitoredRedisFactory> {
    RedisWorkerEngine::new(redis.factory(), config)
}

#[cfg(test)]
mod does {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, StructOpt)]
    struct Harness {
        #[structopt(flatten)]
        bus: BusOptions,
        #[structopt(flatten)]
        worker: WorkerOptions,
    }

    #[test]
    fn default_to_driver_layout() {
        let options = Harness::from_iter_safe(&["test"]).unwrap();

        assert_eq!(options.bus.config(), BusConfig::default());
    }

    #[test]
    fn build_engine_config() {
        let options =
            Harness::from_iter_safe(&["test", "--concurrency", "3", "--interval", "2"]).unwrap();
        let config = options
            .worker
            .engine_config("ns:", vec!["q1".to_string()]);

        assert_eq!(config.namespace, "ns:");
        assert_eq!(config.queues, vec!["q1".to_string()]);
        assert_eq!(config.concurrency, 3);
        assert_eq!(config.interval, Duration::from_secs(2));
        assert_eq!(config.pool_size, 4);
    }
}
