use crate::library::helpers::parse_key_value;
use crate::module::options::{BusOptions, RedisOptions, WorkerOptions};
use structopt::StructOpt;

/// Options for the worker module
#[derive(Debug, StructOpt)]
pub struct Options {
    /// Application the subscription is registered for
    #[structopt(long, env = "APPLICATION")]
    pub application: String,

    /// Queue the driver routes matching events into
    #[structopt(long, env = "QUEUE")]
    pub queue: String,

    /// Event type to subscribe to, defaults to the last segment of the identity
    #[structopt(long)]
    pub event: Option<String>,

    /// Stable, dot-separated identity of the subscriber
    #[structopt(long, default_value = "resquebus.worker.log")]
    pub identity: String,

    /// Additional criteria an event has to satisfy
    #[structopt(
        long = "match",
        parse(try_from_str = parse_key_value),
        value_name = "key=value"
    )]
    pub criteria: Vec<(String, String)>,

    #[allow(missing_docs)]
    #[structopt(flatten)]
    pub redis: RedisOptions,

    #[allow(missing_docs)]
    #[structopt(flatten)]
    pub bus: BusOptions,

    #[allow(missing_docs)]
    #[structopt(flatten)]
    pub worker: WorkerOptions,
}
