use anyhow::{bail, Result};
use options::{Command, LogFormat};
use resquebus::harness::ModuleRunner;
use resquebus::module::unsubscribe::Unsubscribe;
use resquebus::module::worker::Worker;
use structopt::StructOpt;
use tracing::info;

mod options;

#[tokio::main]
async fn main() -> Result<()> {
    let (command, runner) = init();

    let termination_reason = match command {
        Command::Worker(options) => runner.run(Worker::new(options)).await,
        Command::Unsubscribe(options) => runner.run(Unsubscribe::new(options)).await,
    };

    if termination_reason.is_failure() {
        bail!(termination_reason);
    }

    Ok(())
}

fn init() -> (Command, ModuleRunner) {
    let options = options::MainOptions::from_args();

    let formatter = tracing_subscriber::fmt().with_env_filter(options.log);

    match options.log_format {
        LogFormat::Text => formatter.init(),
        LogFormat::Compact => formatter.compact().init(),
        LogFormat::Json => formatter.json().init(),
    };

    info!("resquebus {}", env!("CARGO_PKG_VERSION"));

    (options.command, ModuleRunner::new(options.status_server))
}
