//! Chatline terminal client entry point.

use chatline_app::{RunOutcome, Runtime};
use chatline_cli::{Args, CliDriver, CliError, SystemEnv};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = match &args.log_filter {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    // stdout carries the screen, logs go to stderr
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let server = Url::parse(&args.server)
        .map_err(|e| CliError::Config(format!("--server {}: {e}", args.server)))?;
    let env = SystemEnv::new();
    let mut runtime =
        Runtime::new(CliDriver::new(server, env.clone()), env, &args.client_config());

    match runtime.run(args.credentials()).await? {
        RunOutcome::Quit | RunOutcome::LoggedOut => Ok(()),
        RunOutcome::LoginRejected { message } => Err(format!("login failed: {message}").into()),
        RunOutcome::Disconnected { reason } => Err(format!("disconnected: {reason}").into()),
    }
}
