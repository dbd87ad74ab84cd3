//! Command-line configuration.

use std::time::Duration;

use chatline_core::{ClientConfig, Credentials, config::DEFAULT_SUGGESTION_QUIET_PERIOD};
use clap::Parser;

/// Chatline terminal client
#[derive(Parser, Debug)]
#[command(name = "chatline")]
#[command(about = "Line-oriented terminal client for chatline servers")]
#[command(version)]
pub struct Args {
    /// Base URL of the server (http or https)
    #[arg(short, long, env = "CHATLINE_SERVER", default_value = "http://localhost:8080")]
    pub server: String,

    /// Username to log in as
    #[arg(short, long, env = "CHATLINE_USERNAME")]
    pub username: String,

    /// Password
    #[arg(short, long, env = "CHATLINE_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Quiet period before a search is sent, in milliseconds
    #[arg(long, default_value_t = DEFAULT_SUGGESTION_QUIET_PERIOD.as_millis() as u64)]
    pub debounce_ms: u64,

    /// Log filter directive (overrides RUST_LOG)
    #[arg(long)]
    pub log_filter: Option<String>,
}

impl Args {
    /// Client tunables from the arguments.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig { suggestion_quiet_period: Duration::from_millis(self.debounce_ms) }
    }

    /// Login credentials from the arguments.
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.username.clone(), self.password.clone())
    }
}
