//! Terminal client for chatline
//!
//! A thin shell over [`chatline_app::Driver`] that provides line-oriented
//! terminal I/O and the network transport. All orchestration logic lives in
//! the generic [`chatline_app::Runtime`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod args;
pub mod commands;
pub mod driver;
pub mod render;
pub mod system_env;
pub mod transport;

pub use args::Args;
pub use driver::{CliDriver, CliError};
pub use system_env::SystemEnv;
