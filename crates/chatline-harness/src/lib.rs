//! Deterministic test harness for the chatline client.
//!
//! A virtual clock ([`SimEnv`]) and a scripted [`Driver`] implementation
//! ([`SimDriver`]) let the production [`chatline_app::Runtime`] run under
//! test with exact control over timing, login results and server frames.
//!
//! [`Driver`]: chatline_app::Driver

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod sim_driver;
pub mod sim_env;

pub use sim_driver::{SimDriver, SimDriverError};
pub use sim_env::{SimEnv, SimInstant};
