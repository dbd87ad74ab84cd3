//! Application layer for chatline
//!
//! Pure state machine and generic runtime for the client, so the same
//! orchestration code runs in production and in deterministic tests.
//!
//! # Components
//!
//! - [`App`]: client state machine (session, reconciler, debouncer,
//!   selection)
//! - [`Intent`]: user requests raised by the view layer
//! - [`Driver`]: trait for platform-specific I/O
//! - [`Runtime`]: generic orchestration loop using a [`Driver`]

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod driver;
mod error;
mod event;
mod intent;
mod runtime;

pub use action::AppAction;
pub use app::App;
pub use driver::Driver;
pub use error::AppError;
pub use event::AppEvent;
pub use intent::Intent;
pub use runtime::{RunOutcome, Runtime};
