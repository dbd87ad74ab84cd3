//! Application errors.

use chatline_core::{ReconcileError, SessionError};
use thiserror::Error;

/// Why an intent was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Session refused the operation.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Reconciler refused the operation.
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    /// Operation needs a selected chat.
    #[error("no chat selected")]
    NoChatSelected,
}

impl AppError {
    /// Returns true if the error should be shown to the user.
    pub fn is_user_facing(&self) -> bool {
        match self {
            Self::Session(err) => err.is_user_facing(),
            Self::Reconcile(err) => err.is_user_facing(),
            Self::NoChatSelected => true,
        }
    }
}
