//! Authentication error types.

use thiserror::Error;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] shopwave_core::EmailError),

    /// Email/password pair does not match a known account.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// A required registration field was left blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Password and confirmation differ.
    #[error("passwords do not match")]
    PasswordMismatch,
}
