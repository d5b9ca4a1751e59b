//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::models::CartError;
use crate::services::{AuthError, CheckoutError};

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Session store read or write failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Cart operation rejected.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Checkout validation or payment failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this is a server-side failure worth reporting.
    const fn is_server_error(&self) -> bool {
        matches!(self, Self::Session(_) | Self::Internal(_))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(AuthError::InvalidCredentials) => StatusCode::UNAUTHORIZED,
            Self::Auth(_) | Self::Cart(_) | Self::Checkout(_) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Session(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Auth(err) => user_message(err),
            Self::Cart(err) => err.to_string(),
            Self::Checkout(err) => checkout_message(err),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Message shown to the visitor for an authentication failure.
#[must_use]
pub fn user_message(err: &AuthError) -> String {
    match err {
        AuthError::InvalidCredentials => "Invalid credentials".to_string(),
        AuthError::InvalidEmail(_) => "Please enter a valid email address".to_string(),
        AuthError::MissingField(field) => format!("Please enter your {field}"),
        AuthError::PasswordMismatch => "Passwords do not match".to_string(),
    }
}

/// Message shown to the visitor for a checkout failure.
#[must_use]
pub fn checkout_message(err: &CheckoutError) -> String {
    match err {
        CheckoutError::MissingField(field) => format!("Please enter the {field}"),
        CheckoutError::InvalidEmail(_) => "Please enter a valid email address".to_string(),
        CheckoutError::InvalidCardNumber => "Please enter a valid card number".to_string(),
        CheckoutError::InvalidExpiry => "Please enter the expiry date as MM/YY".to_string(),
        CheckoutError::InvalidCvv => "Please enter a valid CVV".to_string(),
        CheckoutError::MissingShipping => "Please enter your shipping details first".to_string(),
        CheckoutError::EmptyCart => "Your cart is empty".to_string(),
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context for the signed-in visitor.
///
/// Call this after login so errors are associated with the user.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context on logout.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for a visitor action.
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "6")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
