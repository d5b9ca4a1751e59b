//! Authentication route handlers.
//!
//! Handles login, registration and logout against the mock auth service.
//! Failures redirect back to the form with an `error` code.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalUser, clear_current_user, set_current_user};
use crate::routes::NavView;
use crate::services::{AuthError, Registration};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    pub password: SecretString,
}

/// Registration form data.
#[derive(Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub password: SecretString,
    pub password_confirm: SecretString,
}

/// Query parameters for error display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

// =============================================================================
// Error Codes
// =============================================================================

/// Query-string code for an auth failure.
const fn error_code(err: &AuthError) -> &'static str {
    match err {
        AuthError::InvalidCredentials => "credentials",
        AuthError::InvalidEmail(_) => "invalid_email",
        AuthError::MissingField(_) => "missing_field",
        AuthError::PasswordMismatch => "password_mismatch",
    }
}

/// Message for an error code; unknown codes get a generic message.
fn error_message(code: &str) -> String {
    match code {
        "credentials" => "Invalid credentials",
        "invalid_email" => "Please enter a valid email address",
        "missing_field" => "Please fill in all fields",
        "password_mismatch" => "Passwords do not match",
        _ => "Something went wrong, please try again",
    }
    .to_string()
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub nav: NavView,
    pub error: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub nav: NavView,
    pub error: Option<String>,
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page. Signed-in visitors go home.
#[instrument(skip(state, session, user))]
pub async fn login_page(
    State(state): State<AppState>,
    session: Session,
    OptionalUser(user): OptionalUser,
    Query(query): Query<MessageQuery>,
) -> Result<Response, AppError> {
    if user.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    let nav = NavView::load(&state, &session, None).await?;
    Ok(LoginTemplate {
        nav,
        error: query.error.as_deref().map(error_message),
    }
    .into_response())
}

/// Handle login form submission.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Redirect, AppError> {
    match state.auth().login(&form.email, &form.password) {
        Ok(user) => {
            set_current_user(&session, &user).await?;
            set_sentry_user(&user.id, Some(user.email.as_str()));
            tracing::info!(user_id = %user.id, role = %user.role, "User logged in");
            Ok(Redirect::to("/"))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Login failed");
            Ok(Redirect::to(&format!("/login?error={}", error_code(&e))))
        }
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page. Signed-in visitors go home.
#[instrument(skip(state, session, user))]
pub async fn register_page(
    State(state): State<AppState>,
    session: Session,
    OptionalUser(user): OptionalUser,
    Query(query): Query<MessageQuery>,
) -> Result<Response, AppError> {
    if user.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    let nav = NavView::load(&state, &session, None).await?;
    Ok(RegisterTemplate {
        nav,
        error: query.error.as_deref().map(error_message),
    }
    .into_response())
}

/// Handle registration form submission. A valid form signs the visitor in.
#[instrument(skip(state, session, form))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Redirect, AppError> {
    let registration = Registration {
        name: form.name,
        email: form.email,
        password: form.password,
        password_confirm: form.password_confirm,
    };

    match state.auth().register(&registration) {
        Ok(user) => {
            set_current_user(&session, &user).await?;
            set_sentry_user(&user.id, Some(user.email.as_str()));
            tracing::info!(user_id = %user.id, "User registered");
            Ok(Redirect::to("/"))
        }
        Err(e) => {
            tracing::info!(error = %e, "Registration rejected");
            Ok(Redirect::to(&format!("/register?error={}", error_code(&e))))
        }
    }
}

// =============================================================================
// Logout
// =============================================================================

/// Sign out and return home.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Redirect, AppError> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    tracing::info!("User logged out");
    Ok(Redirect::to("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_round_trip_to_messages() {
        assert_eq!(
            error_message(error_code(&AuthError::InvalidCredentials)),
            "Invalid credentials"
        );
        assert_eq!(
            error_message(error_code(&AuthError::PasswordMismatch)),
            "Passwords do not match"
        );
        assert_eq!(
            error_message("<script>"),
            "Something went wrong, please try again"
        );
    }
}
