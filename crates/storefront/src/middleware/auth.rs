//! Authentication extractors and session helpers.
//!
//! The signed-in visitor is a JSON [`User`] record under the `user` session
//! key. Anything that fails to decode is logged and treated as signed out.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{User, session_keys};

/// Extractor that requires a signed-in visitor.
///
/// Redirects to `/login` otherwise.
///
/// ```rust,ignore
/// async fn orders(RequireUser(user): RequireUser) -> impl IntoResponse {
///     format!("Orders for {}", user.name)
/// }
/// ```
pub struct RequireUser(pub User);

/// Extractor that requires a signed-in admin.
///
/// Anonymous visitors are sent to `/login`, signed-in customers to `/`.
pub struct RequireAdmin(pub User);

/// Why a guarded request was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    /// Not signed in.
    RedirectToLogin,
    /// Signed in without the admin role.
    RedirectToHome,
    /// No session layer on this route.
    Unauthorized,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/login").into_response(),
            Self::RedirectToHome => Redirect::to("/").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

/// Read the signed-in user from a session.
///
/// Malformed data is logged at warn and reported as `None`.
pub async fn current_user(session: &Session) -> Option<User> {
    match session.get::<User>(session_keys::USER).await {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring unreadable session user");
            None
        }
    }
}

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AuthRejection::Unauthorized)?;

        current_user(session)
            .await
            .map(Self)
            .ok_or(AuthRejection::RedirectToLogin)
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequireUser(user) = RequireUser::from_request_parts(parts, state).await?;

        if !user.is_admin() {
            tracing::info!(user_id = %user.id, path = %parts.uri.path(), "Non-admin denied");
            return Err(AuthRejection::RedirectToHome);
        }

        Ok(Self(user))
    }
}

/// Extractor that optionally gets the signed-in visitor.
///
/// Unlike `RequireUser`, this never rejects the request.
pub struct OptionalUser(pub Option<User>);

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => current_user(session).await,
            None => None,
        };

        Ok(Self(user))
    }
}

/// Sign a user in.
///
/// The session ID is cycled first so a pre-login cookie cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &User,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::USER, user).await
}

/// Sign the visitor out (logout). The cart is left alone.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove::<serde_json::Value>(session_keys::USER).await?;
    Ok(())
}
