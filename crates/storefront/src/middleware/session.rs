//! Session middleware configuration and typed session accessors.
//!
//! Sessions live in an in-memory store: a visitor's cart, sign-in and
//! checkout progress last until the process restarts or the session expires.

use std::collections::HashSet;
use std::hash::Hash;

use serde::{Serialize, de::DeserializeOwned};
use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};

use crate::config::StorefrontConfig;
use crate::models::{Cart, session_keys};
use crate::services::{PlacedOrder, ShippingInfo};

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "shopwave_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer with an in-memory store.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// Read a value, treating undecodable data as absent.
///
/// # Errors
///
/// Returns an error only if the session store itself fails.
async fn get_or_default<T>(session: &Session, key: &str) -> Result<T, tower_sessions::session::Error>
where
    T: DeserializeOwned + Default,
{
    match session.get::<T>(key).await {
        Ok(value) => Ok(value.unwrap_or_default()),
        Err(tower_sessions::session::Error::SerdeJson(e)) => {
            tracing::warn!(key, error = %e, "Discarding malformed session value");
            Ok(T::default())
        }
        Err(e) => Err(e),
    }
}

// =============================================================================
// Cart
// =============================================================================

/// Load the visitor's cart (empty if none).
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn load_cart(session: &Session) -> Result<Cart, tower_sessions::session::Error> {
    get_or_default(session, session_keys::CART).await
}

/// Persist the visitor's cart.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn save_cart(session: &Session, cart: &Cart) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CART, cart).await
}

// =============================================================================
// Checkout
// =============================================================================

/// Shipping details from checkout step 1, if entered.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn load_shipping(
    session: &Session,
) -> Result<Option<ShippingInfo>, tower_sessions::session::Error> {
    get_or_default(session, session_keys::CHECKOUT).await
}

/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn save_shipping(
    session: &Session,
    shipping: &ShippingInfo,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CHECKOUT, shipping).await
}

/// Forget checkout progress.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_shipping(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<serde_json::Value>(session_keys::CHECKOUT)
        .await?;
    Ok(())
}

/// The most recently placed order, if any.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn load_last_order(
    session: &Session,
) -> Result<Option<PlacedOrder>, tower_sessions::session::Error> {
    get_or_default(session, session_keys::LAST_ORDER).await
}

/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn save_last_order(
    session: &Session,
    order: &PlacedOrder,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::LAST_ORDER, order).await
}

// =============================================================================
// Admin overlays
// =============================================================================

/// IDs hidden from an admin table for this session.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn load_hidden<T>(
    session: &Session,
    key: &str,
) -> Result<HashSet<T>, tower_sessions::session::Error>
where
    T: DeserializeOwned + Eq + Hash,
{
    get_or_default(session, key).await
}

/// Add an ID to an admin overlay.
///
/// # Errors
///
/// Returns an error if the session cannot be read or modified.
pub async fn hide<T>(session: &Session, key: &str, id: T) -> Result<(), tower_sessions::session::Error>
where
    T: Serialize + DeserializeOwned + Eq + Hash,
{
    let mut hidden: HashSet<T> = load_hidden(session, key).await?;
    hidden.insert(id);
    session.insert(key, hidden).await
}
