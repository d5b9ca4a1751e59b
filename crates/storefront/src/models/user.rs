//! User domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopwave_core::{Email, Price, Role, UserId};

/// The signed-in visitor.
///
/// Stored as JSON in the session under [`super::session_keys::USER`] and
/// trusted as-is on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: Role,
}

impl User {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// An account row in the admin users table (sample data only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub orders: u32,
    pub total_spent: Price,
}
