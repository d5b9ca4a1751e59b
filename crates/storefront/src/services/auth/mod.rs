//! Mock authentication service.
//!
//! There is no user store. Two hardcoded accounts can sign in, and anyone can
//! "register", which simply signs them in as a fresh customer.

mod error;

pub use error::AuthError;

use rand::Rng;
use secrecy::{ExposeSecret, SecretString};

use shopwave_core::{Email, Role, UserId};

use crate::models::User;

/// Length of generated customer IDs.
const GENERATED_ID_LENGTH: usize = 7;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// A hardcoded account the mock login recognizes.
struct MockAccount {
    id: &'static str,
    name: &'static str,
    email: &'static str,
    password: &'static str,
    role: Role,
}

const ACCOUNTS: [MockAccount; 2] = [
    MockAccount {
        id: "1",
        name: "Admin User",
        email: "admin@example.com",
        password: "password",
        role: Role::Admin,
    },
    MockAccount {
        id: "2",
        name: "Regular User",
        email: "user@example.com",
        password: "password",
        role: Role::Customer,
    },
];

/// Registration form input.
#[derive(Debug)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: SecretString,
    pub password_confirm: SecretString,
}

/// Authentication service.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthService;

impl AuthService {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Check an email/password pair against the hardcoded accounts.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for any other pair.
    pub fn login(&self, email: &str, password: &SecretString) -> Result<User, AuthError> {
        let email = email.trim();
        let account = ACCOUNTS
            .iter()
            .find(|a| a.email == email && a.password == password.expose_secret())
            .ok_or(AuthError::InvalidCredentials)?;

        Ok(User {
            id: UserId::new(account.id),
            name: account.name.to_string(),
            email: Email::parse(account.email)?,
            role: account.role,
        })
    }

    /// Sign up a new customer.
    ///
    /// Nothing is stored; the returned user only lives in the session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingField` for blank fields,
    /// `AuthError::InvalidEmail` for a malformed address, and
    /// `AuthError::PasswordMismatch` when the confirmation differs.
    pub fn register(&self, registration: &Registration) -> Result<User, AuthError> {
        let name = registration.name.trim();
        if name.is_empty() {
            return Err(AuthError::MissingField("name"));
        }
        let email = Email::parse(&registration.email)?;
        if registration.password.expose_secret().is_empty() {
            return Err(AuthError::MissingField("password"));
        }
        if registration.password.expose_secret() != registration.password_confirm.expose_secret() {
            return Err(AuthError::PasswordMismatch);
        }

        Ok(User {
            id: generate_user_id(&mut rand::rng()),
            name: name.to_string(),
            email,
            role: Role::Customer,
        })
    }
}

/// Random lowercase base-36 ID, e.g. `"k3x9a0b"`.
fn generate_user_id(rng: &mut impl Rng) -> UserId {
    let id: String = (0..GENERATED_ID_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..BASE36.len());
            char::from(BASE36.get(idx).copied().unwrap_or(b'0'))
        })
        .collect();
    UserId::new(id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn secret(s: &str) -> SecretString {
        SecretString::from(s)
    }

    #[test]
    fn test_admin_login() {
        let user = AuthService::new()
            .login("admin@example.com", &secret("password"))
            .unwrap();
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.id, UserId::new("1"));
        assert!(user.is_admin());
    }

    #[test]
    fn test_customer_login() {
        let user = AuthService::new()
            .login("user@example.com", &secret("password"))
            .unwrap();
        assert_eq!(user.role, Role::Customer);
        assert_eq!(user.name, "Regular User");
        assert!(!user.is_admin());
    }

    #[test]
    fn test_other_pairs_fail() {
        let auth = AuthService::new();
        for (email, password) in [
            ("admin@example.com", "Password"),
            ("user@example.com", ""),
            ("john@example.com", "password"),
            ("ADMIN@example.com", "password"),
        ] {
            assert_eq!(
                auth.login(email, &secret(password)),
                Err(AuthError::InvalidCredentials),
                "{email}/{password}"
            );
        }
    }

    #[test]
    fn test_register_creates_customer() {
        let user = AuthService::new()
            .register(&Registration {
                name: " Jane Smith ".to_string(),
                email: "jane@example.com".to_string(),
                password: secret("hunter22"),
                password_confirm: secret("hunter22"),
            })
            .unwrap();
        assert_eq!(user.name, "Jane Smith");
        assert_eq!(user.role, Role::Customer);
        assert_eq!(user.id.as_str().len(), GENERATED_ID_LENGTH);
        assert!(user
            .id
            .as_str()
            .bytes()
            .all(|b| b.is_ascii_digit() || b.is_ascii_lowercase()));
    }

    #[test]
    fn test_register_validation() {
        let auth = AuthService::new();
        let base = || Registration {
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            password: secret("a"),
            password_confirm: secret("a"),
        };

        let mut blank_name = base();
        blank_name.name = "  ".to_string();
        assert_eq!(auth.register(&blank_name), Err(AuthError::MissingField("name")));

        let mut bad_email = base();
        bad_email.email = "jane".to_string();
        assert!(matches!(auth.register(&bad_email), Err(AuthError::InvalidEmail(_))));

        let mut mismatch = base();
        mismatch.password_confirm = secret("b");
        assert_eq!(auth.register(&mismatch), Err(AuthError::PasswordMismatch));
    }
}
