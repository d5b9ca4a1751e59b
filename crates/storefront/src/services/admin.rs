//! Admin panel form handling.
//!
//! The admin panel edits nothing: saves are validated, logged and dropped.
//! These drafts are the validated shape of what would have been written.

use std::str::FromStr;

use thiserror::Error;

use shopwave_core::{Email, EmailError, Price, PriceError, ProductId, Role, UserId};

use crate::models::{Product, UserAccount};

/// Validation failures for admin forms.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdminFormError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("invalid price: {0}")]
    InvalidPrice(#[from] PriceError),

    #[error("stock must be a whole number")]
    InvalidStock,

    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("unknown role: {0}")]
    InvalidRole(String),
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, AdminFormError> {
    match value.trim() {
        "" => Err(AdminFormError::MissingField(field)),
        trimmed => Ok(trimmed),
    }
}

fn optional_id(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|id| !id.is_empty())
}

// =============================================================================
// Products
// =============================================================================

/// Raw product form submission.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ProductForm {
    /// Empty when creating.
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub stock: String,
    #[serde(default)]
    pub image_url: String,
}

impl From<&Product> for ProductForm {
    fn from(product: &Product) -> Self {
        Self {
            id: Some(product.id.to_string()),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.amount().to_string(),
            category: product.category.clone(),
            stock: product.stock.to_string(),
            image_url: product.image_url.clone(),
        }
    }
}

/// A validated product edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub id: Option<ProductId>,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub category: String,
    pub stock: u32,
    pub image_url: String,
}

impl ProductDraft {
    /// Validate a product form.
    ///
    /// # Errors
    ///
    /// Returns `AdminFormError` for a blank name, price or category, an
    /// unparseable or negative price, or a stock that is not a whole number.
    pub fn from_form(form: &ProductForm) -> Result<Self, AdminFormError> {
        let name = required("name", &form.name)?;
        let price = Price::from_str(required("price", &form.price)?)?;
        let category = required("category", &form.category)?;
        let stock = required("stock", &form.stock)?
            .parse::<u32>()
            .map_err(|_| AdminFormError::InvalidStock)?;

        Ok(Self {
            id: optional_id(form.id.as_deref()).map(ProductId::new),
            name: name.to_string(),
            description: form.description.trim().to_string(),
            price,
            category: category.to_string(),
            stock,
            image_url: form.image_url.trim().to_string(),
        })
    }

    #[must_use]
    pub const fn is_new(&self) -> bool {
        self.id.is_none()
    }
}

// =============================================================================
// Accounts
// =============================================================================

/// Raw account form submission.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct AccountForm {
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
}

impl From<&UserAccount> for AccountForm {
    fn from(account: &UserAccount) -> Self {
        Self {
            id: Some(account.id.to_string()),
            name: account.name.clone(),
            email: account.email.to_string(),
            role: account.role.as_str().to_string(),
        }
    }
}

/// A validated account edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountDraft {
    pub id: Option<UserId>,
    pub name: String,
    pub email: Email,
    pub role: Role,
}

impl AccountDraft {
    /// Validate an account form. A blank role means customer.
    ///
    /// # Errors
    ///
    /// Returns `AdminFormError` for a blank name, malformed email or an
    /// unknown role.
    pub fn from_form(form: &AccountForm) -> Result<Self, AdminFormError> {
        let name = required("name", &form.name)?;
        let email = Email::parse(&form.email)?;
        let role = match form.role.trim() {
            "" => Role::default(),
            role => Role::from_str(role).map_err(|_| AdminFormError::InvalidRole(role.to_string()))?,
        };

        Ok(Self {
            id: optional_id(form.id.as_deref()).map(UserId::new),
            name: name.to_string(),
            email,
            role,
        })
    }

    #[must_use]
    pub const fn is_new(&self) -> bool {
        self.id.is_none()
    }
}
