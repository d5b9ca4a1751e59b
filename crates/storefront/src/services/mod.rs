//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `admin` - Admin panel form validation (saves are logged, never stored)
//! - `auth` - Mock login and registration against hardcoded accounts
//! - `checkout` - Checkout form validation and the simulated payment step

pub mod admin;
pub mod auth;
pub mod checkout;

pub use admin::{AccountDraft, AccountForm, AdminFormError, ProductDraft, ProductForm};
pub use auth::{AuthError, AuthService, Registration};
pub use checkout::{
    CheckoutError, CheckoutService, PaymentForm, PaymentInfo, PlacedOrder, ShippingForm,
    ShippingInfo,
};
