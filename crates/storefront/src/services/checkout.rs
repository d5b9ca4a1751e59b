//! Mock checkout.
//!
//! Validates the two wizard forms, then "charges" the card by sleeping for
//! the configured payment delay and hands back a random order number. No
//! order is recorded anywhere and stock is never decremented.

use std::time::Duration;

use chrono::{DateTime, Days, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use shopwave_core::{Email, EmailError, OrderId, Price};

use crate::models::{Cart, ShippingAddress};

/// Country preselected on the shipping form.
pub const DEFAULT_COUNTRY: &str = "US";

/// Days from order to the estimated ship date.
pub const SHIP_AFTER_DAYS: u64 = 2;

/// Days from order to the estimated delivery date.
pub const DELIVER_AFTER_DAYS: u64 = 7;

/// Errors from validating or placing a checkout.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("card number must be 12 to 19 digits")]
    InvalidCardNumber,

    #[error("expiry date must be MM/YY")]
    InvalidExpiry,

    #[error("CVV must be 3 or 4 digits")]
    InvalidCvv,

    #[error("shipping details are missing")]
    MissingShipping,

    #[error("cart is empty")]
    EmptyCart,
}

// =============================================================================
// Step 1: shipping
// =============================================================================

/// Raw shipping form submission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShippingForm {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub country: String,
}

/// Validated shipping details, kept in the session between steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingInfo {
    pub email: Email,
    pub address: ShippingAddress,
}

impl ShippingInfo {
    /// Validate a shipping form.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::MissingField` for the first blank field, or
    /// `CheckoutError::InvalidEmail` when the email does not parse.
    pub fn from_form(form: &ShippingForm) -> Result<Self, CheckoutError> {
        let full_name = required("full name", &form.full_name)?;
        let email = Email::parse(required("email", &form.email)?)?;
        let street_address = required("address", &form.address)?;
        let city = required("city", &form.city)?;
        let state = required("state", &form.state)?;
        let postal_code = required("zip code", &form.zip_code)?;
        let country = match form.country.trim() {
            "" => DEFAULT_COUNTRY,
            country => country,
        };

        Ok(Self {
            email,
            address: ShippingAddress {
                full_name: full_name.to_string(),
                street_address: street_address.to_string(),
                city: city.to_string(),
                state: state.to_string(),
                postal_code: postal_code.to_string(),
                country: country.to_string(),
            },
        })
    }
}

// =============================================================================
// Step 2: payment
// =============================================================================

/// Raw payment form submission.
///
/// The card fields are never stored or logged; only the last four digits
/// survive validation.
#[derive(Deserialize, Default)]
pub struct PaymentForm {
    #[serde(default)]
    pub card_number: String,
    #[serde(default)]
    pub card_name: String,
    #[serde(default)]
    pub expiry_date: String,
    #[serde(default)]
    pub cvv: String,
    /// Checkbox; present when ticked.
    pub same_as_shipping: Option<String>,
}

impl std::fmt::Debug for PaymentForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentForm")
            .field("card_name", &self.card_name)
            .field("same_as_shipping", &self.same_as_shipping.is_some())
            .finish_non_exhaustive()
    }
}

/// What remains of a payment form after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentInfo {
    pub card_name: String,
    pub last_four: String,
    pub billing_same_as_shipping: bool,
}

impl PaymentInfo {
    /// Validate a payment form.
    ///
    /// The card number must be 12 to 19 digits once spaces are removed, the
    /// expiry must be `MM/YY` with a month from 01 to 12, and the CVV must be
    /// 3 or 4 digits.
    ///
    /// # Errors
    ///
    /// Returns the first failing rule as a `CheckoutError`.
    pub fn from_form(form: &PaymentForm) -> Result<Self, CheckoutError> {
        let digits: String = required("card number", &form.card_number)?
            .chars()
            .filter(|c| *c != ' ')
            .collect();
        let card_name = required("name on card", &form.card_name)?;
        let expiry = required("expiry date", &form.expiry_date)?;
        let cvv = required("CVV", &form.cvv)?;

        if !(12..=19).contains(&digits.len()) || !all_digits(&digits) {
            return Err(CheckoutError::InvalidCardNumber);
        }
        if !valid_expiry(expiry) {
            return Err(CheckoutError::InvalidExpiry);
        }
        if !(3..=4).contains(&cvv.len()) || !all_digits(cvv) {
            return Err(CheckoutError::InvalidCvv);
        }

        let last_four = digits.get(digits.len() - 4..).unwrap_or_default().to_string();

        Ok(Self {
            card_name: card_name.to_string(),
            last_four,
            billing_same_as_shipping: form.same_as_shipping.is_some(),
        })
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, CheckoutError> {
    match value.trim() {
        "" => Err(CheckoutError::MissingField(field)),
        trimmed => Ok(trimmed),
    }
}

fn all_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

fn valid_expiry(value: &str) -> bool {
    let Some((month, year)) = value.split_once('/') else {
        return false;
    };
    month.len() == 2
        && year.len() == 2
        && all_digits(month)
        && all_digits(year)
        && month.parse::<u8>().is_ok_and(|m| (1..=12).contains(&m))
}

// =============================================================================
// Placing the order
// =============================================================================

/// A successfully "paid" order, kept in the session for the confirmation page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedOrder {
    pub id: OrderId,
    pub total: Price,
    pub placed_at: DateTime<Utc>,
    pub shipping: ShippingInfo,
}

#[must_use]
pub fn estimated_ship_date(placed_at: DateTime<Utc>) -> DateTime<Utc> {
    placed_at + Days::new(SHIP_AFTER_DAYS)
}

#[must_use]
pub fn estimated_delivery_date(placed_at: DateTime<Utc>) -> DateTime<Utc> {
    placed_at + Days::new(DELIVER_AFTER_DAYS)
}

/// Mock payment processor.
#[derive(Debug, Clone, Copy)]
pub struct CheckoutService {
    payment_delay: Duration,
}

impl CheckoutService {
    #[must_use]
    pub const fn new(payment_delay: Duration) -> Self {
        Self { payment_delay }
    }

    /// Simulate charging the card for the cart total.
    ///
    /// Waits for the payment delay without blocking other requests.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` when there is nothing to pay for.
    #[instrument(skip(self, cart, shipping, payment), fields(items = cart.count()))]
    pub async fn place_order(
        &self,
        cart: &Cart,
        shipping: &ShippingInfo,
        payment: &PaymentInfo,
    ) -> Result<PlacedOrder, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        tokio::time::sleep(self.payment_delay).await;

        let order = PlacedOrder {
            id: generate_order_id(&mut rand::rng()),
            total: cart.summary().total,
            placed_at: Utc::now(),
            shipping: shipping.clone(),
        };

        tracing::info!(
            order_id = %order.id,
            total = %order.total,
            email = %shipping.email,
            card_last_four = %payment.last_four,
            "Mock payment accepted"
        );

        Ok(order)
    }
}

/// `ORD-` followed by a number drawn uniformly from 1000..=9999.
fn generate_order_id(rng: &mut impl Rng) -> OrderId {
    OrderId::new(format!("ORD-{}", rng.random_range(1000..=9999)))
}

/// Long-form date for the confirmation page, e.g. "January 5, 2026".
#[must_use]
pub fn format_confirmation_date(date: DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}
