//! Session cart.
//!
//! A cart is an ordered list of product snapshots with quantities. Each
//! product appears at most once; every quantity stays within `1..=stock`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use shopwave_core::{Price, ProductId};

use super::Product;

/// Sales tax applied at the cart and checkout summaries.
pub const TAX_RATE_PERCENT: u32 = 7;

/// The only coupon code the mock recognizes (case-insensitive).
const COUPON_CODE: &str = "discount10";

/// Cart operation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    #[error("{0} is out of stock")]
    OutOfStock(String),
    #[error("quantity must be at least 1")]
    ZeroQuantity,
}

/// A product in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// The visitor's cart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

/// Price breakdown shown beside the cart and during checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartSummary {
    pub subtotal: Price,
    /// Shipping is always free.
    pub shipping: Price,
    pub tax: Price,
    pub total: Price,
}

/// Result of checking a coupon code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CouponOutcome {
    Applied,
    Invalid,
}

impl CouponOutcome {
    /// Check a code. A recognized code is reported but grants no discount.
    #[must_use]
    pub fn check(code: &str) -> Self {
        if code.trim().eq_ignore_ascii_case(COUPON_CODE) {
            Self::Applied
        } else {
            Self::Invalid
        }
    }

    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Applied => "Coupon applied successfully!",
            Self::Invalid => "Invalid coupon code",
        }
    }

    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

impl Cart {
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Add `quantity` units of `product`.
    ///
    /// A product already in the cart has its quantity incremented rather than
    /// getting a second line. The resulting quantity is capped at the stock.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ZeroQuantity` for a zero quantity and
    /// `CartError::OutOfStock` when the product has no stock.
    pub fn add(&mut self, product: &Product, quantity: u32) -> Result<u32, CartError> {
        if quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }
        if product.stock == 0 {
            return Err(CartError::OutOfStock(product.name.clone()));
        }

        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product.id) {
            item.quantity = item.quantity.saturating_add(quantity).min(product.stock);
            return Ok(item.quantity);
        }

        let quantity = quantity.min(product.stock);
        self.items.push(CartItem {
            product: product.clone(),
            quantity,
        });
        Ok(quantity)
    }

    /// Remove a product's line. Returns whether anything was removed.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.product.id != product_id);
        self.items.len() != before
    }

    /// Set a line's quantity. Zero removes the line; other values are clamped
    /// to `1..=stock`. Unknown products are ignored.
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: u32) {
        if quantity == 0 {
            self.remove(product_id);
            return;
        }
        if let Some(item) = self.items.iter_mut().find(|i| &i.product.id == product_id) {
            item.quantity = quantity.clamp(1, item.product.stock.max(1));
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of price times quantity over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Number of units across all lines.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn summary(&self) -> CartSummary {
        let subtotal = self.total();
        let tax = subtotal.percent(TAX_RATE_PERCENT);
        CartSummary {
            subtotal,
            shipping: Price::ZERO,
            tax,
            total: subtotal + tax,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: &str, cents: i64, stock: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            description: String::new(),
            price: Price::from_cents(cents),
            category: "Audio".to_string(),
            image_url: String::new(),
            stock,
            rating: None,
            reviews: Vec::new(),
        }
    }

    #[test]
    fn test_total_is_sum_of_price_times_quantity() {
        let mut cart = Cart::default();
        cart.add(&product("1", 29999, 15), 1).unwrap();
        cart.add(&product("6", 8999, 30), 2).unwrap();

        assert_eq!(cart.total(), Price::from_cents(47997));
        assert_eq!(cart.count(), 3);
    }

    #[test]
    fn test_adding_existing_product_increments() {
        let mut cart = Cart::default();
        let speaker = product("6", 8999, 30);
        cart.add(&speaker, 1).unwrap();
        cart.add(&speaker, 2).unwrap();

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 3);
    }

    #[test]
    fn test_add_caps_at_stock() {
        let mut cart = Cart::default();
        let camera = product("4", 129_999, 5);
        assert_eq!(cart.add(&camera, 4).unwrap(), 4);
        assert_eq!(cart.add(&camera, 4).unwrap(), 5);
    }

    #[test]
    fn test_add_rejects_zero_and_out_of_stock() {
        let mut cart = Cart::default();
        assert_eq!(cart.add(&product("1", 100, 3), 0), Err(CartError::ZeroQuantity));
        assert!(matches!(
            cart.add(&product("2", 100, 0), 1),
            Err(CartError::OutOfStock(_))
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_removing_last_item_empties_cart() {
        let mut cart = Cart::default();
        cart.add(&product("3", 34999, 8), 1).unwrap();
        assert!(cart.remove(&ProductId::new("3")));
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Price::ZERO);
        assert!(!cart.remove(&ProductId::new("3")));
    }

    #[test]
    fn test_update_quantity_zero_removes_and_clamps() {
        let mut cart = Cart::default();
        cart.add(&product("3", 34999, 8), 1).unwrap();

        cart.update_quantity(&ProductId::new("3"), 50);
        assert_eq!(cart.count(), 8);

        cart.update_quantity(&ProductId::new("3"), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_summary_adds_seven_percent_tax() {
        let mut cart = Cart::default();
        cart.add(&product("8", 3999, 25), 1).unwrap();
        let summary = cart.summary();

        assert_eq!(summary.subtotal, Price::from_cents(3999));
        // 39.99 * 0.07 = 2.7993
        assert_eq!(summary.tax, Price::from_cents(280));
        assert_eq!(summary.total, Price::from_cents(4279));
        assert!(summary.shipping.is_zero());
    }

    #[test]
    fn test_coupon_check() {
        assert!(CouponOutcome::check("DISCOUNT10").is_applied());
        assert!(CouponOutcome::check(" discount10 ").is_applied());
        assert_eq!(CouponOutcome::check("free"), CouponOutcome::Invalid);
        assert_eq!(CouponOutcome::Invalid.message(), "Invalid coupon code");
    }
}
