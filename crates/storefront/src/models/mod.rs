//! Domain models for the storefront.
//!
//! Catalog records (`Product`, `Order`, `UserAccount`) are immutable sample
//! data. `Cart` and `User` live in the visitor's session.

pub mod cart;
pub mod order;
pub mod product;
pub mod session;
pub mod user;

pub use cart::{Cart, CartError, CartItem, CartSummary, CouponOutcome, TAX_RATE_PERCENT};
pub use order::{Order, OrderItem, ShippingAddress};
pub use product::{Product, Review, StockLevel};
pub use session::keys as session_keys;
pub use user::{User, UserAccount};
