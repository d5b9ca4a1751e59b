//! Session keys.
//!
//! Everything a visitor owns lives in their server-side session under one of
//! these keys.

/// Session keys for storefront state.
pub mod keys {
    /// JSON user record of the signed-in visitor.
    pub const USER: &str = "user";

    /// The visitor's cart.
    pub const CART: &str = "cart";

    /// Checkout wizard progress (shipping details).
    pub const CHECKOUT: &str = "checkout";

    /// The order just placed, shown on the confirmation page.
    pub const LAST_ORDER: &str = "last_order";

    /// Product IDs the admin "deleted" during this session.
    pub const ADMIN_HIDDEN_PRODUCTS: &str = "admin_hidden_products";

    /// User IDs the admin "deleted" during this session.
    pub const ADMIN_HIDDEN_USERS: &str = "admin_hidden_users";
}
