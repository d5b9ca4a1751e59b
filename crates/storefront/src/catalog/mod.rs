//! Static sample catalog.
//!
//! Products, orders and admin-panel accounts are embedded JSON, parsed once at
//! startup and shared read-only for the life of the process. Nothing here
//! mutates; lookups are plain scans over a handful of records.

pub mod filter;

use thiserror::Error;

use shopwave_core::{OrderId, ProductId, UserId};

use crate::models::{Order, Product, UserAccount};

pub use filter::{AdminOrderFilter, AdminProductFilter, AdminUserFilter, DateRange, ListingFilter};

const PRODUCTS_JSON: &str = include_str!("../../data/products.json");
const ORDERS_JSON: &str = include_str!("../../data/orders.json");
const USERS_JSON: &str = include_str!("../../data/users.json");

/// Errors loading the embedded catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid {section} data: {source}")]
    Parse {
        section: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// The in-memory catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    orders: Vec<Order>,
    users: Vec<UserAccount>,
}

impl Catalog {
    /// Load the embedded sample data.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` if any embedded JSON document is malformed.
    pub fn sample() -> Result<Self, CatalogError> {
        Ok(Self {
            products: parse("products", PRODUCTS_JSON)?,
            orders: parse("orders", ORDERS_JSON)?,
            users: parse("users", USERS_JSON)?,
        })
    }

    /// Build a catalog from explicit records.
    #[must_use]
    pub const fn new(products: Vec<Product>, orders: Vec<Order>, users: Vec<UserAccount>) -> Self {
        Self {
            products,
            orders,
            users,
        }
    }

    // =========================================================================
    // Products
    // =========================================================================

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn get_product_by_id(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Products whose category matches exactly (case-sensitive).
    #[must_use]
    pub fn get_products_by_category(&self, category: &str) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.category == category)
            .collect()
    }

    /// Case-insensitive substring search across name, description and category.
    #[must_use]
    pub fn search_products(&self, query: &str) -> Vec<&Product> {
        let needle = query.to_lowercase();
        self.products
            .iter()
            .filter(|p| p.matches_lowercase(&needle))
            .collect()
    }

    /// Distinct categories in order of first appearance.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for product in &self.products {
            if !seen.contains(&product.category.as_str()) {
                seen.push(&product.category);
            }
        }
        seen
    }

    /// Other products in the same category, at most `limit`.
    #[must_use]
    pub fn similar_products(&self, product: &Product, limit: usize) -> Vec<&Product> {
        self.get_products_by_category(&product.category)
            .into_iter()
            .filter(|p| p.id != product.id)
            .take(limit)
            .collect()
    }

    // =========================================================================
    // Orders
    // =========================================================================

    #[must_use]
    pub fn all_orders(&self) -> &[Order] {
        &self.orders
    }

    #[must_use]
    pub fn get_order_by_id(&self, id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| &o.id == id)
    }

    #[must_use]
    pub fn get_orders_by_user_id(&self, user_id: &UserId) -> Vec<&Order> {
        self.orders.iter().filter(|o| &o.user_id == user_id).collect()
    }

    /// Orders sorted newest first, at most `limit`.
    #[must_use]
    pub fn recent_orders(&self, limit: usize) -> Vec<&Order> {
        let mut orders: Vec<&Order> = self.orders.iter().collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders.truncate(limit);
        orders
    }

    // =========================================================================
    // Accounts
    // =========================================================================

    #[must_use]
    pub fn users(&self) -> &[UserAccount] {
        &self.users
    }
}

fn parse<T: serde::de::DeserializeOwned>(
    section: &'static str,
    json: &str,
) -> Result<Vec<T>, CatalogError> {
    serde_json::from_str(json).map_err(|source| CatalogError::Parse { section, source })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopwave_core::{OrderStatus, Price, Role};

    use super::*;

    fn catalog() -> Catalog {
        Catalog::sample().unwrap()
    }

    #[test]
    fn test_sample_sizes() {
        let catalog = catalog();
        assert_eq!(catalog.products().len(), 8);
        assert_eq!(catalog.all_orders().len(), 3);
        assert_eq!(catalog.users().len(), 5);
    }

    #[test]
    fn test_get_product_by_id() {
        let catalog = catalog();
        let camera = catalog.get_product_by_id(&ProductId::new("4")).unwrap();
        assert_eq!(camera.name, "Professional DSLR Camera");
        assert_eq!(camera.price, Price::from_cents(129_999));
        assert!(catalog.get_product_by_id(&ProductId::new("99")).is_none());
    }

    #[test]
    fn test_category_filter_is_exact() {
        let catalog = catalog();
        let electronics = catalog.get_products_by_category("Electronics");
        assert_eq!(electronics.len(), 2);
        assert!(electronics.iter().all(|p| p.category == "Electronics"));
        assert!(catalog.get_products_by_category("electronics").is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let catalog = catalog();
        // name
        let by_name: Vec<_> = catalog.search_products("KEYBOARD").iter().map(|p| p.id.to_string()).collect();
        assert_eq!(by_name, vec!["7"]);
        // description
        assert_eq!(catalog.search_products("lumbar").len(), 1);
        // category
        assert_eq!(catalog.search_products("photo").len(), 1);
        assert_eq!(catalog.search_products("").len(), 8);
        assert!(catalog.search_products("toaster").is_empty());
    }

    #[test]
    fn test_categories_in_first_appearance_order() {
        assert_eq!(
            catalog().categories(),
            vec![
                "Electronics",
                "Wearables",
                "Photography",
                "Furniture",
                "Audio",
                "Gaming",
                "Accessories"
            ]
        );
    }

    #[test]
    fn test_similar_products_exclude_self() {
        let catalog = catalog();
        let headphones = catalog.get_product_by_id(&ProductId::new("1")).unwrap();
        let similar = catalog.similar_products(headphones, 4);
        assert_eq!(similar.len(), 1);
        assert_eq!(similar[0].id, ProductId::new("3"));
    }

    #[test]
    fn test_orders_by_user() {
        let catalog = catalog();
        assert_eq!(catalog.get_orders_by_user_id(&UserId::new("2")).len(), 3);
        assert!(catalog.get_orders_by_user_id(&UserId::new("1")).is_empty());

        let order = catalog.get_order_by_id(&OrderId::new("ORD-1002")).unwrap();
        assert_eq!(order.status, OrderStatus::Shipped);
        assert_eq!(order.total, Price::from_cents(34999));
    }

    #[test]
    fn test_order_totals_match_lines() {
        for order in catalog().all_orders() {
            let lines: Price = order.items.iter().map(crate::models::OrderItem::line_total).sum();
            assert_eq!(lines, order.total, "order {}", order.id);
        }
    }

    #[test]
    fn test_recent_orders_newest_first() {
        let catalog = catalog();
        let ids: Vec<_> = catalog.recent_orders(5).iter().map(|o| o.id.to_string()).collect();
        assert_eq!(ids, vec!["ORD-1003", "ORD-1002", "ORD-1001"]);
    }

    #[test]
    fn test_sample_accounts() {
        let catalog = catalog();
        let admins: Vec<_> = catalog.users().iter().filter(|u| u.role == Role::Admin).collect();
        assert_eq!(admins.len(), 1);
        assert_eq!(admins[0].email.as_str(), "admin@example.com");
    }
}
