//! Product domain types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use shopwave_core::{Price, ProductId, ReviewId, UserId};

/// Stock below this count is reported as "low".
pub const LOW_STOCK_THRESHOLD: u32 = 5;

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub category: String,
    pub image_url: String,
    /// Units on hand. Never decremented by a purchase.
    pub stock: u32,
    pub rating: Option<f32>,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

/// A customer review attached to a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub user_id: UserId,
    pub user_name: String,
    /// 1 to 5 stars.
    pub rating: u8,
    pub comment: String,
    pub date: NaiveDate,
}

/// Coarse stock level shown on the product page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockLevel {
    InStock,
    /// Fewer than [`LOW_STOCK_THRESHOLD`] left.
    Low(u32),
    OutOfStock,
}

impl Product {
    /// Case-insensitive substring match across name, description and category.
    ///
    /// `needle` must already be lowercased.
    #[must_use]
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.category.to_lowercase().contains(needle)
    }

    #[must_use]
    pub const fn stock_level(&self) -> StockLevel {
        match self.stock {
            0 => StockLevel::OutOfStock,
            n if n < LOW_STOCK_THRESHOLD => StockLevel::Low(n),
            _ => StockLevel::InStock,
        }
    }

    #[must_use]
    pub const fn is_low_stock(&self) -> bool {
        self.stock < LOW_STOCK_THRESHOLD
    }

    /// Clamp a requested quantity into `1..=stock`.
    ///
    /// Returns `None` when the product is out of stock.
    #[must_use]
    pub fn clamp_quantity(&self, requested: u32) -> Option<u32> {
        (self.stock > 0).then(|| requested.clamp(1, self.stock))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(stock: u32) -> Product {
        Product {
            id: ProductId::new("p"),
            name: "Smart Fitness Watch".to_string(),
            description: "Heart rate monitoring".to_string(),
            price: Price::from_cents(19999),
            category: "Wearables".to_string(),
            image_url: String::new(),
            stock,
            rating: None,
            reviews: Vec::new(),
        }
    }

    #[test]
    fn test_matches_any_text_field() {
        let p = product(3);
        assert!(p.matches_lowercase("fitness"));
        assert!(p.matches_lowercase("heart"));
        assert!(p.matches_lowercase("wear"));
        assert!(!p.matches_lowercase("camera"));
    }

    #[test]
    fn test_stock_level() {
        assert_eq!(product(0).stock_level(), StockLevel::OutOfStock);
        assert_eq!(product(4).stock_level(), StockLevel::Low(4));
        assert_eq!(product(5).stock_level(), StockLevel::InStock);
    }

    #[test]
    fn test_clamp_quantity() {
        assert_eq!(product(8).clamp_quantity(0), Some(1));
        assert_eq!(product(8).clamp_quantity(20), Some(8));
        assert_eq!(product(0).clamp_quantity(1), None);
    }
}
