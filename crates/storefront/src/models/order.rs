//! Order domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopwave_core::{OrderId, OrderStatus, Price, ProductId, UserId};

/// A historical order from the sample catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<OrderItem>,
    pub total: Price,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub shipping_address: ShippingAddress,
}

/// One line of an order, denormalized at purchase time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub price: Price,
    pub quantity: u32,
    pub image_url: String,
}

/// Where an order ships to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub full_name: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

impl Order {
    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

impl OrderItem {
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

impl ShippingAddress {
    /// Single-line rendering: "123 Main St, Boston, MA 02108, USA".
    #[must_use]
    pub fn one_line(&self) -> String {
        format!(
            "{}, {}, {} {}, {}",
            self.street_address, self.city, self.state, self.postal_code, self.country
        )
    }
}
