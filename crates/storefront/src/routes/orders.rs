//! Order history for the signed-in visitor.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tower_sessions::Session;
use tracing::instrument;

use shopwave_core::OrderStatus;

use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireUser;
use crate::models::{Order, OrderItem};
use crate::routes::NavView;
use crate::state::AppState;

/// CSS modifier for a status badge.
#[must_use]
pub const fn status_class(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "badge--pending",
        OrderStatus::Processing => "badge--processing",
        OrderStatus::Shipped => "badge--shipped",
        OrderStatus::Delivered => "badge--delivered",
        OrderStatus::Cancelled => "badge--cancelled",
    }
}

/// Order line display data.
#[derive(Debug, Clone)]
pub struct OrderItemView {
    pub product_id: String,
    pub name: String,
    pub image_url: String,
    pub price: String,
    pub quantity: u32,
    pub line_total: String,
}

impl From<&OrderItem> for OrderItemView {
    fn from(item: &OrderItem) -> Self {
        Self {
            product_id: item.product_id.to_string(),
            name: item.product_name.clone(),
            image_url: item.image_url.clone(),
            price: item.price.to_string(),
            quantity: item.quantity,
            line_total: item.line_total().to_string(),
        }
    }
}

/// Order display data, shared with the admin orders table.
#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: String,
    pub date: String,
    pub status: String,
    pub status_value: String,
    pub status_class: &'static str,
    pub total: String,
    pub item_count: u32,
    pub items: Vec<OrderItemView>,
    pub ship_to_name: String,
    pub ship_to: String,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            date: order.created_at.format("%b %-d, %Y").to_string(),
            status: order.status.label().to_string(),
            status_value: order.status.as_str().to_string(),
            status_class: status_class(order.status),
            total: order.total.to_string(),
            item_count: order.item_count(),
            items: order.items.iter().map(OrderItemView::from).collect(),
            ship_to_name: order.shipping_address.full_name.clone(),
            ship_to: order.shipping_address.one_line(),
        }
    }
}

/// Orders page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders.html")]
pub struct OrdersTemplate {
    pub nav: NavView,
    pub orders: Vec<OrderView>,
}

/// Order history handler.
#[instrument(skip(state, session, user), fields(user_id = %user.id))]
pub async fn index(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    session: Session,
) -> Result<OrdersTemplate, AppError> {
    let mut orders = state.catalog().get_orders_by_user_id(&user.id);
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let nav = NavView::load(&state, &session, Some(&user)).await?;

    Ok(OrdersTemplate {
        nav,
        orders: orders.into_iter().map(OrderView::from).collect(),
    })
}
