//! Dashboard route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use chrono::{Days, NaiveDate, Utc};
use tracing::instrument;

use shopwave_core::{Price, Role};

use super::AdminShell;
use crate::catalog::Catalog;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::models::Order;
use crate::routes::orders::status_class;
use crate::state::AppState;

/// Mock daily sales for the last seven days, oldest first.
pub const WEEKLY_SALES: [u32; 7] = [1200, 1400, 1000, 1800, 1600, 2000, 2200];

/// How many orders the "Recent Orders" table lists.
const RECENT_ORDERS_LIMIT: usize = 5;

/// Fixed breakdown panels: (title, bar style, [(label, percent)]).
const BREAKDOWNS: [(&str, &str, [(&str, u32); 3]); 3] = [
    (
        "Payment Methods",
        "bar--blue",
        [("Credit Card", 65), ("PayPal", 25), ("Other", 10)],
    ),
    (
        "Top Categories",
        "bar--purple",
        [("Electronics", 42), ("Audio", 28), ("Wearables", 15)],
    ),
    (
        "Order Status",
        "bar--green",
        [("Delivered", 45), ("Shipped", 35), ("Processing", 20)],
    ),
];

/// Dashboard metrics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardMetrics {
    pub orders: usize,
    pub revenue: String,
    pub products: usize,
    pub low_stock: usize,
    pub customers: usize,
}

impl DashboardMetrics {
    #[must_use]
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let revenue: Price = catalog.all_orders().iter().map(|o| o.total).sum();
        Self {
            orders: catalog.all_orders().len(),
            revenue: revenue.to_string(),
            products: catalog.products().len(),
            low_stock: catalog.products().iter().filter(|p| p.is_low_stock()).count(),
            customers: catalog
                .users()
                .iter()
                .filter(|u| u.role == Role::Customer)
                .count(),
        }
    }
}

/// One bar of the sales chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesBarView {
    pub day: String,
    pub amount: String,
    /// Bar height as a percent of the best day.
    pub height: u32,
}

/// Weekday-labelled bars for the seven days ending `today`.
#[must_use]
pub fn sales_chart(today: NaiveDate) -> Vec<SalesBarView> {
    let max = WEEKLY_SALES.iter().copied().max().unwrap_or(1).max(1);
    let days_back = (0..WEEKLY_SALES.len() as u64).rev();

    days_back
        .zip(WEEKLY_SALES)
        .map(|(back, value)| SalesBarView {
            day: today
                .checked_sub_days(Days::new(back))
                .map_or_else(String::new, |d| d.format("%a").to_string()),
            amount: format!("${value}"),
            height: value * 100 / max,
        })
        .collect()
}

/// Recent order row.
#[derive(Debug, Clone)]
pub struct RecentOrderView {
    pub id: String,
    pub customer_name: String,
    pub date: String,
    pub total: String,
    pub status: String,
    pub status_class: &'static str,
}

impl From<&Order> for RecentOrderView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            customer_name: order.shipping_address.full_name.clone(),
            date: order.created_at.format("%b %-d, %Y").to_string(),
            total: order.total.to_string(),
            status: order.status.label().to_string(),
            status_class: status_class(order.status),
        }
    }
}

/// One row of a breakdown panel.
#[derive(Debug, Clone)]
pub struct BreakdownRow {
    pub label: &'static str,
    pub percent: u32,
}

/// A breakdown panel.
#[derive(Debug, Clone)]
pub struct BreakdownView {
    pub title: &'static str,
    pub bar_class: &'static str,
    pub rows: Vec<BreakdownRow>,
}

fn breakdowns() -> Vec<BreakdownView> {
    BREAKDOWNS
        .iter()
        .map(|&(title, bar_class, rows)| BreakdownView {
            title,
            bar_class,
            rows: rows
                .iter()
                .map(|&(label, percent)| BreakdownRow { label, percent })
                .collect(),
        })
        .collect()
}

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct DashboardTemplate {
    pub shell: AdminShell,
    pub metrics: DashboardMetrics,
    pub sales: Vec<SalesBarView>,
    pub recent_orders: Vec<RecentOrderView>,
    pub breakdowns: Vec<BreakdownView>,
}

/// Dashboard page handler.
#[instrument(skip(admin, state))]
pub async fn dashboard(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> DashboardTemplate {
    let catalog = state.catalog();

    DashboardTemplate {
        shell: AdminShell::new("Dashboard", &admin),
        metrics: DashboardMetrics::from_catalog(catalog),
        sales: sales_chart(Utc::now().date_naive()),
        recent_orders: catalog
            .recent_orders(RECENT_ORDERS_LIMIT)
            .into_iter()
            .map(RecentOrderView::from)
            .collect(),
        breakdowns: breakdowns(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_from_sample() {
        let catalog = Catalog::sample().unwrap();
        let metrics = DashboardMetrics::from_catalog(&catalog);
        assert_eq!(metrics.orders, 3);
        assert_eq!(metrics.products, 8);
        assert_eq!(metrics.customers, 4);
        assert_eq!(metrics.low_stock, 0);
        // 479.97 + 349.99 + 289.98
        assert_eq!(metrics.revenue, "$1119.94");
    }

    #[test]
    fn test_sales_chart_ends_today() {
        // 2026-01-05 is a Monday
        let today = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let chart = sales_chart(today);
        assert_eq!(chart.len(), 7);
        assert_eq!(chart[0].day, "Tue");
        assert_eq!(chart[6].day, "Mon");
        assert_eq!(chart[6].height, 100);
        assert_eq!(chart[2].height, 45);
    }
}
