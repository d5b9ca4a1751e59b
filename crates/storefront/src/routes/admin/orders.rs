//! Admin orders table.

use std::str::FromStr;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::Redirect,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::instrument;

use shopwave_core::{OrderId, OrderStatus};

use super::{AdminShell, notice_message};
use crate::catalog::{AdminOrderFilter, DateRange};
use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::routes::orders::OrderView;
use crate::state::AppState;

/// A `<select>` option.
#[derive(Debug, Clone)]
pub struct OptionView {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Orders table row with its expand state.
#[derive(Debug, Clone)]
pub struct OrderRowView {
    pub order: OrderView,
    pub expanded: bool,
    /// Link that toggles this row, keeping the current filters.
    pub toggle_href: String,
}

/// Query parameters for the orders table.
#[derive(Debug, Default, Deserialize)]
pub struct OrdersQuery {
    pub search: Option<String>,
    /// `all` or a status value.
    pub status: Option<String>,
    /// `all`, `today`, `week` or `month`.
    pub date: Option<String>,
    /// Order ID whose details are open.
    pub expanded: Option<String>,
    pub notice: Option<String>,
}

impl OrdersQuery {
    fn to_filter(&self) -> AdminOrderFilter {
        AdminOrderFilter {
            search: self.search.as_deref().unwrap_or_default().trim().to_string(),
            status: self
                .status
                .as_deref()
                .and_then(|s| OrderStatus::from_str(s).ok()),
            date: DateRange::from_param(self.date.as_deref().unwrap_or_default()),
        }
    }
}

/// Current filters as a query string prefix (without `expanded`).
fn filter_query(filter: &AdminOrderFilter) -> String {
    format!(
        "search={}&status={}&date={}",
        urlencoding::encode(&filter.search),
        filter.status.map_or("all", |s| s.as_str()),
        filter.date.as_str()
    )
}

/// Orders table template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/orders.html")]
pub struct OrdersTemplate {
    pub shell: AdminShell,
    pub rows: Vec<OrderRowView>,
    pub search: String,
    pub status_options: Vec<OptionView>,
    pub date_options: Vec<OptionView>,
    pub all_statuses: Vec<OptionView>,
    pub notice: Option<&'static str>,
}

/// Orders table handler.
#[instrument(skip(admin, state))]
pub async fn index(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<OrdersQuery>,
) -> OrdersTemplate {
    let filter = query.to_filter();
    let base_query = filter_query(&filter);
    let expanded = query.expanded.as_deref().unwrap_or_default();

    let rows = filter
        .apply(state.catalog().all_orders(), Utc::now())
        .into_iter()
        .map(|order| {
            let is_expanded = order.id.as_str() == expanded;
            let toggle_href = if is_expanded {
                format!("/admin/orders?{base_query}")
            } else {
                format!(
                    "/admin/orders?{base_query}&expanded={}",
                    urlencoding::encode(order.id.as_str())
                )
            };
            OrderRowView {
                order: OrderView::from(order),
                expanded: is_expanded,
                toggle_href,
            }
        })
        .collect();

    let mut status_options = vec![OptionView {
        value: "all",
        label: "All Statuses",
        selected: filter.status.is_none(),
    }];
    status_options.extend(OrderStatus::ALL.iter().map(|s| OptionView {
        value: s.as_str(),
        label: s.label(),
        selected: filter.status == Some(*s),
    }));

    OrdersTemplate {
        shell: AdminShell::new("Orders", &admin),
        rows,
        search: filter.search.clone(),
        status_options,
        date_options: DateRange::ALL
            .iter()
            .map(|d| OptionView {
                value: d.as_str(),
                label: d.label(),
                selected: filter.date == *d,
            })
            .collect(),
        all_statuses: OrderStatus::ALL
            .iter()
            .map(|s| OptionView {
                value: s.as_str(),
                label: s.label(),
                selected: false,
            })
            .collect(),
        notice: query.notice.as_deref().and_then(notice_message),
    }
}

/// Status change form data.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
}

/// Log a status change. Nothing is persisted.
#[instrument(skip(admin, state))]
pub async fn update_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<StatusForm>,
) -> Result<Redirect, AppError> {
    let order_id = OrderId::new(id.as_str());
    let order = state
        .catalog()
        .get_order_by_id(&order_id)
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;
    let status = OrderStatus::from_str(&form.status).map_err(AppError::BadRequest)?;

    tracing::info!(
        admin_id = %admin.id,
        order_id = %order.id,
        from = %order.status,
        to = %status,
        "Order status change requested (not persisted)"
    );

    Ok(Redirect::to(&format!(
        "/admin/orders?expanded={}&notice=status",
        urlencoding::encode(order.id.as_str())
    )))
}
