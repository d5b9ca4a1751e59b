//! Admin products table and form.
//!
//! Deleting hides a product from this table for the rest of the admin's
//! session. Saving validates and logs; the catalog never changes.

use std::collections::HashSet;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use shopwave_core::ProductId;

use super::{AdminShell, notice_message};
use crate::catalog::AdminProductFilter;
use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::middleware::session::{hide, load_hidden};
use crate::models::{Product, session_keys};
use crate::services::{ProductDraft, ProductForm};
use crate::state::AppState;

/// Stock above this is shown as healthy.
const HEALTHY_STOCK: u32 = 10;

/// Stock indicator: healthy, low or out.
#[must_use]
pub const fn stock_class(stock: u32) -> &'static str {
    if stock > HEALTHY_STOCK {
        "stock--good"
    } else if stock > 0 {
        "stock--low"
    } else {
        "stock--out"
    }
}

/// "1 unit", "12 units".
#[must_use]
pub fn units(stock: u32) -> String {
    if stock == 1 {
        "1 unit".to_string()
    } else {
        format!("{stock} units")
    }
}

/// Products table row.
#[derive(Debug, Clone)]
pub struct ProductRowView {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: String,
    pub image_url: String,
    pub stock: String,
    pub stock_class: &'static str,
}

impl From<&Product> for ProductRowView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            category: product.category.clone(),
            price: product.price.to_string(),
            image_url: product.image_url.clone(),
            stock: units(product.stock),
            stock_class: stock_class(product.stock),
        }
    }
}

/// Query parameters for the products table.
#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    pub search: Option<String>,
    /// `all` or an exact category.
    pub category: Option<String>,
    pub notice: Option<String>,
}

impl ProductsQuery {
    fn to_filter(&self) -> AdminProductFilter {
        AdminProductFilter {
            search: self.search.as_deref().unwrap_or_default().trim().to_string(),
            category: self
                .category
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty() && *c != "all")
                .map(String::from),
        }
    }
}

/// Products table template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/products.html")]
pub struct ProductsTemplate {
    pub shell: AdminShell,
    pub products: Vec<ProductRowView>,
    pub search: String,
    pub category: String,
    pub categories: Vec<String>,
    pub notice: Option<&'static str>,
}

/// Product create/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/product_form.html")]
pub struct ProductFormTemplate {
    pub shell: AdminShell,
    pub is_new: bool,
    pub form: ProductForm,
    pub categories: Vec<String>,
    pub error: Option<String>,
}

impl ProductFormTemplate {
    fn id(&self) -> &str {
        self.form.id.as_deref().unwrap_or_default()
    }
}

fn categories(state: &AppState) -> Vec<String> {
    state
        .catalog()
        .categories()
        .into_iter()
        .map(String::from)
        .collect()
}

/// Products table handler.
#[instrument(skip(admin, state, session))]
pub async fn index(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ProductsQuery>,
) -> Result<ProductsTemplate, AppError> {
    let hidden: HashSet<ProductId> =
        load_hidden(&session, session_keys::ADMIN_HIDDEN_PRODUCTS).await?;
    let filter = query.to_filter();

    Ok(ProductsTemplate {
        shell: AdminShell::new("Products", &admin),
        products: filter
            .apply(state.catalog().products(), &hidden)
            .into_iter()
            .map(ProductRowView::from)
            .collect(),
        search: filter.search.clone(),
        category: filter.category.unwrap_or_else(|| "all".to_string()),
        categories: categories(&state),
        notice: query.notice.as_deref().and_then(notice_message),
    })
}

/// Blank product form.
#[instrument(skip(admin, state))]
pub async fn new(RequireAdmin(admin): RequireAdmin, State(state): State<AppState>) -> ProductFormTemplate {
    ProductFormTemplate {
        shell: AdminShell::new("Products", &admin),
        is_new: true,
        form: ProductForm::default(),
        categories: categories(&state),
        error: None,
    }
}

/// Edit form prefilled from the catalog.
#[instrument(skip(admin, state))]
pub async fn edit(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ProductFormTemplate, AppError> {
    let product = state
        .catalog()
        .get_product_by_id(&ProductId::new(id.as_str()))
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(ProductFormTemplate {
        shell: AdminShell::new("Products", &admin),
        is_new: false,
        form: ProductForm::from(product),
        categories: categories(&state),
        error: None,
    })
}

/// Validate and log a product save.
#[instrument(skip(admin, state, form))]
pub async fn save(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Form(form): Form<ProductForm>,
) -> Response {
    match ProductDraft::from_form(&form) {
        Ok(draft) => {
            tracing::info!(
                admin_id = %admin.id,
                product_id = ?draft.id.as_ref().map(ProductId::as_str),
                name = %draft.name,
                price = %draft.price,
                stock = draft.stock,
                "Product save requested (not persisted)"
            );
            let notice = if draft.is_new() { "created" } else { "saved" };
            Redirect::to(&format!("/admin/products?notice={notice}")).into_response()
        }
        Err(e) => {
            tracing::debug!(error = %e, "Product form rejected");
            let is_new = form.id.as_deref().is_none_or(|id| id.trim().is_empty());
            ProductFormTemplate {
                shell: AdminShell::new("Products", &admin),
                is_new,
                error: Some(e.to_string()),
                form,
                categories: categories(&state),
            }
            .into_response()
        }
    }
}

/// Hide a product from the table for this session.
#[instrument(skip(admin, state, session))]
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    let product_id = ProductId::new(id.as_str());
    if state.catalog().get_product_by_id(&product_id).is_none() {
        return Err(AppError::NotFound(format!("product {id}")));
    }

    hide(&session, session_keys::ADMIN_HIDDEN_PRODUCTS, product_id).await?;
    tracing::info!(admin_id = %admin.id, product_id = %id, "Product hidden for session");

    Ok(Redirect::to("/admin/products?notice=deleted"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_indicator() {
        assert_eq!(stock_class(11), "stock--good");
        assert_eq!(stock_class(10), "stock--low");
        assert_eq!(stock_class(1), "stock--low");
        assert_eq!(stock_class(0), "stock--out");
        assert_eq!(units(1), "1 unit");
        assert_eq!(units(0), "0 units");
        assert_eq!(units(15), "15 units");
    }

    #[test]
    fn test_query_all_means_no_category() {
        let query = ProductsQuery {
            category: Some("all".to_string()),
            ..ProductsQuery::default()
        };
        assert_eq!(query.to_filter().category, None);
    }
}
