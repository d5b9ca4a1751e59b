//! Product detail route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use shopwave_core::ProductId;

use crate::error::AppError;
use crate::filters;
use crate::middleware::OptionalUser;
use crate::models::{Product, Review, StockLevel};
use crate::routes::NavView;
use crate::routes::home::ProductCardView;
use crate::state::AppState;

/// How many similar products the detail page shows.
const SIMILAR_PRODUCTS_LIMIT: usize = 4;

/// Query parameters for the product page.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    /// Set after a successful add-to-cart.
    pub added: Option<String>,
    pub error: Option<String>,
}

/// Five-character star bar, e.g. "★★★★☆".
fn stars(rating: f32) -> String {
    let filled = (0u8..5).filter(|i| f32::from(*i) + 0.5 <= rating).count();
    "★".repeat(filled) + &"☆".repeat(5 - filled)
}

/// Review display data.
#[derive(Debug, Clone)]
pub struct ReviewView {
    pub user_name: String,
    pub stars: String,
    pub comment: String,
    pub date: String,
}

impl From<&Review> for ReviewView {
    fn from(review: &Review) -> Self {
        Self {
            user_name: review.user_name.clone(),
            stars: stars(f32::from(review.rating)),
            comment: review.comment.clone(),
            date: review.date.format("%b %-d, %Y").to_string(),
        }
    }
}

/// Product detail display data.
#[derive(Debug, Clone)]
pub struct ProductDetailView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: String,
    pub image_url: String,
    pub rating: Option<String>,
    pub stars: String,
    pub review_count: usize,
    pub stock_badge: &'static str,
    pub in_stock: bool,
    /// "Only N left!", shown next to the badge when stock is low.
    pub low_stock_note: Option<String>,
    pub max_quantity: u32,
}

impl From<&Product> for ProductDetailView {
    fn from(product: &Product) -> Self {
        let level = product.stock_level();
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            category: product.category.clone(),
            price: product.price.to_string(),
            image_url: product.image_url.clone(),
            rating: product.rating.map(|r| format!("{r:.1}")),
            stars: stars(product.rating.unwrap_or_default()),
            review_count: product.reviews.len(),
            stock_badge: if level == StockLevel::OutOfStock {
                "Out of stock"
            } else {
                "In stock"
            },
            in_stock: level != StockLevel::OutOfStock,
            low_stock_note: match level {
                StockLevel::Low(n) => Some(format!("Only {n} left!")),
                StockLevel::InStock | StockLevel::OutOfStock => None,
            },
            max_quantity: product.stock.max(1),
        }
    }
}

/// Product page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub nav: NavView,
    pub product: ProductDetailView,
    pub reviews: Vec<ReviewView>,
    pub similar: Vec<ProductCardView>,
    pub added: bool,
    pub error: Option<String>,
    /// Where similar-product add-to-cart buttons come back to.
    pub return_to: String,
}

/// Product-not-found page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/not_found.html")]
pub struct ProductNotFoundTemplate {
    pub nav: NavView,
}

/// Product detail handler.
#[instrument(skip(state, session, user, query))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    OptionalUser(user): OptionalUser,
    Path(id): Path<String>,
    Query(query): Query<ProductQuery>,
) -> Result<Response, AppError> {
    let nav = NavView::load(&state, &session, user.as_ref()).await?;

    let Some(product) = state.catalog().get_product_by_id(&ProductId::new(id.as_str())) else {
        tracing::debug!(product_id = %id, "Product not found");
        return Ok((StatusCode::NOT_FOUND, ProductNotFoundTemplate { nav }).into_response());
    };

    let similar = state
        .catalog()
        .similar_products(product, SIMILAR_PRODUCTS_LIMIT)
        .into_iter()
        .map(ProductCardView::from)
        .collect();

    Ok(ProductShowTemplate {
        nav,
        product: ProductDetailView::from(product),
        reviews: product.reviews.iter().map(ReviewView::from).collect(),
        similar,
        added: query.added.is_some(),
        error: query.error,
        return_to: format!("/products/{}", product.id),
    }
    .into_response())
}
