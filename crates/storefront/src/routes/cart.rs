//! Cart route handlers.
//!
//! The cart lives in the visitor's session. Every mutation is a form POST
//! answered with a redirect.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::Redirect,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use shopwave_core::ProductId;

use crate::error::{AppError, add_breadcrumb};
use crate::filters;
use crate::middleware::OptionalUser;
use crate::middleware::session::{load_cart, save_cart};
use crate::models::{Cart, CartItem, CartSummary, CouponOutcome};
use crate::routes::NavView;
use crate::state::AppState;

/// Cart line display data.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub product_id: String,
    pub name: String,
    pub category: String,
    pub image_url: String,
    pub price: String,
    pub quantity: u32,
    pub max_quantity: u32,
    pub line_total: String,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.product.id.to_string(),
            name: item.product.name.clone(),
            category: item.product.category.clone(),
            image_url: item.product.image_url.clone(),
            price: item.product.price.to_string(),
            quantity: item.quantity,
            max_quantity: item.product.stock.max(1),
            line_total: item.line_total().to_string(),
        }
    }
}

/// Order summary display data, shared with checkout.
#[derive(Debug, Clone)]
pub struct SummaryView {
    pub subtotal: String,
    pub shipping: String,
    pub tax: String,
    pub total: String,
}

impl From<CartSummary> for SummaryView {
    fn from(summary: CartSummary) -> Self {
        Self {
            subtotal: summary.subtotal.to_string(),
            shipping: if summary.shipping.is_zero() {
                "Free".to_string()
            } else {
                summary.shipping.to_string()
            },
            tax: summary.tax.to_string(),
            total: summary.total.to_string(),
        }
    }
}

/// Coupon feedback shown under the coupon form.
#[derive(Debug, Clone)]
pub struct CouponView {
    pub message: &'static str,
    pub applied: bool,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub nav: NavView,
    pub items: Vec<CartItemView>,
    pub summary: SummaryView,
    pub coupon: Option<CouponView>,
}

/// Cart count badge fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Query parameters for the cart page.
#[derive(Debug, Default, Deserialize)]
pub struct CartQuery {
    /// `applied` or `invalid`, set by the coupon redirect.
    pub coupon: Option<String>,
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    #[serde(default)]
    pub quantity: String,
    /// Local path to return to instead of the product page.
    pub return_to: Option<String>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    #[serde(default)]
    pub quantity: String,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

/// Coupon form data.
#[derive(Debug, Deserialize)]
pub struct CouponForm {
    #[serde(default)]
    pub code: String,
}

/// Parse a quantity box, falling back to 1 when it is blank or not a number.
fn parse_quantity(raw: &str) -> u32 {
    raw.trim().parse().unwrap_or(1)
}

/// Accept only same-site absolute paths as redirect targets.
fn local_path(target: Option<&str>) -> Option<&str> {
    target.filter(|t| t.starts_with('/') && !t.starts_with("//") && !t.contains('\\'))
}

/// Display cart page.
#[instrument(skip(state, session, user))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    OptionalUser(user): OptionalUser,
    Query(query): Query<CartQuery>,
) -> Result<CartShowTemplate, AppError> {
    let cart = load_cart(&session).await?;
    let nav = NavView::load(&state, &session, user.as_ref()).await?;

    let coupon = query.coupon.as_deref().map(|c| {
        let outcome = if c == "applied" {
            CouponOutcome::Applied
        } else {
            CouponOutcome::Invalid
        };
        CouponView {
            message: outcome.message(),
            applied: outcome.is_applied(),
        }
    });

    Ok(CartShowTemplate {
        nav,
        items: cart.items().iter().map(CartItemView::from).collect(),
        summary: SummaryView::from(cart.summary()),
        coupon,
    })
}

/// Cart count badge fragment.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<CartCountTemplate, AppError> {
    let cart = load_cart(&session).await?;
    Ok(CartCountTemplate {
        count: cart.count(),
    })
}

/// Add item to cart.
///
/// Redirects back to the product page with `added=1`, or with an `error`
/// message when the product cannot be added.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Redirect, AppError> {
    let product_id = ProductId::new(form.product_id.as_str());
    let product = state
        .catalog()
        .get_product_by_id(&product_id)
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;

    let mut cart = load_cart(&session).await?;
    let product_page = format!("/products/{product_id}");

    match cart.add(product, parse_quantity(&form.quantity)) {
        Ok(quantity) => {
            save_cart(&session, &cart).await?;
            add_breadcrumb(
                "cart",
                "Added to cart",
                Some(&[("product_id", product_id.as_str())]),
            );
            tracing::info!(product_id = %product_id, quantity, "Added to cart");

            let target = local_path(form.return_to.as_deref())
                .map_or_else(|| format!("{product_page}?added=1"), String::from);
            Ok(Redirect::to(&target))
        }
        Err(e) => {
            tracing::info!(product_id = %product_id, error = %e, "Add to cart rejected");
            Ok(Redirect::to(&format!(
                "{product_page}?error={}",
                urlencoding::encode(&e.to_string())
            )))
        }
    }
}

/// Update a line's quantity. Zero removes the line.
#[instrument(skip(session))]
pub async fn update(
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Result<Redirect, AppError> {
    let mut cart = load_cart(&session).await?;
    cart.update_quantity(
        &ProductId::new(form.product_id.as_str()),
        parse_quantity(&form.quantity),
    );
    save_cart(&session, &cart).await?;

    Ok(Redirect::to("/cart"))
}

/// Remove a line from the cart.
#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Redirect, AppError> {
    let mut cart = load_cart(&session).await?;
    if cart.remove(&ProductId::new(form.product_id.as_str())) {
        add_breadcrumb(
            "cart",
            "Removed from cart",
            Some(&[("product_id", form.product_id.as_str())]),
        );
        save_cart(&session, &cart).await?;
    }

    Ok(Redirect::to("/cart"))
}

/// Empty the cart.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Redirect, AppError> {
    save_cart(&session, &Cart::default()).await?;
    add_breadcrumb("cart", "Cleared cart", None);

    Ok(Redirect::to("/cart"))
}

/// Check a coupon code. Applies no discount.
#[instrument(skip(form))]
pub async fn coupon(Form(form): Form<CouponForm>) -> Redirect {
    let outcome = CouponOutcome::check(&form.code);
    tracing::debug!(applied = outcome.is_applied(), "Coupon checked");

    Redirect::to(if outcome.is_applied() {
        "/cart?coupon=applied"
    } else {
        "/cart?coupon=invalid"
    })
}
