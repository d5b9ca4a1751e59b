//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Product listing (search, category, price filters)
//! GET  /health                    - Health check
//! GET  /products/{id}             - Product detail
//!
//! # Cart
//! GET  /cart                      - Cart page
//! GET  /cart/count                - Cart count badge (fragment)
//! POST /cart/add                  - Add to cart
//! POST /cart/update               - Set a line's quantity
//! POST /cart/remove               - Remove a line
//! POST /cart/clear                - Empty the cart
//! POST /cart/coupon               - Check a coupon code
//!
//! # Checkout
//! GET  /checkout                  - Shipping or payment step
//! POST /checkout/shipping         - Save shipping details
//! POST /checkout/payment          - Pay (simulated) and place the order
//! GET  /order-confirmation/{id}   - Thank-you page
//!
//! # Auth
//! GET  /login, POST /login        - Sign in (rate limited)
//! GET  /register, POST /register  - Sign up (rate limited)
//! POST /logout                    - Sign out
//!
//! # Account (requires sign-in)
//! GET  /orders                    - Order history
//!
//! # Admin (requires admin role)
//! GET  /admin                     - Dashboard
//! GET  /admin/products            - Products table
//! GET  /admin/orders              - Orders table
//! GET  /admin/users               - Users table
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod home;
pub mod orders;
pub mod products;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::AppError;
use crate::filters;
use crate::middleware::{OptionalUser, auth_rate_limiter, session::load_cart};
use crate::models::User;
use crate::state::AppState;

// =============================================================================
// Shared Layout Data
// =============================================================================

/// Signed-in user display data for the navbar.
#[derive(Debug, Clone)]
pub struct UserView {
    pub name: String,
    pub email: String,
    pub is_admin: bool,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.to_string(),
            is_admin: user.is_admin(),
        }
    }
}

/// Everything the shared navbar and footer need.
#[derive(Debug, Clone)]
pub struct NavView {
    pub cart_count: u32,
    pub user: Option<UserView>,
    /// Current search text, echoed back into the search box.
    pub search: String,
    pub categories: Vec<String>,
}

impl NavView {
    /// Build the layout data for the current visitor.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn load(
        state: &AppState,
        session: &Session,
        user: Option<&User>,
    ) -> Result<Self, AppError> {
        let cart = load_cart(session).await?;

        Ok(Self {
            cart_count: cart.count(),
            user: user.map(UserView::from),
            search: String::new(),
            categories: state
                .catalog()
                .categories()
                .into_iter()
                .map(String::from)
                .collect(),
        })
    }

    #[must_use]
    pub fn with_search(mut self, search: &str) -> Self {
        search.clone_into(&mut self.search);
        self
    }
}

// =============================================================================
// Health & Not Found
// =============================================================================

/// Liveness probe.
pub async fn health() -> &'static str {
    "ok"
}

/// 404 page template.
#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub nav: NavView,
}

/// Fallback for unknown paths.
#[instrument(skip(state, session, user))]
pub async fn not_found(
    axum::extract::State(state): axum::extract::State<AppState>,
    session: Session,
    OptionalUser(user): OptionalUser,
    uri: axum::http::Uri,
) -> Result<impl IntoResponse, AppError> {
    tracing::debug!(path = %uri.path(), "No route matched");
    let nav = NavView::load(&state, &session, user.as_ref()).await?;
    Ok((StatusCode::NOT_FOUND, NotFoundTemplate { nav }))
}

// =============================================================================
// Routers
// =============================================================================

/// Create the auth routes router.
///
/// Only the credential-accepting POSTs are rate limited.
pub fn auth_routes() -> Router<AppState> {
    let limiter = auth_rate_limiter();

    Router::new()
        .route(
            "/login",
            get(auth::login_page).merge(post(auth::login).layer(limiter.clone())),
        )
        .route(
            "/register",
            get(auth::register_page).merge(post(auth::register).layer(limiter)),
        )
        .route("/logout", post(auth::logout))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/count", get(cart::count))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/coupon", post(cart::coupon))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/checkout", get(checkout::show))
        .route("/checkout/shipping", post(checkout::shipping))
        .route("/checkout/payment", post(checkout::payment))
        .route("/order-confirmation/{id}", get(checkout::confirmation))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(admin::dashboard::dashboard))
        .route("/products", get(admin::products::index))
        .route("/products/new", get(admin::products::new))
        .route("/products/save", post(admin::products::save))
        .route("/products/{id}/edit", get(admin::products::edit))
        .route("/products/{id}/delete", post(admin::products::delete))
        .route("/orders", get(admin::orders::index))
        .route("/orders/{id}/status", post(admin::orders::update_status))
        .route("/users", get(admin::users::index))
        .route("/users/new", get(admin::users::new))
        .route("/users/save", post(admin::users::save))
        .route("/users/{id}/edit", get(admin::users::edit))
        .route("/users/{id}/delete", post(admin::users::delete))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .route("/health", get(health))
        .route("/products/{id}", get(products::show))
        .route("/orders", get(orders::index))
        .nest("/cart", cart_routes())
        .nest("/admin", admin_routes())
        .merge(checkout_routes())
        .merge(auth_routes())
        .fallback(not_found)
}
