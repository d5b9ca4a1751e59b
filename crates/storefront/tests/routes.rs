//! Router-level tests driving the full middleware stack in-process.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use tower::ServiceExt;

use shopwave_storefront::catalog::Catalog;
use shopwave_storefront::config::StorefrontConfig;
use shopwave_storefront::middleware::SESSION_COOKIE_NAME;
use shopwave_storefront::state::AppState;

/// A browser stand-in: one router plus the session cookie it was handed.
struct Client {
    app: Router,
    cookie: Option<String>,
}

/// What a test needs from a response.
struct Page {
    status: StatusCode,
    location: Option<String>,
    body: String,
}

impl Client {
    fn new() -> Self {
        let config = StorefrontConfig {
            payment_delay: Duration::ZERO,
            ..StorefrontConfig::default()
        };
        let state = AppState::new(config, Catalog::sample().unwrap());
        Self {
            app: shopwave_storefront::app(state),
            cookie: None,
        }
    }

    async fn send(&mut self, request: Request<Body>) -> Page {
        let response = self.app.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
            if pair.starts_with(SESSION_COOKIE_NAME) {
                self.cookie = Some(pair.to_string());
            }
        }

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|l| l.to_str().unwrap().to_string());
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        Page {
            status,
            location,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    async fn get(&mut self, uri: &str) -> Page {
        let mut request = Request::builder().uri(uri);
        if let Some(cookie) = &self.cookie {
            request = request.header(header::COOKIE, cookie);
        }
        self.send(request.body(Body::empty()).unwrap()).await
    }

    async fn post(&mut self, uri: &str, form: &str) -> Page {
        let mut request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = &self.cookie {
            request = request.header(header::COOKIE, cookie);
        }
        self.send(request.body(Body::from(form.to_string())).unwrap())
            .await
    }

    async fn login_as(&mut self, email: &str) {
        let page = self
            .post(
                "/login",
                &format!("email={}&password=password", urlencoding::encode(email)),
            )
            .await;
        assert_eq!(page.status, StatusCode::SEE_OTHER);
        assert_eq!(page.location.as_deref(), Some("/"));
    }
}

// =============================================================================
// Layout & Fallback
// =============================================================================

#[tokio::test]
async fn test_health() {
    let page = Client::new().get("/health").await;
    assert_eq!(page.status, StatusCode::OK);
    assert_eq!(page.body, "ok");
}

#[tokio::test]
async fn test_unknown_path_renders_not_found_page() {
    let page = Client::new().get("/definitely/not/here").await;
    assert_eq!(page.status, StatusCode::NOT_FOUND);
    assert!(page.body.contains("Page Not Found"));
}

#[tokio::test]
async fn test_unknown_product_renders_not_found_page() {
    let page = Client::new().get("/products/999").await;
    assert_eq!(page.status, StatusCode::NOT_FOUND);
    assert!(page.body.contains("Product Not Found"));
}

#[tokio::test]
async fn test_home_lists_and_filters_products() {
    let mut client = Client::new();

    let page = client.get("/").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Premium Wireless Headphones"));
    assert!(page.body.contains("8 products found"));

    let page = client.get("/?category=Furniture").await;
    assert!(page.body.contains("Ergonomic Office Chair"));
    assert!(!page.body.contains("Premium Wireless Headphones"));
}

#[tokio::test]
async fn test_listing_add_to_cart_stays_on_listing() {
    let mut client = Client::new();

    let page = client.get("/?category=Furniture").await;
    assert!(page.body.contains(r#"name="return_to" value="/?category=Furniture""#));

    let page = client
        .post(
            "/cart/add",
            "product_id=5&quantity=1&return_to=%2F%3Fcategory%3DFurniture",
        )
        .await;
    assert_eq!(page.location.as_deref(), Some("/?category=Furniture"));

    let page = client.get("/?category=Furniture").await;
    assert!(page.body.contains(r#"<span class="badge badge--cart">1</span>"#));
}

// =============================================================================
// Auth
// =============================================================================

#[tokio::test]
async fn test_failed_login_redirects_with_error() {
    let mut client = Client::new();
    let page = client
        .post("/login", "email=admin%40example.com&password=wrong")
        .await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(page.location.as_deref(), Some("/login?error=credentials"));

    let page = client.get("/login?error=credentials").await;
    assert!(page.body.contains("Invalid credentials"));
}

#[tokio::test]
async fn test_customer_login_and_logout() {
    let mut client = Client::new();
    client.login_as("user@example.com").await;

    let page = client.get("/").await;
    assert!(page.body.contains("Regular User"));
    assert!(!page.body.contains("Admin Dashboard"));

    let page = client.post("/logout", "").await;
    assert_eq!(page.location.as_deref(), Some("/"));
    let page = client.get("/").await;
    assert!(!page.body.contains("Regular User"));
}

#[tokio::test]
async fn test_register_signs_in_new_customer() {
    let mut client = Client::new();
    let page = client
        .post(
            "/register",
            "name=Ada&email=ada%40example.com&password=pw&password_confirm=pw",
        )
        .await;
    assert_eq!(page.location.as_deref(), Some("/"));

    let page = client.get("/").await;
    assert!(page.body.contains("ada@example.com"));
}

#[tokio::test]
async fn test_register_rejects_mismatched_passwords() {
    let page = Client::new()
        .post(
            "/register",
            "name=Ada&email=ada%40example.com&password=pw&password_confirm=other",
        )
        .await;
    assert_eq!(
        page.location.as_deref(),
        Some("/register?error=password_mismatch")
    );
}

// =============================================================================
// Guards
// =============================================================================

#[tokio::test]
async fn test_orders_requires_login() {
    let mut client = Client::new();
    let page = client.get("/orders").await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(page.location.as_deref(), Some("/login"));

    client.login_as("user@example.com").await;
    let page = client.get("/orders").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("ORD-1001"));
}

#[tokio::test]
async fn test_admin_guard() {
    let mut client = Client::new();
    let page = client.get("/admin").await;
    assert_eq!(page.location.as_deref(), Some("/login"));

    client.login_as("user@example.com").await;
    let page = client.get("/admin/products").await;
    assert_eq!(page.location.as_deref(), Some("/"));

    let mut admin = Client::new();
    admin.login_as("admin@example.com").await;
    let page = admin.get("/admin").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Welcome back, Admin User"));
    assert!(page.body.contains("$1119.94"));
}

// =============================================================================
// Cart
// =============================================================================

#[tokio::test]
async fn test_adding_twice_increments_quantity() {
    let mut client = Client::new();

    let page = client.post("/cart/add", "product_id=1&quantity=1").await;
    assert_eq!(page.location.as_deref(), Some("/products/1?added=1"));
    client.post("/cart/add", "product_id=1&quantity=1").await;

    let page = client.get("/cart/count").await;
    assert!(page.body.contains(">2<"));

    let page = client.get("/cart").await;
    assert_eq!(page.body.matches("class=\"cart-line\"").count(), 1);
}

#[tokio::test]
async fn test_unparsable_quantity_counts_as_one() {
    let mut client = Client::new();

    let page = client.post("/cart/add", "product_id=1&quantity=abc").await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert!(client.get("/cart/count").await.body.contains(">1<"));

    client.post("/cart/update", "product_id=1&quantity=3").await;
    assert!(client.get("/cart/count").await.body.contains(">3<"));

    let page = client.post("/cart/update", "product_id=1&quantity=").await;
    assert_eq!(page.location.as_deref(), Some("/cart"));
    assert!(client.get("/cart/count").await.body.contains(">1<"));
}

#[tokio::test]
async fn test_remove_last_item_empties_cart() {
    let mut client = Client::new();
    client.post("/cart/add", "product_id=2").await;

    let page = client.post("/cart/remove", "product_id=2").await;
    assert_eq!(page.location.as_deref(), Some("/cart"));

    let page = client.get("/cart").await;
    assert!(page.body.contains("Your cart is empty"));
}

#[tokio::test]
async fn test_coupon_reports_outcome() {
    let mut client = Client::new();
    client.post("/cart/add", "product_id=2").await;

    let page = client.post("/cart/coupon", "code=DISCOUNT10").await;
    assert_eq!(page.location.as_deref(), Some("/cart?coupon=applied"));
    let page = client.get("/cart?coupon=applied").await;
    assert!(page.body.contains("Coupon applied successfully!"));

    let page = client.post("/cart/coupon", "code=nope").await;
    assert_eq!(page.location.as_deref(), Some("/cart?coupon=invalid"));
}

// =============================================================================
// Checkout
// =============================================================================

#[tokio::test]
async fn test_confirmation_for_unknown_order_has_timeline_only() {
    let page = Client::new().get("/order-confirmation/ORD-1234").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("ORD-1234"));
    assert!(page.body.contains("Estimated Shipping"));
    assert!(!page.body.contains("Shipping Information"));
}

#[tokio::test]
async fn test_checkout_with_empty_cart_goes_to_cart() {
    let page = Client::new().get("/checkout").await;
    assert_eq!(page.location.as_deref(), Some("/cart"));
}

#[tokio::test]
async fn test_full_checkout() {
    let mut client = Client::new();
    client.post("/cart/add", "product_id=6").await;

    let page = client.get("/checkout").await;
    assert!(page.body.contains("Shipping Information"));

    let page = client
        .post(
            "/checkout/shipping",
            "full_name=Ada+Lovelace&email=ada%40example.com&address=1+Main+St\
             &city=Springfield&state=IL&zip_code=62701&country=US",
        )
        .await;
    assert_eq!(page.location.as_deref(), Some("/checkout"));

    let page = client.get("/checkout").await;
    assert!(page.body.contains("Payment Information"));
    assert!(page.body.contains("Springfield"));

    let page = client
        .post(
            "/checkout/payment",
            "card_number=4242+4242+4242+4242&card_name=Ada+Lovelace\
             &expiry_date=12%2F29&cvv=123&same_as_shipping=on",
        )
        .await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    let location = page.location.unwrap();
    let order_id = location.strip_prefix("/order-confirmation/").unwrap();
    assert!(order_id.starts_with("ORD-"));
    assert_eq!(order_id.len(), 8);

    let page = client.get(&location).await;
    assert!(page.body.contains(order_id));
    assert!(page.body.contains("Ada Lovelace"));
    assert!(page.body.contains("Springfield, IL 62701"));
    assert!(page.body.contains("Estimated Delivery"));

    let page = client.get("/cart/count").await;
    assert!(page.body.trim().is_empty());
}

#[tokio::test]
async fn test_invalid_payment_rerenders_with_error() {
    let mut client = Client::new();
    client.post("/cart/add", "product_id=6").await;
    client
        .post(
            "/checkout/shipping",
            "full_name=Ada&email=ada%40example.com&address=1+Main&city=X&state=Y&zip_code=1",
        )
        .await;

    let page = client
        .post(
            "/checkout/payment",
            "card_number=1234&card_name=Ada&expiry_date=13%2F29&cvv=12",
        )
        .await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Payment Information"));
    assert!(page.body.contains("Please enter a valid card number"));
}

// =============================================================================
// Admin
// =============================================================================

#[tokio::test]
async fn test_admin_user_role_filter() {
    let mut admin = Client::new();
    admin.login_as("admin@example.com").await;

    let page = admin.get("/admin/users?role=customer").await;
    assert!(page.body.contains("john@example.com"));

    let page = admin.get("/admin/users?role=admin").await;
    assert!(!page.body.contains("john@example.com"));
    assert!(!page.body.contains("user@example.com"));
}

#[tokio::test]
async fn test_admin_delete_hides_product_for_session_only() {
    let mut admin = Client::new();
    admin.login_as("admin@example.com").await;

    let page = admin.get("/admin/products").await;
    assert!(page.body.contains("Premium Wireless Headphones"));

    let page = admin.post("/admin/products/1/delete", "").await;
    assert_eq!(
        page.location.as_deref(),
        Some("/admin/products?notice=deleted")
    );

    let page = admin.get("/admin/products?notice=deleted").await;
    assert!(page.body.contains("Deleted"));
    assert!(!page.body.contains("Premium Wireless Headphones"));

    // The storefront catalog is untouched
    let page = admin.get("/products/1").await;
    assert_eq!(page.status, StatusCode::OK);
}

#[tokio::test]
async fn test_admin_order_search_and_expand() {
    let mut admin = Client::new();
    admin.login_as("admin@example.com").await;

    let page = admin.get("/admin/orders?search=ord-1002&expanded=ORD-1002").await;
    assert!(page.body.contains("ORD-1002"));
    assert!(!page.body.contains("ORD-1001"));
    assert!(page.body.contains("Update Status"));

    let page = admin
        .post("/admin/orders/ORD-1002/status", "status=shipped")
        .await;
    assert_eq!(
        page.location.as_deref(),
        Some("/admin/orders?expanded=ORD-1002&notice=status")
    );
}
