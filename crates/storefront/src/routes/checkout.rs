//! Checkout route handlers.
//!
//! A two-step wizard: shipping details are validated and kept in the session,
//! then the payment form triggers the simulated charge.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, add_breadcrumb, checkout_message};
use crate::filters;
use crate::middleware::OptionalUser;
use crate::middleware::session::{
    clear_shipping, load_cart, load_last_order, load_shipping, save_cart, save_last_order,
    save_shipping,
};
use crate::models::Cart;
use crate::routes::NavView;
use crate::routes::cart::SummaryView;
use crate::services::checkout::{
    DEFAULT_COUNTRY, estimated_delivery_date, estimated_ship_date, format_confirmation_date,
};
use crate::services::{PaymentForm, PaymentInfo, ShippingForm, ShippingInfo};
use crate::state::AppState;

/// Which wizard step to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStep {
    Shipping,
    Payment,
}

/// Compact line for the checkout sidebar.
#[derive(Debug, Clone)]
pub struct CheckoutLineView {
    pub name: String,
    pub quantity: u32,
    pub line_total: String,
}

/// Values echoed back into the shipping form.
#[derive(Debug, Clone)]
pub struct ShippingFormView {
    pub full_name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl Default for ShippingFormView {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            email: String::new(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            zip_code: String::new(),
            country: DEFAULT_COUNTRY.to_string(),
        }
    }
}

impl From<&ShippingForm> for ShippingFormView {
    fn from(form: &ShippingForm) -> Self {
        Self {
            full_name: form.full_name.clone(),
            email: form.email.clone(),
            address: form.address.clone(),
            city: form.city.clone(),
            state: form.state.clone(),
            zip_code: form.zip_code.clone(),
            country: if form.country.trim().is_empty() {
                DEFAULT_COUNTRY.to_string()
            } else {
                form.country.clone()
            },
        }
    }
}

impl From<&ShippingInfo> for ShippingFormView {
    fn from(info: &ShippingInfo) -> Self {
        Self {
            full_name: info.address.full_name.clone(),
            email: info.email.to_string(),
            address: info.address.street_address.clone(),
            city: info.address.city.clone(),
            state: info.address.state.clone(),
            zip_code: info.address.postal_code.clone(),
            country: info.address.country.clone(),
        }
    }
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub nav: NavView,
    pub step: CheckoutStep,
    pub shipping: ShippingFormView,
    /// One-line address shown above the payment form.
    pub ship_to: String,
    pub card_name: String,
    pub lines: Vec<CheckoutLineView>,
    pub summary: SummaryView,
    pub error: Option<String>,
}

impl CheckoutTemplate {
    fn new(nav: NavView, cart: &Cart, step: CheckoutStep) -> Self {
        Self {
            nav,
            step,
            shipping: ShippingFormView::default(),
            ship_to: String::new(),
            card_name: String::new(),
            lines: cart
                .items()
                .iter()
                .map(|item| CheckoutLineView {
                    name: item.product.name.clone(),
                    quantity: item.quantity,
                    line_total: item.line_total().to_string(),
                })
                .collect(),
            summary: SummaryView::from(cart.summary()),
            error: None,
        }
    }

    const fn is_payment(&self) -> bool {
        matches!(self.step, CheckoutStep::Payment)
    }
}

/// Order confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/confirmation.html")]
pub struct ConfirmationTemplate {
    pub nav: NavView,
    pub order_id: String,
    pub order_date: String,
    pub ship_date: String,
    pub delivery_date: String,
    /// Present when the order was placed in this session.
    pub shipping: Option<ConfirmationShippingView>,
}

/// Shipping block on the confirmation page.
#[derive(Debug, Clone)]
pub struct ConfirmationShippingView {
    pub full_name: String,
    pub email: String,
    pub street_address: String,
    pub city_line: String,
    pub country: String,
}

impl From<&ShippingInfo> for ConfirmationShippingView {
    fn from(info: &ShippingInfo) -> Self {
        let address = &info.address;
        Self {
            full_name: address.full_name.clone(),
            email: info.email.to_string(),
            street_address: address.street_address.clone(),
            city_line: format!("{}, {} {}", address.city, address.state, address.postal_code),
            country: address.country.clone(),
        }
    }
}

/// Query parameters for the checkout page.
#[derive(Debug, Default, Deserialize)]
pub struct CheckoutQuery {
    /// `shipping` to go back and edit step 1.
    pub step: Option<String>,
}

/// Show the current checkout step.
#[instrument(skip(state, session, user))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    OptionalUser(user): OptionalUser,
    Query(query): Query<CheckoutQuery>,
) -> Result<Response, AppError> {
    let cart = load_cart(&session).await?;
    if cart.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }

    let shipping = load_shipping(&session).await?;
    let editing = query.step.as_deref() == Some("shipping");
    let nav = NavView::load(&state, &session, user.as_ref()).await?;

    let page = match shipping {
        Some(info) if !editing => CheckoutTemplate {
            ship_to: info.address.one_line(),
            card_name: info.address.full_name.clone(),
            shipping: ShippingFormView::from(&info),
            ..CheckoutTemplate::new(nav, &cart, CheckoutStep::Payment)
        },
        Some(info) => CheckoutTemplate {
            shipping: ShippingFormView::from(&info),
            ..CheckoutTemplate::new(nav, &cart, CheckoutStep::Shipping)
        },
        None => CheckoutTemplate::new(nav, &cart, CheckoutStep::Shipping),
    };

    Ok(page.into_response())
}

/// Validate and store shipping details (step 1).
#[instrument(skip(state, session, user, form))]
pub async fn shipping(
    State(state): State<AppState>,
    session: Session,
    OptionalUser(user): OptionalUser,
    Form(form): Form<ShippingForm>,
) -> Result<Response, AppError> {
    let cart = load_cart(&session).await?;
    if cart.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }

    match ShippingInfo::from_form(&form) {
        Ok(info) => {
            save_shipping(&session, &info).await?;
            add_breadcrumb("checkout", "Shipping details entered", None);
            Ok(Redirect::to("/checkout").into_response())
        }
        Err(e) => {
            tracing::debug!(error = %e, "Shipping form rejected");
            let nav = NavView::load(&state, &session, user.as_ref()).await?;
            Ok(CheckoutTemplate {
                shipping: ShippingFormView::from(&form),
                error: Some(checkout_message(&e)),
                ..CheckoutTemplate::new(nav, &cart, CheckoutStep::Shipping)
            }
            .into_response())
        }
    }
}

/// Validate payment, run the simulated charge and place the order (step 2).
#[instrument(skip(state, session, user, form))]
pub async fn payment(
    State(state): State<AppState>,
    session: Session,
    OptionalUser(user): OptionalUser,
    Form(form): Form<PaymentForm>,
) -> Result<Response, AppError> {
    let cart = load_cart(&session).await?;
    if cart.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }
    let Some(shipping) = load_shipping(&session).await? else {
        return Ok(Redirect::to("/checkout").into_response());
    };

    let payment = match PaymentInfo::from_form(&form) {
        Ok(payment) => payment,
        Err(e) => {
            tracing::debug!(error = %e, "Payment form rejected");
            let nav = NavView::load(&state, &session, user.as_ref()).await?;
            return Ok(CheckoutTemplate {
                ship_to: shipping.address.one_line(),
                card_name: form.card_name.clone(),
                shipping: ShippingFormView::from(&shipping),
                error: Some(checkout_message(&e)),
                ..CheckoutTemplate::new(nav, &cart, CheckoutStep::Payment)
            }
            .into_response());
        }
    };

    let order = state
        .checkout()
        .place_order(&cart, &shipping, &payment)
        .await?;

    save_cart(&session, &Cart::default()).await?;
    clear_shipping(&session).await?;
    save_last_order(&session, &order).await?;
    add_breadcrumb(
        "checkout",
        "Order placed",
        Some(&[("order_id", order.id.as_str())]),
    );

    Ok(Redirect::to(&format!("/order-confirmation/{}", order.id)).into_response())
}

/// Order confirmation page.
#[instrument(skip(state, session, user))]
pub async fn confirmation(
    State(state): State<AppState>,
    session: Session,
    OptionalUser(user): OptionalUser,
    Path(id): Path<String>,
) -> Result<ConfirmationTemplate, AppError> {
    let nav = NavView::load(&state, &session, user.as_ref()).await?;
    let placed = load_last_order(&session)
        .await?
        .filter(|order| order.id.as_str() == id);
    let placed_at = placed.as_ref().map_or_else(Utc::now, |order| order.placed_at);

    Ok(ConfirmationTemplate {
        nav,
        order_id: id,
        order_date: format_confirmation_date(placed_at),
        ship_date: format_confirmation_date(estimated_ship_date(placed_at)),
        delivery_date: format_confirmation_date(estimated_delivery_date(placed_at)),
        shipping: placed
            .as_ref()
            .map(|order| ConfirmationShippingView::from(&order.shipping)),
    })
}
