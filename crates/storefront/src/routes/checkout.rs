//! WhatsApp checkout redirects.
//!
//! Both endpoints answer with a redirect to `wa.me`; the product card and
//! cart drawer open them in a new tab so the storefront stays put.

use axum::{
    extract::{Query, State},
    response::Redirect,
};
use tower_sessions::Session;
use tracing::instrument;

use crate::checkout::{buy_now_message, checkout_message, whatsapp_link};
use crate::error::{Result, add_breadcrumb};
use crate::models::load_cart;
use crate::routes::cart::{PurchaseForm, resolve_purchase};
use crate::state::AppState;

/// Redirect to WhatsApp with the whole cart summarized.
///
/// An empty cart has nothing to order, so the visitor lands back on the
/// cart page. The cart is not cleared.
#[instrument(skip(state, session))]
pub async fn checkout(State(state): State<AppState>, session: Session) -> Result<Redirect> {
    let cart = load_cart(&session).await?;

    if cart.is_empty() {
        return Ok(Redirect::to("/cart"));
    }

    add_breadcrumb("checkout", "Cart checkout via WhatsApp", None);
    tracing::info!(
        lines = cart.len(),
        items = cart.item_count(),
        total = %cart.total(),
        "Checkout redirect"
    );

    let message = checkout_message(&cart);
    Ok(Redirect::to(&whatsapp_link(
        &message,
        state.config().whatsapp_phone.as_deref(),
    )))
}

/// Redirect to WhatsApp for a single product and size, bypassing the cart.
#[instrument(skip(state))]
pub async fn buy_now(
    State(state): State<AppState>,
    Query(form): Query<PurchaseForm>,
) -> Result<Redirect> {
    let (product, size) = resolve_purchase(&state, form)?;

    add_breadcrumb(
        "checkout",
        "Buy now via WhatsApp",
        Some(&[("product_id", product.id.as_str()), ("size", &size)]),
    );
    tracing::info!(product_id = %product.id, size = %size, "Buy-now redirect");

    let message = buy_now_message(&product, &size);
    Ok(Redirect::to(&whatsapp_link(
        &message,
        state.config().whatsapp_phone.as_deref(),
    )))
}
