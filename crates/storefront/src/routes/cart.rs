//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads;
//! without JavaScript the same forms post normally and redirect to `/cart`.
//! The cart itself is stored in the visitor session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use freedom_project_core::{Cart, CartLine, Product};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::HxRequest;
use crate::models::{load_cart, save_cart};
use crate::routes::layout::LayoutView;
use crate::state::AppState;

/// Event HTMX fires on `body` after any cart change.
pub const CART_UPDATED_TRIGGER: (&str, &str) = ("HX-Trigger", "cart-updated");

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartLineView {
    pub index: usize,
    pub product_id: String,
    pub name: String,
    pub size: String,
    pub quantity: u32,
    pub subtotal: String,
    pub decrement_quantity: u32,
    pub increment_quantity: u32,
    pub can_decrement: bool,
    pub can_increment: bool,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub total: String,
    pub item_count: u32,
    pub is_empty: bool,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            lines: cart
                .lines()
                .iter()
                .enumerate()
                .map(|(index, line)| CartLineView::new(index, line))
                .collect(),
            total: cart.total().to_string(),
            item_count: cart.item_count(),
            is_empty: cart.is_empty(),
        }
    }
}

impl CartLineView {
    fn new(index: usize, line: &CartLine) -> Self {
        let decrement_quantity = line.decremented_quantity();
        let increment_quantity = line.incremented_quantity();
        Self {
            index,
            product_id: line.product.id.to_string(),
            name: line.product.name.clone(),
            size: line.size.clone(),
            quantity: line.quantity,
            subtotal: line.subtotal().to_string(),
            decrement_quantity,
            increment_quantity,
            can_decrement: decrement_quantity != line.quantity,
            can_increment: increment_quantity != line.quantity,
        }
    }
}

/// Product + size selection from a product card.
///
/// `size` falls back to the product's first size when omitted.
#[derive(Debug, Deserialize)]
pub struct PurchaseForm {
    pub product_id: String,
    pub size: Option<String>,
}

/// Update cart form data.
///
/// `product_id` and `size` identify the line the visitor saw at `index`.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub index: usize,
    pub product_id: String,
    pub size: String,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub index: usize,
    pub product_id: String,
    pub size: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub layout: LayoutView,
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Resolve a product card submission against the catalog.
///
/// # Errors
///
/// - `NotFound` if the product is not in the catalog
/// - `BadRequest` if it is sold out or the size is not one of its sizes
pub(crate) fn resolve_purchase(state: &AppState, form: PurchaseForm) -> Result<(Product, String)> {
    let product = state
        .catalog()
        .find(&form.product_id)
        .ok_or_else(|| AppError::NotFound(format!("product {}", form.product_id)))?;

    if product.is_sold_out() {
        return Err(AppError::BadRequest(format!("{} is sold out", product.name)));
    }

    let size = match form.size.filter(|s| !s.is_empty()) {
        Some(size) => size,
        None => product
            .default_size()
            .ok_or_else(|| AppError::BadRequest(format!("{} has no sizes", product.name)))?
            .to_string(),
    };

    if !product.has_size(&size) {
        return Err(AppError::BadRequest(format!(
            "size {size} is not available for {}",
            product.name
        )));
    }

    Ok((product, size))
}

/// Respond to a cart mutation with the re-rendered items fragment, or a
/// redirect to the cart page for non-HTMX form posts.
fn cart_items_response(cart: &Cart, is_htmx: bool) -> Response {
    if !is_htmx {
        return Redirect::to("/cart").into_response();
    }

    (
        AppendHeaders([CART_UPDATED_TRIGGER]),
        CartItemsTemplate {
            cart: CartView::from(cart),
        },
    )
        .into_response()
}

/// Display cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    let cart = load_cart(&session).await?;

    Ok(CartShowTemplate {
        layout: LayoutView::new(&state, cart.item_count()),
        cart: CartView::from(&cart),
    })
}

/// Add one unit of a product at a size.
///
/// Merges into the existing line for the same product and size. Returns
/// the cart count badge with an HTMX trigger to refresh other elements.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    HxRequest(is_htmx): HxRequest,
    Form(form): Form<PurchaseForm>,
) -> Result<Response> {
    let (product, size) = resolve_purchase(&state, form)?;

    let mut cart = load_cart(&session).await?;
    cart.add(&product, &size);
    save_cart(&session, &cart).await?;

    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", product.id.as_str()), ("size", &size)]),
    );
    tracing::info!(product_id = %product.id, size = %size, items = cart.item_count(), "Added to cart");

    if !is_htmx {
        return Ok(Redirect::to("/cart").into_response());
    }

    Ok((
        AppendHeaders([CART_UPDATED_TRIGGER]),
        CartCountTemplate {
            count: cart.item_count(),
        },
    )
        .into_response())
}

/// Set a line's quantity (HTMX).
///
/// The quantity is capped at the line's stock. A stale position (the line
/// at `index` is not the submitted product and size) or a zero quantity
/// fails only this operation: the cart is left as it was and re-rendered
/// so the drawer shows current positions.
#[instrument(skip(session))]
pub async fn update(
    session: Session,
    HxRequest(is_htmx): HxRequest,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let mut cart = load_cart(&session).await?;

    let result = cart
        .line_for(form.index, &form.product_id, &form.size)
        .map(|line| line.capped_quantity(form.quantity))
        .and_then(|quantity| cart.update_quantity(form.index, quantity));

    match result {
        Ok(()) => save_cart(&session, &cart).await?,
        Err(e) => tracing::warn!(error = %e, "Rejected cart quantity update"),
    }

    Ok(cart_items_response(&cart, is_htmx))
}

/// Remove a line (HTMX).
///
/// Same failure handling as [`update`].
#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    HxRequest(is_htmx): HxRequest,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let mut cart = load_cart(&session).await?;

    let result = cart
        .line_for(form.index, &form.product_id, &form.size)
        .map(|_| ())
        .and_then(|()| cart.remove(form.index));

    match result {
        Ok(line) => {
            save_cart(&session, &cart).await?;
            tracing::info!(product_id = %line.product.id, size = %line.size, "Removed from cart");
        }
        Err(e) => tracing::warn!(error = %e, "Rejected cart line removal"),
    }

    Ok(cart_items_response(&cart, is_htmx))
}

/// Get cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<impl IntoResponse> {
    let cart = load_cart(&session).await?;

    Ok(CartCountTemplate {
        count: cart.item_count(),
    })
}
