//! Session-related types.
//!
//! The cart is stored whole in the session: each request loads it, applies
//! one operation, and writes it back.

use freedom_project_core::Cart;
use tower_sessions::Session;

/// Session keys for visitor data.
pub mod keys {
    /// Key for the visitor's cart.
    pub const CART: &str = "cart";
}

/// Load the visitor's cart, or an empty one for a new session.
///
/// # Errors
///
/// Returns an error if the session store cannot be read or the stored cart
/// does not deserialize.
pub async fn load_cart(session: &Session) -> Result<Cart, tower_sessions::session::Error> {
    Ok(session.get::<Cart>(keys::CART).await?.unwrap_or_default())
}

/// Save the visitor's cart.
///
/// # Errors
///
/// Returns an error if the session store cannot be written.
pub async fn save_cart(session: &Session, cart: &Cart) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::CART, cart).await
}
