//! WhatsApp checkout: order summaries and `wa.me` deep links.
//!
//! Checkout does not create an order anywhere. It renders a human-readable
//! summary and hands the visitor a link that opens WhatsApp with the
//! summary prefilled; the shop confirms availability in the chat.

use std::fmt::Write;

use freedom_project_core::{Cart, Product};

/// Base URL of WhatsApp's click-to-chat service.
pub const WHATSAPP_BASE_URL: &str = "https://wa.me/";

/// Summary for the "Comprar Ahora" button on a product card.
#[must_use]
pub fn buy_now_message(product: &Product, size: &str) -> String {
    format!(
        "Hola! Quiero comprar:\n\n\
         📦 Producto: {name}\n\
         💰 Precio: {price}\n\
         📏 Talla: {size}\n\n\
         ¿Está disponible?",
        name = product.name,
        price = product.price,
    )
}

/// Summary of the whole cart, numbered in cart order.
#[must_use]
pub fn checkout_message(cart: &Cart) -> String {
    let mut message = String::from("¡Hola! Quiero hacer el siguiente pedido:\n\n");

    for (index, line) in cart.lines().iter().enumerate() {
        // Writing to a String cannot fail
        let _ = write!(
            message,
            "{number}. {name}\n   \
             Talla: {size}\n   \
             Cantidad: {quantity}\n   \
             Precio: {subtotal}\n\n",
            number = index + 1,
            name = line.product.name,
            size = line.size,
            quantity = line.quantity,
            subtotal = line.subtotal(),
        );
    }

    let _ = write!(message, "💵 TOTAL: {}\n\n", cart.total());
    message.push_str("¿Está todo disponible?");
    message
}

/// Build a `wa.me` link that opens a chat with `message` prefilled.
///
/// Without a phone number WhatsApp asks the visitor which chat to use. The
/// message is percent-encoded byte by byte except for RFC 3986 unreserved
/// characters, so decoding the `text` parameter yields it back exactly.
#[must_use]
pub fn whatsapp_link(message: &str, phone: Option<&str>) -> String {
    format!(
        "{WHATSAPP_BASE_URL}{}?text={}",
        phone.unwrap_or_default(),
        urlencoding::encode(message)
    )
}
