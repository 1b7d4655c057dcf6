//! The visitor's cart.
//!
//! A cart is an ordered list of lines, one per `(product, size)` pair.
//! Lines are addressed by position, matching how the cart drawer renders
//! them; positions shift down after a removal, so callers must re-read the
//! cart before issuing another positional operation.
//!
//! Carts are plain owned values. The storefront loads one from the session,
//! applies a single operation, and writes it back.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Price, Product};

/// Errors from positional cart operations.
///
/// A failed operation leaves the cart unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// The index does not address a line (stale or forged position).
    #[error("cart line {index} does not exist (cart has {len} lines)")]
    IndexOutOfRange { index: usize, len: usize },

    /// The line at `index` is no longer the one the caller saw: the cart
    /// changed since the position was rendered.
    #[error("cart line {index} no longer holds the requested product and size")]
    LineMismatch { index: usize },

    /// Lines must hold at least one unit; use removal instead.
    #[error("quantity must be at least 1")]
    ZeroQuantity,
}

/// One product at one size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Snapshot taken when the line was added. Later catalog changes do not
    /// affect it.
    pub product: Product,
    pub size: String,
    pub quantity: u32,
}

impl CartLine {
    /// `quantity * price`.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.product.price.times(self.quantity)
    }

    /// Quantity after pressing "+": one more, capped at the stock snapshot.
    ///
    /// Never lower than the current quantity, even if the line already
    /// exceeds the stock it was added with.
    #[must_use]
    pub fn incremented_quantity(&self) -> u32 {
        self.quantity
            .saturating_add(1)
            .min(self.product.stock)
            .max(self.quantity)
    }

    /// Quantity after pressing "-": one fewer, never below 1.
    #[must_use]
    pub fn decremented_quantity(&self) -> u32 {
        self.quantity.saturating_sub(1).max(1)
    }

    /// `quantity` capped at the stock snapshot. Zero passes through so the
    /// cart can reject it.
    #[must_use]
    pub fn capped_quantity(&self, quantity: u32) -> u32 {
        quantity.min(self.product.stock.max(1))
    }

    /// Whether this line holds `product_id` at `size`.
    #[must_use]
    pub fn is_for(&self, product_id: &str, size: &str) -> bool {
        self.product.id == *product_id && self.size == size
    }

    fn matches(&self, product: &Product, size: &str) -> bool {
        self.product.id == product.id && self.size == size
    }
}

/// Ordered collection of cart lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add one unit of `product` at `size`.
    ///
    /// If a line for the same product id and size exists its quantity goes up
    /// by one; otherwise a new line with quantity 1 is appended.
    pub fn add(&mut self, product: &Product, size: &str) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.matches(product, size)) {
            line.quantity = line.quantity.saturating_add(1);
            return;
        }

        self.lines.push(CartLine {
            product: product.clone(),
            size: size.to_string(),
            quantity: 1,
        });
    }

    /// Remove the line at `index`, shifting later lines down by one.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::IndexOutOfRange`] if `index >= len()`.
    pub fn remove(&mut self, index: usize) -> Result<CartLine, CartError> {
        if index >= self.lines.len() {
            return Err(self.out_of_range(index));
        }
        Ok(self.lines.remove(index))
    }

    /// The line at `index`, provided it still holds `product_id` at `size`.
    ///
    /// Positions come from a rendered page and go stale when the cart changes
    /// in another tab; checking the line's identity keeps a stale position
    /// from touching a different line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::IndexOutOfRange`] for a bad index and
    /// [`CartError::LineMismatch`] when the line at `index` is another one.
    pub fn line_for(&self, index: usize, product_id: &str, size: &str) -> Result<&CartLine, CartError> {
        let line = self.lines.get(index).ok_or_else(|| self.out_of_range(index))?;
        if !line.is_for(product_id, size) {
            return Err(CartError::LineMismatch { index });
        }
        Ok(line)
    }

    /// Set the quantity of the line at `index`.
    ///
    /// The quantity is not clamped to stock; the cart drawer computes
    /// clamped values with [`CartLine::incremented_quantity`] and
    /// [`CartLine::decremented_quantity`].
    ///
    /// # Errors
    ///
    /// Returns [`CartError::IndexOutOfRange`] for a bad index and
    /// [`CartError::ZeroQuantity`] for a quantity of zero.
    pub fn update_quantity(&mut self, index: usize, quantity: u32) -> Result<(), CartError> {
        let len = self.lines.len();
        let line = self
            .lines
            .get_mut(index)
            .ok_or(CartError::IndexOutOfRange { index, len })?;
        if quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }
        line.quantity = quantity;
        Ok(())
    }

    /// Total units across all lines (the header badge).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0, |sum, line| sum.saturating_add(line.quantity))
    }

    /// Sum of line subtotals.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn out_of_range(&self, index: usize) -> CartError {
        CartError::IndexOutOfRange {
            index,
            len: self.lines.len(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::types::ProductId;

    fn product(id: &str, name: &str, price: Price, stock: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            price,
            category: "sneakers".to_string(),
            image_url: None,
            stock,
            sizes: vec!["M".to_string(), "L".to_string()],
            created_at: None,
        }
    }

    fn air_max() -> Product {
        product("p1", "Air Max", Price::from_units(120), 10)
    }

    fn gorra() -> Product {
        product("p2", "Gorra", Price::new(Decimal::new(1999, 2)), 3)
    }

    #[test]
    fn test_add_appends_new_line() {
        let mut cart = Cart::new();
        cart.add(&air_max(), "M");

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].size, "M");
        assert_eq!(cart.lines()[0].quantity, 1);
    }

    #[test]
    fn test_add_same_product_and_size_merges() {
        let mut cart = Cart::new();
        cart.add(&air_max(), "M");
        cart.add(&air_max(), "M");

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
        assert_eq!(cart.total(), Price::from_units(240));
    }

    #[test]
    fn test_add_same_product_other_size_is_new_line() {
        let mut cart = Cart::new();
        cart.add(&air_max(), "M");
        cart.add(&air_max(), "L");

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_add_merges_by_id_not_snapshot() {
        let mut cart = Cart::new();
        cart.add(&air_max(), "M");

        let mut repriced = air_max();
        repriced.price = Price::from_units(99);
        cart.add(&repriced, "M");

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
        assert_eq!(cart.lines()[0].product.price, Price::from_units(120));
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut cart = Cart::new();
        cart.add(&gorra(), "L");
        cart.add(&air_max(), "M");
        cart.add(&gorra(), "L");

        let names: Vec<&str> = cart.lines().iter().map(|l| l.product.name.as_str()).collect();
        assert_eq!(names, vec!["Gorra", "Air Max"]);
    }

    #[test]
    fn test_remove_first_line_keeps_rest() {
        let mut cart = Cart::new();
        cart.add(&air_max(), "M");
        cart.add(&gorra(), "L");

        let removed = cart.remove(0).unwrap();
        assert_eq!(removed.product.id.as_str(), "p1");
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].product.id.as_str(), "p2");
        assert_eq!(cart.lines()[0].size, "L");
    }

    #[test]
    fn test_remove_shrinks_by_one_and_keeps_order() {
        let mut cart = Cart::new();
        cart.add(&air_max(), "M");
        cart.add(&gorra(), "L");
        cart.add(&air_max(), "L");

        cart.remove(1).unwrap();
        let keys: Vec<(&str, &str)> = cart
            .lines()
            .iter()
            .map(|l| (l.product.id.as_str(), l.size.as_str()))
            .collect();
        assert_eq!(keys, vec![("p1", "M"), ("p1", "L")]);
    }

    #[test]
    fn test_remove_out_of_range_leaves_cart_intact() {
        let mut cart = Cart::new();
        cart.add(&air_max(), "M");
        let before = cart.clone();

        let err = cart.remove(1).unwrap_err();
        assert_eq!(err, CartError::IndexOutOfRange { index: 1, len: 1 });
        assert_eq!(cart, before);
    }

    #[test]
    fn test_update_quantity_sets_value() {
        let mut cart = Cart::new();
        cart.add(&air_max(), "M");

        cart.update_quantity(0, 4).unwrap();
        assert_eq!(cart.lines()[0].quantity, 4);
        assert_eq!(cart.item_count(), 4);
    }

    #[test]
    fn test_update_quantity_does_not_clamp_to_stock() {
        let mut cart = Cart::new();
        cart.add(&gorra(), "M");

        cart.update_quantity(0, 50).unwrap();
        assert_eq!(cart.lines()[0].quantity, 50);
    }

    #[test]
    fn test_update_quantity_rejects_zero() {
        let mut cart = Cart::new();
        cart.add(&air_max(), "M");

        assert_eq!(cart.update_quantity(0, 0), Err(CartError::ZeroQuantity));
        assert_eq!(cart.lines()[0].quantity, 1);
    }

    #[test]
    fn test_update_quantity_out_of_range() {
        let mut cart = Cart::new();
        assert_eq!(
            cart.update_quantity(0, 2),
            Err(CartError::IndexOutOfRange { index: 0, len: 0 })
        );
    }

    #[test]
    fn test_line_for_checks_identity() {
        let mut cart = Cart::new();
        cart.add(&air_max(), "M");
        cart.add(&gorra(), "L");

        assert_eq!(cart.line_for(1, "p2", "L").unwrap().product.name, "Gorra");
        assert_eq!(
            cart.line_for(0, "p2", "L"),
            Err(CartError::LineMismatch { index: 0 })
        );
        assert_eq!(
            cart.line_for(0, "p1", "L"),
            Err(CartError::LineMismatch { index: 0 })
        );
        assert_eq!(
            cart.line_for(2, "p2", "L"),
            Err(CartError::IndexOutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    fn test_line_for_rejects_position_after_removal() {
        let mut cart = Cart::new();
        cart.add(&air_max(), "M");
        cart.add(&gorra(), "L");
        cart.remove(0).unwrap();

        // Position 0 now holds the Gorra line
        assert!(cart.line_for(0, "p1", "M").is_err());
    }

    #[test]
    fn test_capped_quantity_respects_stock() {
        let mut cart = Cart::new();
        cart.add(&gorra(), "L");
        let line = &cart.lines()[0];

        assert_eq!(line.capped_quantity(2), 2);
        assert_eq!(line.capped_quantity(6), 3);
        assert_eq!(line.capped_quantity(4_000_000_000), 3);
        assert_eq!(line.capped_quantity(0), 0);
    }

    #[test]
    fn test_empty_cart_count_and_total() {
        let cart = Cart::new();
        assert_eq!(cart.item_count(), 0);
        assert_eq!(cart.total(), Price::ZERO);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_count_and_total_match_line_sums() {
        let mut cart = Cart::new();
        cart.add(&air_max(), "M");
        cart.add(&gorra(), "L");
        cart.add(&gorra(), "L");
        cart.update_quantity(0, 3).unwrap();

        let count: u32 = cart.lines().iter().map(|l| l.quantity).sum();
        let total: Price = cart.lines().iter().map(CartLine::subtotal).sum();
        assert_eq!(cart.item_count(), count);
        assert_eq!(cart.total(), total);
        assert_eq!(cart.total(), Price::new(Decimal::new(39998, 2)));
    }

    #[test]
    fn test_increment_is_capped_by_stock() {
        let mut cart = Cart::new();
        cart.add(&gorra(), "M");
        cart.update_quantity(0, 3).unwrap();

        assert_eq!(cart.lines()[0].incremented_quantity(), 3);
        cart.update_quantity(0, 2).unwrap();
        assert_eq!(cart.lines()[0].incremented_quantity(), 3);
    }

    #[test]
    fn test_increment_never_lowers_quantity_above_stock() {
        let mut cart = Cart::new();
        cart.add(&gorra(), "M");
        cart.update_quantity(0, 7).unwrap();

        assert_eq!(cart.lines()[0].incremented_quantity(), 7);
    }

    #[test]
    fn test_decrement_floors_at_one() {
        let mut cart = Cart::new();
        cart.add(&air_max(), "M");
        assert_eq!(cart.lines()[0].decremented_quantity(), 1);

        cart.update_quantity(0, 5).unwrap();
        assert_eq!(cart.lines()[0].decremented_quantity(), 4);
    }

    #[test]
    fn test_session_round_trip() {
        let mut cart = Cart::new();
        cart.add(&air_max(), "M");
        cart.add(&gorra(), "L");

        let json = serde_json::to_string(&cart).unwrap();
        let back: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cart);
    }
}
