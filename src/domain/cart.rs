//! Client cart: an ordered list of line snapshots, the single source of
//! truth between browsing and checkout.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A line snapshots the product's name, already-discounted price and image at
/// add time; it is not reconciled against live product data until checkout.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: Uuid,
    pub name: String,
    pub unit_price: Decimal,
    pub image: Option<String>,
    pub quantity: u32,
}

#[derive(Clone, Debug, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<CartLine> {
        self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of pieces across all lines, shown by cart-count badges.
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Adds a snapshot line, merging by product id: adding an already-carted
    /// product increments its quantity instead of creating a duplicate line.
    pub fn add(&mut self, line: CartLine) {
        match self.lines.iter_mut().find(|l| l.product_id == line.product_id) {
            Some(existing) => existing.quantity += line.quantity,
            None => self.lines.push(line),
        }
    }

    /// Applies a signed quantity delta with a floor of 1. Dropping a line is
    /// only possible through [`Cart::remove`].
    pub fn adjust_quantity(&mut self, product_id: Uuid, delta: i32) -> bool {
        match self.lines.iter_mut().find(|l| l.product_id == product_id) {
            Some(line) => {
                line.quantity = (line.quantity as i64 + delta as i64).max(1) as u32;
                true
            }
            None => false,
        }
    }

    /// Deletes the line entirely regardless of quantity.
    pub fn remove(&mut self, product_id: Uuid) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);
        self.lines.len() != before
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget(id: Uuid, qty: u32) -> CartLine {
        CartLine {
            product_id: id,
            name: "Widget".into(),
            unit_price: Decimal::new(1000, 2),
            image: None,
            quantity: qty,
        }
    }

    #[test]
    fn add_merges_by_product_id() {
        let id = Uuid::new_v4();
        let mut cart = Cart::default();
        cart.add(widget(id, 1));
        cart.add(widget(id, 1));
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
    }

    #[test]
    fn quantity_never_drops_below_one() {
        let id = Uuid::new_v4();
        let mut cart = Cart::default();
        cart.add(widget(id, 3));
        assert!(cart.adjust_quantity(id, -5));
        assert_eq!(cart.lines()[0].quantity, 1);
    }

    #[test]
    fn adjust_on_unknown_product_is_a_noop() {
        let mut cart = Cart::default();
        cart.add(widget(Uuid::new_v4(), 1));
        assert!(!cart.adjust_quantity(Uuid::new_v4(), 1));
        assert_eq!(cart.lines()[0].quantity, 1);
    }

    #[test]
    fn remove_deletes_line_regardless_of_quantity() {
        let id = Uuid::new_v4();
        let mut cart = Cart::default();
        cart.add(widget(id, 7));
        assert!(cart.remove(id));
        assert!(cart.is_empty());
        assert!(!cart.remove(id));
    }

    #[test]
    fn item_count_sums_quantities() {
        let mut cart = Cart::default();
        cart.add(widget(Uuid::new_v4(), 2));
        cart.add(widget(Uuid::new_v4(), 3));
        assert_eq!(cart.item_count(), 5);
    }
}
