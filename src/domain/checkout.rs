//! Checkout rules that sit between the cart and the pricing engine.

/// Single-item mode lets the buyer pick a quantity, bounded by current
/// stock: the result is always within `[1, stock]`. A product listed with no
/// stock still yields 1 so the attempt fails at the stock decrement rather
/// than producing a zero-quantity order.
pub fn clamp_quantity(requested: u32, stock: i32) -> u32 {
    let ceiling = stock.max(1) as u32;
    requested.clamp(1, ceiling)
}

/// Interprets the guarded decrement
/// (`UPDATE ... SET stock = stock - n WHERE id = ? AND stock >= n`):
/// zero affected rows means stock was insufficient at commit time, and the
/// order transaction must be aborted rather than committed undersold.
pub fn stock_decremented(rows_affected: u64) -> bool {
    rows_affected == 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pricing::{price_order, PricedLine};
    use rust_decimal::Decimal;

    #[test]
    fn quantity_is_clamped_to_stock() {
        assert_eq!(clamp_quantity(5, 3), 3);
        assert_eq!(clamp_quantity(0, 3), 1);
        assert_eq!(clamp_quantity(2, 3), 2);
        assert_eq!(clamp_quantity(4, 0), 1);
    }

    #[test]
    fn oversell_attempt_fails_the_stock_guard() {
        // A cart holding 5 pieces against a stock of 3 leaves the guarded
        // UPDATE matching no row; the zero count must abort the order.
        assert!(!stock_decremented(0));
        assert!(stock_decremented(1));
    }

    #[test]
    fn single_product_checkout_totals() {
        // 100.00 at 10% item discount, quantity 2, no promo, free shipping.
        let line = PricedLine {
            unit_price: Decimal::new(10000, 2),
            discount_percent: Decimal::new(10, 0),
            quantity: clamp_quantity(2, 10),
        };
        let totals = price_order(&[line], None, Decimal::ZERO).unwrap();
        assert_eq!(totals.subtotal, Decimal::new(18000, 2));
        assert_eq!(totals.total, Decimal::new(18000, 2));
    }
}
