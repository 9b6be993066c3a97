//! Order pricing: the deterministic computation that turns line items, an
//! optional promo code and a shipping cost into a payable total.
//!
//! All arithmetic is exact decimal; figures are rounded to two places only
//! when an order is persisted or presented, never in between, so rounding
//! error cannot compound across line items.

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    #[error("line item has a negative unit price")]
    NegativeUnitPrice,

    #[error("line item quantity must be at least 1")]
    ZeroQuantity,

    #[error("item discount percent must be within 0..=100")]
    ItemDiscountOutOfRange,

    #[error("promo discount percent must be within 1..=100")]
    PromoDiscountOutOfRange,

    #[error("shipping cost cannot be negative")]
    NegativeShipping,
}

/// One line of an order as the engine sees it. `discount_percent` is the
/// item's own discount, applied before quantity multiplication and never
/// compounded per item with the promo discount.
#[derive(Clone, Copy, Debug)]
pub struct PricedLine {
    pub unit_price: Decimal,
    pub discount_percent: Decimal,
    pub quantity: u32,
}

#[derive(Clone, Copy, Debug)]
pub struct PromoDiscount {
    pub discount_percent: Decimal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub promo_discount: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
}

/// Unit price after the item's own discount. Derived on demand, never stored.
pub fn effective_unit_price(unit_price: Decimal, discount_percent: Decimal) -> Decimal {
    unit_price * (Decimal::ONE - discount_percent / Decimal::ONE_HUNDRED)
}

/// Computes subtotal, promo discount and grand total for an order.
///
/// The promo percentage is applied once to the already item-discounted
/// subtotal. Because the promo percent is constrained to (0, 100], the promo
/// discount can never exceed the subtotal, so the total is never negative
/// and no clamping is performed.
pub fn price_order(
    lines: &[PricedLine],
    promo: Option<PromoDiscount>,
    shipping: Decimal,
) -> Result<OrderTotals, PricingError> {
    if shipping < Decimal::ZERO {
        return Err(PricingError::NegativeShipping);
    }

    let mut subtotal = Decimal::ZERO;
    for line in lines {
        if line.unit_price < Decimal::ZERO {
            return Err(PricingError::NegativeUnitPrice);
        }
        if line.quantity == 0 {
            return Err(PricingError::ZeroQuantity);
        }
        if line.discount_percent < Decimal::ZERO || line.discount_percent > Decimal::ONE_HUNDRED {
            return Err(PricingError::ItemDiscountOutOfRange);
        }
        subtotal += effective_unit_price(line.unit_price, line.discount_percent)
            * Decimal::from(line.quantity);
    }

    let promo_discount = match promo {
        Some(p) => {
            if p.discount_percent <= Decimal::ZERO || p.discount_percent > Decimal::ONE_HUNDRED {
                return Err(PricingError::PromoDiscountOutOfRange);
            }
            subtotal * p.discount_percent / Decimal::ONE_HUNDRED
        }
        None => Decimal::ZERO,
    };

    Ok(OrderTotals {
        subtotal,
        promo_discount,
        shipping,
        total: subtotal - promo_discount + shipping,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: i64, scale: u32) -> Decimal {
        Decimal::new(value, scale)
    }

    fn line(price: Decimal, discount: Decimal, qty: u32) -> PricedLine {
        PricedLine {
            unit_price: price,
            discount_percent: discount,
            quantity: qty,
        }
    }

    #[test]
    fn promo_twenty_on_hundred_free_shipping() {
        let lines = [line(dec(10000, 2), Decimal::ZERO, 1)];
        let promo = PromoDiscount {
            discount_percent: dec(20, 0),
        };
        let totals = price_order(&lines, Some(promo), Decimal::ZERO).unwrap();
        assert_eq!(totals.subtotal, dec(10000, 2));
        assert_eq!(totals.promo_discount, dec(2000, 2));
        assert_eq!(totals.total, dec(8000, 2));
    }

    #[test]
    fn no_promo_with_paid_shipping() {
        let lines = [line(dec(25000, 2), Decimal::ZERO, 1)];
        let totals = price_order(&lines, None, dec(3000, 2)).unwrap();
        assert_eq!(totals.subtotal, dec(25000, 2));
        assert_eq!(totals.promo_discount, Decimal::ZERO);
        assert_eq!(totals.total, dec(28000, 2));
    }

    #[test]
    fn item_discount_applies_before_quantity() {
        // 100.00 at 10% off, quantity 2 => 180.00
        let lines = [line(dec(10000, 2), dec(10, 0), 2)];
        let totals = price_order(&lines, None, Decimal::ZERO).unwrap();
        assert_eq!(totals.subtotal, dec(18000, 2));
        assert_eq!(totals.total, dec(18000, 2));
    }

    #[test]
    fn subtotal_sums_mixed_lines_exactly() {
        let lines = [
            line(dec(1999, 2), dec(15, 0), 3),  // 16.9915 * 3 = 50.9745
            line(dec(500, 2), Decimal::ZERO, 2), // 10.00
        ];
        let totals = price_order(&lines, None, Decimal::ZERO).unwrap();
        // Intermediates stay exact; rounding to 2 dp happens only at the edge.
        assert_eq!(totals.subtotal, dec(609745, 4));
        assert_eq!(totals.subtotal.round_dp(2), dec(6097, 2));
    }

    #[test]
    fn hundred_percent_promo_leaves_shipping_only() {
        let lines = [line(dec(5000, 2), Decimal::ZERO, 1)];
        let promo = PromoDiscount {
            discount_percent: Decimal::ONE_HUNDRED,
        };
        let totals = price_order(&lines, Some(promo), dec(1500, 2)).unwrap();
        assert_eq!(totals.total, dec(1500, 2));
    }

    #[test]
    fn rejects_contract_violations() {
        assert_eq!(
            price_order(&[line(dec(-100, 2), Decimal::ZERO, 1)], None, Decimal::ZERO),
            Err(PricingError::NegativeUnitPrice)
        );
        assert_eq!(
            price_order(&[line(dec(100, 2), Decimal::ZERO, 0)], None, Decimal::ZERO),
            Err(PricingError::ZeroQuantity)
        );
        assert_eq!(
            price_order(&[line(dec(100, 2), dec(101, 0), 1)], None, Decimal::ZERO),
            Err(PricingError::ItemDiscountOutOfRange)
        );
        let too_big = PromoDiscount {
            discount_percent: dec(101, 0),
        };
        assert_eq!(
            price_order(&[line(dec(100, 2), Decimal::ZERO, 1)], Some(too_big), Decimal::ZERO),
            Err(PricingError::PromoDiscountOutOfRange)
        );
        assert_eq!(
            price_order(&[], None, dec(-1, 0)),
            Err(PricingError::NegativeShipping)
        );
    }

    #[test]
    fn empty_order_is_just_shipping() {
        let totals = price_order(&[], None, dec(3000, 2)).unwrap();
        assert_eq!(totals.subtotal, Decimal::ZERO);
        assert_eq!(totals.total, dec(3000, 2));
    }
}
