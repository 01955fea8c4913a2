//! Cart pricing summary.

use crate::cart::ShippingSelection;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Discount applied when paying with Pix.
pub const PIX_DISCOUNT_PERCENT: f64 = 1.0;

/// Complete pricing breakdown for a cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartSummary {
    /// Sum of quantities.
    pub total_items: i64,
    /// Items total before shipping.
    pub subtotal: Money,
    /// Selected shipping option, if any.
    pub shipping: Option<ShippingSelection>,
    /// Subtotal plus shipping.
    pub grand_total: Money,
    /// Grand total with the Pix discount.
    pub pix_total: Money,
}

impl CartSummary {
    /// Build a summary; the Pix total is derived from the grand total.
    pub fn new(
        total_items: i64,
        subtotal: Money,
        shipping: Option<ShippingSelection>,
        grand_total: Money,
    ) -> Self {
        Self {
            total_items,
            subtotal,
            shipping,
            grand_total,
            pix_total: grand_total.percentage_off(PIX_DISCOUNT_PERCENT),
        }
    }

    /// Shipping price, zero when nothing is selected.
    pub fn shipping_total(&self) -> Money {
        self.shipping
            .as_ref()
            .map(|s| s.price)
            .unwrap_or_else(|| Money::zero(self.subtotal.currency))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    #[test]
    fn test_pix_total() {
        let summary = CartSummary::new(
            1,
            Money::new(10000, Currency::BRL),
            None,
            Money::new(10000, Currency::BRL),
        );
        assert_eq!(summary.pix_total.amount_cents, 9900);
        assert!(summary.shipping_total().is_zero());
    }

    #[test]
    fn test_shipping_total() {
        let shipping = ShippingSelection {
            service_id: 1,
            name: "PAC".to_string(),
            company: None,
            price: Money::new(2000, Currency::BRL),
            delivery_days: None,
        };
        let summary = CartSummary::new(
            2,
            Money::new(10000, Currency::BRL),
            Some(shipping),
            Money::new(12000, Currency::BRL),
        );
        assert_eq!(summary.shipping_total().amount_cents, 2000);
        assert_eq!(summary.pix_total.amount_cents, 11880);
    }
}
