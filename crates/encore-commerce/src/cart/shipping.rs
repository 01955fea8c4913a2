//! Shipping selection stored on the cart.

use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A carrier service chosen from a shipping quote.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShippingSelection {
    /// Provider service identifier.
    pub service_id: i64,
    /// Service name (e.g., "PAC", "SEDEX").
    pub name: String,
    /// Carrier name.
    pub company: Option<String>,
    /// Quoted price.
    pub price: Money,
    /// Estimated delivery time in business days.
    pub delivery_days: Option<u32>,
}

impl ShippingSelection {
    /// Get delivery estimate string.
    pub fn delivery_estimate(&self) -> Option<String> {
        match self.delivery_days {
            Some(1) => Some("1 dia útil".to_string()),
            Some(days) => Some(format!("{} dias úteis", days)),
            None => None,
        }
    }

    /// Check if this is free shipping.
    pub fn is_free(&self) -> bool {
        self.price.is_zero()
    }
}
