//! Quote responses.

use encore_commerce::cart::ShippingSelection;
use encore_commerce::{Currency, Money};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Carrier behind a service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Carrier {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub picture: Option<String>,
}

/// Price as the provider sends it: sometimes `"25.30"`, sometimes `25.3`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
enum WirePrice {
    Number(f64),
    Text(String),
}

impl WirePrice {
    fn value(&self) -> Option<f64> {
        let value = match self {
            WirePrice::Number(n) => Some(*n),
            WirePrice::Text(s) => s.trim().parse::<f64>().ok(),
        };
        value.filter(|v| v.is_finite())
    }
}

/// One quoted carrier service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingOption {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    price: Option<WirePrice>,
    #[serde(default)]
    custom_price: Option<WirePrice>,
    /// Estimated business days.
    #[serde(default)]
    pub delivery_time: Option<u32>,
    #[serde(default)]
    pub company: Option<Carrier>,
    /// Set when the service cannot deliver this shipment.
    #[serde(default)]
    pub error: Option<String>,
}

impl ShippingOption {
    /// Quoted price in reais.
    pub fn price_value(&self) -> Option<f64> {
        self.price.as_ref().and_then(WirePrice::value)
    }

    /// Price after the account's custom rules, when the provider sent one.
    pub fn custom_price_value(&self) -> Option<f64> {
        self.custom_price.as_ref().and_then(WirePrice::value)
    }

    /// What the buyer pays: the custom price, else the quoted price.
    pub fn charged_price(&self) -> Option<f64> {
        self.custom_price_value().or_else(|| self.price_value())
    }

    /// Whether this service can be chosen.
    pub fn is_available(&self) -> bool {
        self.error.is_none() && self.price_value().is_some()
    }

    /// Convert into the cart's shipping selection.
    pub fn to_selection(&self, currency: Currency) -> Option<ShippingSelection> {
        if !self.is_available() {
            return None;
        }
        let price = self.charged_price()?;
        Some(ShippingSelection {
            service_id: self.id,
            name: self.name.clone(),
            company: self.company.as_ref().map(|c| c.name.clone()),
            price: Money::from_decimal(price, currency),
            delivery_days: self.delivery_time,
        })
    }
}

/// A quote: the provider body verbatim plus the options parsed from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub raw: Value,
    pub options: Vec<ShippingOption>,
}

impl Quote {
    /// Parse options out of a provider body.
    ///
    /// The body is normally an array of services; entries that don't look
    /// like a service are kept in `raw` but skipped in `options`.
    pub fn from_value(raw: Value) -> Self {
        let options = match &raw {
            Value::Array(entries) => entries
                .iter()
                .filter_map(|e| serde_json::from_value(e.clone()).ok())
                .collect(),
            _ => Vec::new(),
        };
        Self { raw, options }
    }

    /// Options without an error.
    pub fn available(&self) -> impl Iterator<Item = &ShippingOption> {
        self.options.iter().filter(|o| o.is_available())
    }

    /// Cheapest available option by charged price.
    pub fn cheapest(&self) -> Option<&ShippingOption> {
        self.available().min_by(|a, b| {
            let a = a.charged_price().unwrap_or(f64::MAX);
            let b = b.charged_price().unwrap_or(f64::MAX);
            a.total_cmp(&b)
        })
    }

    /// Available option by service id.
    pub fn find(&self, service_id: i64) -> Option<&ShippingOption> {
        self.available().find(|o| o.id == service_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!([
            {
                "id": 1,
                "name": "PAC",
                "price": "25.30",
                "custom_price": "25.30",
                "delivery_time": 7,
                "company": {"id": 1, "name": "Correios", "picture": "https://x/correios.png"}
            },
            {
                "id": 2,
                "name": "SEDEX",
                "price": 45.9,
                "delivery_time": 2,
                "company": {"id": 1, "name": "Correios"}
            },
            {
                "id": 3,
                "name": ".Package",
                "error": "Transportadora não atende este trecho.",
                "company": {"id": 2, "name": "Jadlog"}
            },
            {"unexpected": true}
        ])
    }

    #[test]
    fn test_parse_options() {
        let quote = Quote::from_value(sample());
        assert_eq!(quote.options.len(), 3);
        assert_eq!(quote.options[0].price_value(), Some(25.30));
        assert_eq!(quote.options[1].price_value(), Some(45.9));
        assert!(!quote.options[2].is_available());
        assert_eq!(quote.available().count(), 2);
    }

    #[test]
    fn test_cheapest_skips_unavailable() {
        let quote = Quote::from_value(sample());
        assert_eq!(quote.cheapest().unwrap().name, "PAC");
        assert!(quote.find(3).is_none());
        assert_eq!(quote.find(2).unwrap().name, "SEDEX");
    }

    #[test]
    fn test_cheapest_uses_custom_price() {
        let quote = Quote::from_value(json!([
            {"id": 1, "name": "PAC", "price": "30.00", "custom_price": "31.00"},
            {"id": 2, "name": "Mini", "price": "35.00", "custom_price": "28.50"}
        ]));
        assert_eq!(quote.cheapest().unwrap().id, 2);
        assert_eq!(quote.options[0].charged_price(), Some(31.0));
    }

    #[test]
    fn test_to_selection() {
        let quote = Quote::from_value(sample());
        let selection = quote.find(1).unwrap().to_selection(Currency::BRL).unwrap();
        assert_eq!(selection.price.amount_cents, 2530);
        assert_eq!(selection.company.as_deref(), Some("Correios"));
        assert_eq!(selection.delivery_days, Some(7));
    }

    #[test]
    fn test_non_array_body_has_no_options() {
        let quote = Quote::from_value(json!({"message": "Unauthenticated."}));
        assert!(quote.options.is_empty());
        assert!(quote.cheapest().is_none());
    }
}
