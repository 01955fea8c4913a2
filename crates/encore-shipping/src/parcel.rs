//! Parcel normalization.
//!
//! The carrier rejects parcels below minimum sizes, so every input is
//! clamped before it is quoted. Missing and zero values are treated alike.

use encore_commerce::cart::CartParcel;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Lowest declared value the carrier accepts, in reais.
pub const MIN_DECLARED_VALUE: f64 = 17.0;

const DEFAULT_WIDTH: f64 = 20.0;
const DEFAULT_HEIGHT: f64 = 10.0;
const DEFAULT_LENGTH: f64 = 30.0;
const DEFAULT_WEIGHT: f64 = 0.5;

const MIN_WIDTH: f64 = 11.0;
const MIN_HEIGHT: f64 = 2.0;
const MIN_LENGTH: f64 = 16.0;
const MIN_WEIGHT: f64 = 0.3;

/// A parcel as sent by the browser or derived from the cart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParcelInput {
    /// Width in centimeters.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub width: Option<f64>,
    /// Height in centimeters.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub height: Option<f64>,
    /// Length in centimeters.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub length: Option<f64>,
    /// Weight in kilograms.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub weight: Option<f64>,
    /// Unit price in reais, used as insurance value.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: Option<f64>,
    /// Number of units.
    #[serde(default, deserialize_with = "lenient_u32")]
    pub quantity: Option<u32>,
}

impl ParcelInput {
    /// Read a browser parcel; anything that is not an object reads as empty.
    pub fn from_value(value: &Value) -> Self {
        Self::deserialize(value).unwrap_or_default()
    }
}

impl From<&CartParcel> for ParcelInput {
    fn from(parcel: &CartParcel) -> Self {
        Self {
            width: Some(parcel.dimensions.width_cm),
            height: Some(parcel.dimensions.height_cm),
            length: Some(parcel.dimensions.length_cm),
            weight: Some(parcel.dimensions.weight_kg),
            price: Some(parcel.unit_price.to_decimal()),
            quantity: u32::try_from(parcel.quantity).ok(),
        }
    }
}

/// A parcel as the provider expects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parcel {
    pub id: String,
    pub width: f64,
    pub height: f64,
    pub length: f64,
    pub weight: f64,
    pub insurance_value: f64,
    pub quantity: u32,
}

impl Parcel {
    /// Clamp an input to the carrier's limits.
    pub fn clamp(index: usize, input: &ParcelInput) -> Self {
        Self {
            id: index.to_string(),
            width: or_default(input.width, DEFAULT_WIDTH).max(MIN_WIDTH),
            height: or_default(input.height, DEFAULT_HEIGHT).max(MIN_HEIGHT),
            length: or_default(input.length, DEFAULT_LENGTH).max(MIN_LENGTH),
            weight: or_default(input.weight, DEFAULT_WEIGHT).max(MIN_WEIGHT),
            insurance_value: or_default(input.price, MIN_DECLARED_VALUE),
            quantity: quantity(input),
        }
    }

    /// Clamp a list of inputs, numbering them from zero.
    pub fn clamp_all(inputs: &[ParcelInput]) -> Vec<Self> {
        inputs
            .iter()
            .enumerate()
            .map(|(index, input)| Self::clamp(index, input))
            .collect()
    }
}

/// Total declared value of a shipment, never below [`MIN_DECLARED_VALUE`].
pub fn declared_value(inputs: &[ParcelInput]) -> f64 {
    let total: f64 = inputs
        .iter()
        .map(|p| or_default(p.price, MIN_DECLARED_VALUE) * f64::from(quantity(p)))
        .sum();
    total.max(MIN_DECLARED_VALUE)
}

/// Numbers and numeric strings are read; anything else is unset.
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number(&Value::deserialize(deserializer)?))
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number(&Value::deserialize(deserializer)?)
        .filter(|q| *q >= 1.0)
        .map(|q| q.min(f64::from(u32::MAX)) as u32))
}

fn or_default(value: Option<f64>, default: f64) -> f64 {
    match value {
        Some(v) if v != 0.0 && v.is_finite() => v,
        _ => default,
    }
}

fn quantity(input: &ParcelInput) -> u32 {
    match input.quantity {
        Some(q) if q > 0 => q,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encore_commerce::catalog::ParcelDimensions;
    use encore_commerce::{Currency, Money};

    #[test]
    fn test_empty_input_gets_defaults() {
        let parcel = Parcel::clamp(0, &ParcelInput::default());
        assert_eq!(parcel.id, "0");
        assert_eq!(parcel.width, 20.0);
        assert_eq!(parcel.height, 10.0);
        assert_eq!(parcel.length, 30.0);
        assert_eq!(parcel.weight, 0.5);
        assert_eq!(parcel.insurance_value, 17.0);
        assert_eq!(parcel.quantity, 1);
    }

    #[test]
    fn test_small_values_raised_to_minimum() {
        let input = ParcelInput {
            width: Some(5.0),
            height: Some(1.0),
            length: Some(10.0),
            weight: Some(0.1),
            price: Some(9.9),
            quantity: Some(3),
        };
        let parcel = Parcel::clamp(4, &input);
        assert_eq!(parcel.id, "4");
        assert_eq!(parcel.width, 11.0);
        assert_eq!(parcel.height, 2.0);
        assert_eq!(parcel.length, 16.0);
        assert_eq!(parcel.weight, 0.3);
        // insurance is not clamped per parcel
        assert_eq!(parcel.insurance_value, 9.9);
        assert_eq!(parcel.quantity, 3);
    }

    #[test]
    fn test_zero_treated_as_unset() {
        let input = ParcelInput {
            width: Some(0.0),
            weight: Some(0.0),
            quantity: Some(0),
            ..Default::default()
        };
        let parcel = Parcel::clamp(0, &input);
        assert_eq!(parcel.width, 20.0);
        assert_eq!(parcel.weight, 0.5);
        assert_eq!(parcel.quantity, 1);
    }

    #[test]
    fn test_declared_value() {
        let cheap = ParcelInput {
            price: Some(5.0),
            ..Default::default()
        };
        assert_eq!(declared_value(&[cheap]), 17.0);

        let vinyl = ParcelInput {
            price: Some(149.9),
            quantity: Some(2),
            ..Default::default()
        };
        let unpriced = ParcelInput::default();
        let value = declared_value(&[vinyl, unpriced]);
        assert!((value - (299.8 + 17.0)).abs() < 1e-9);
    }

    #[test]
    fn test_from_cart_parcel() {
        let parcel = CartParcel {
            dimensions: ParcelDimensions {
                width_cm: 32.0,
                height_cm: 2.0,
                length_cm: 32.0,
                weight_kg: 0.4,
            },
            unit_price: Money::new(14990, Currency::BRL),
            quantity: 2,
        };
        let input = ParcelInput::from(&parcel);
        assert_eq!(input.width, Some(32.0));
        assert_eq!(input.price, Some(149.9));
        assert_eq!(input.quantity, Some(2));
    }

    #[test]
    fn test_deserialize_partial_browser_parcel() {
        let input: ParcelInput =
            serde_json::from_str(r#"{"width": 15, "price": 89.9}"#).unwrap();
        assert_eq!(input.width, Some(15.0));
        assert_eq!(input.quantity, None);
    }

    #[test]
    fn test_deserialize_loose_fields() {
        let input = ParcelInput::from_value(&serde_json::json!({
            "width": "15.5",
            "weight": null,
            "length": "abc",
            "price": " 89.90 ",
            "quantity": -1
        }));
        assert_eq!(input.width, Some(15.5));
        assert_eq!(input.weight, None);
        assert_eq!(input.length, None);
        assert_eq!(input.price, Some(89.9));
        assert_eq!(input.quantity, None);

        let input = ParcelInput::from_value(&serde_json::json!({"quantity": "2"}));
        assert_eq!(input.quantity, Some(2));
    }

    #[test]
    fn test_non_object_parcel_reads_as_empty() {
        assert_eq!(ParcelInput::from_value(&serde_json::json!(42)), ParcelInput::default());
        assert_eq!(Parcel::clamp(0, &ParcelInput::from_value(&Value::Null)).quantity, 1);
    }
}
