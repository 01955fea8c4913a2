//! Cart and cart item types.

use crate::cart::{CartSummary, ShippingSelection, PIX_DISCOUNT_PERCENT};
use crate::catalog::{ParcelDimensions, Product};
use crate::error::CommerceError;
use crate::ids::{ProductId, ProductSlug};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Maximum quantity allowed per cart item.
pub const MAX_QUANTITY_PER_ITEM: i64 = 99;

/// A shopping cart.
///
/// Items are kept in the order they were first added and are keyed by
/// product slug: adding a slug that is already present bumps its quantity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Cart {
    /// Items in the cart.
    pub items: Vec<CartItem>,
    /// Shipping option chosen for the current items.
    #[serde(default)]
    pub shipping: Option<ShippingSelection>,
    /// Cart currency.
    #[serde(default)]
    pub currency: Currency,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of a product.
    ///
    /// Returns the new quantity for that slug.
    pub fn add(&mut self, product: &Product) -> Result<i64, CommerceError> {
        if product.price.currency != self.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: product.price.currency.code().to_string(),
            });
        }

        let quantity = match self.items.iter_mut().find(|i| i.slug == product.slug) {
            Some(existing) => {
                let new_quantity = existing
                    .quantity
                    .checked_add(1)
                    .ok_or(CommerceError::Overflow)?;
                if new_quantity > MAX_QUANTITY_PER_ITEM {
                    return Err(CommerceError::QuantityExceedsLimit(
                        new_quantity,
                        MAX_QUANTITY_PER_ITEM,
                    ));
                }
                existing.quantity = new_quantity;
                new_quantity
            }
            None => {
                self.items.push(CartItem::from_product(product, 1));
                1
            }
        };

        self.shipping = None;
        Ok(quantity)
    }

    /// Remove a product from the cart.
    pub fn remove(&mut self, slug: &ProductSlug) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| &i.slug != slug);
        let removed = self.items.len() < len_before;
        if removed {
            self.shipping = None;
        }
        removed
    }

    /// Clear all items and the shipping selection.
    pub fn clear(&mut self) {
        self.items.clear();
        self.shipping = None;
    }

    /// Store the shipping option chosen for the current items.
    pub fn select_shipping(&mut self, selection: ShippingSelection) -> Result<(), CommerceError> {
        if selection.price.currency != self.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: selection.price.currency.code().to_string(),
            });
        }
        self.shipping = Some(selection);
        Ok(())
    }

    /// Total item count (sum of quantities).
    pub fn total_items(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get an item by slug.
    pub fn get(&self, slug: &ProductSlug) -> Option<&CartItem> {
        self.items.iter().find(|i| &i.slug == slug)
    }

    /// Sum of unit price times quantity over all items.
    pub fn subtotal(&self) -> Result<Money, CommerceError> {
        self.items
            .iter()
            .try_fold(Money::zero(self.currency), |acc, item| {
                acc.checked_add(&item.total_price()?)
            })
    }

    /// Subtotal plus the selected shipping price.
    pub fn grand_total(&self) -> Result<Money, CommerceError> {
        let subtotal = self.subtotal()?;
        match &self.shipping {
            Some(selection) => subtotal.checked_add(&selection.price),
            None => Ok(subtotal),
        }
    }

    /// Grand total with the Pix discount.
    pub fn pix_total(&self) -> Result<Money, CommerceError> {
        Ok(self.grand_total()?.percentage_off(PIX_DISCOUNT_PERCENT))
    }

    /// One parcel line per cart item, for shipping quotes.
    pub fn parcels(&self) -> Vec<CartParcel> {
        self.items
            .iter()
            .map(|item| CartParcel {
                dimensions: item.dimensions,
                unit_price: item.unit_price,
                quantity: item.quantity,
            })
            .collect()
    }

    /// Compute the full pricing summary.
    pub fn summary(&self) -> Result<CartSummary, CommerceError> {
        let subtotal = self.subtotal()?;
        let grand_total = self.grand_total()?;
        Ok(CartSummary::new(
            self.total_items(),
            subtotal,
            self.shipping.clone(),
            grand_total,
        ))
    }
}

/// A product line in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    /// Product slug (cart key).
    pub slug: ProductSlug,
    /// Product ID.
    pub product_id: ProductId,
    /// Product name (denormalized for display and payment descriptions).
    pub name: String,
    /// Unit price at the time the product was added.
    pub unit_price: Money,
    /// Product image.
    pub image: Option<String>,
    /// Parcel dimensions of one unit.
    pub dimensions: ParcelDimensions,
    /// Quantity.
    pub quantity: i64,
}

impl CartItem {
    /// Snapshot a product into a cart item.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        Self {
            slug: product.slug.clone(),
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.price,
            image: product.image.clone(),
            dimensions: product.dimensions,
            quantity,
        }
    }

    /// Unit price times quantity.
    pub fn total_price(&self) -> Result<Money, CommerceError> {
        self.unit_price.checked_mul(self.quantity)
    }
}

/// Physical and declared-value data for one cart line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartParcel {
    /// Dimensions of one unit.
    pub dimensions: ParcelDimensions,
    /// Declared value of one unit.
    pub unit_price: Money,
    /// Number of units.
    pub quantity: i64,
}
