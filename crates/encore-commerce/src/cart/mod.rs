//! Shopping cart module.
//!
//! Contains the slug-keyed cart, its pricing summary, the selected shipping
//! option and (with the `storage` feature) per-session persistence.

mod cart;
mod shipping;
mod summary;

#[cfg(feature = "storage")]
mod store;

pub use cart::{Cart, CartItem, CartParcel, MAX_QUANTITY_PER_ITEM};
pub use shipping::ShippingSelection;
pub use summary::{CartSummary, PIX_DISCOUNT_PERCENT};

#[cfg(feature = "storage")]
pub use store::CartStore;
