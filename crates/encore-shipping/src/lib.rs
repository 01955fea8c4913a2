//! Melhor Envio shipping quotes.
//!
//! Turns storefront parcels into a `/me/shipment/calculate` request, clamps
//! them to the carrier's minimum sizes, and maps provider failures to JSON
//! error bodies the storefront can return as-is.
//!
//! # Example
//!
//! ```rust,ignore
//! use encore_shipping::{ParcelInput, ShippingClient, ShippingConfig};
//!
//! let config = ShippingConfig::default().with_token(token);
//! let client = ShippingClient::new(config, transport);
//!
//! let quote = client
//!     .calculate("01310-100", &[ParcelInput::from(&cart_parcel)])
//!     .await?;
//! if let Some(option) = quote.cheapest() {
//!     println!("{} {}", option.name, option.price_value().unwrap_or_default());
//! }
//! ```

mod client;
mod config;
mod error;
mod parcel;
mod postal;
mod quote;

pub use client::ShippingClient;
pub use config::{ShippingConfig, ShippingEnvironment};
pub use error::ShippingError;
pub use parcel::{declared_value, Parcel, ParcelInput, MIN_DECLARED_VALUE};
pub use postal::PostalCode;
pub use quote::{Carrier, Quote, ShippingOption};
