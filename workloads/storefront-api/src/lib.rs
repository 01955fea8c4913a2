//! Storefront API - the server side of the Encore store.
//!
//! This workload serves the JSON API behind the storefront pages:
//! - Slug-keyed cart persisted per session in the key-value store
//! - Shipping quotes against Melhor Envio, for raw parcels or the cart
//! - Mercado Pago checkout preferences, Pix and card payments, status lookups
//! - Payment notification webhook
//!
//! Handlers work on [`ApiRequest`]/[`ApiResponse`], so the whole app runs
//! natively in tests with a mock transport and an in-memory cache. The Spin
//! entry point only converts to and from those types.

mod app;
mod config;
mod error;
mod handlers;
mod logging;
mod request;
mod response;
mod router;
mod session;

#[cfg(target_arch = "wasm32")]
mod spin;

pub use app::{StorefrontApp, CATALOG_TOML, DEFAULT_ORIGIN};
pub use config::{variable, vars, StoreConfig, StoreEnvironment};
pub use error::ApiError;
pub use handlers::cart::CartView;
pub use logging::init as init_logging;
pub use request::{ApiRequest, REQUEST_ID_HEADER};
pub use response::{ApiResponse, SHIPPING_CORS_HEADERS};
pub use router::Route;
pub use session::{Session, SESSION_COOKIE};
