//! Key-Value caching layer for the Encore storefront.
//!
//! Values are stored as JSON. Inside a Spin component the cache is backed by
//! Spin's Key-Value Store; everywhere else (native builds, tests) an
//! in-memory map stands in for it.
//!
//! # Example
//!
//! ```rust,ignore
//! use encore_cache::{cache_key, Cache, SessionId};
//!
//! let cache = Cache::open_default()?;
//! let session = SessionId::generate();
//!
//! cache.set(&cache_key!("cart", session), &cart)?;
//! let cart: Option<Cart> = cache.get(&cache_key!("cart", session))?;
//! ```

mod error;
mod kv;
mod session;

pub use error::CacheError;
pub use kv::Cache;
pub use session::SessionId;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, SessionId};
}
