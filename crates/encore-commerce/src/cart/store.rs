//! Per-session cart persistence in the Key-Value store.

use crate::cart::Cart;
use crate::error::CommerceError;
use encore_cache::{cache_key, Cache, SessionId};

/// Loads and saves carts keyed by session id.
#[derive(Debug)]
pub struct CartStore {
    cache: Cache,
}

impl CartStore {
    /// Create a store over an open cache.
    pub fn new(cache: Cache) -> Self {
        Self { cache }
    }

    /// Open the default Key-Value store.
    pub fn open_default() -> Result<Self, CommerceError> {
        Ok(Self::new(Cache::open_default()?))
    }

    /// Load the session's cart; a missing entry is an empty cart.
    pub fn load(&self, session: &SessionId) -> Result<Cart, CommerceError> {
        Ok(self.cache.get(&Self::key(session))?.unwrap_or_default())
    }

    /// Persist the session's cart.
    pub fn save(&self, session: &SessionId, cart: &Cart) -> Result<(), CommerceError> {
        self.cache.set(&Self::key(session), cart)?;
        Ok(())
    }

    /// Drop the session's cart entirely.
    pub fn clear(&self, session: &SessionId) -> Result<(), CommerceError> {
        self.cache.delete(&Self::key(session))?;
        Ok(())
    }

    fn key(session: &SessionId) -> String {
        cache_key!("cart", session)
    }
}
