//! Key-Value store wrapper with automatic serialization.

use crate::CacheError;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

type MemoryMap = Arc<Mutex<HashMap<String, Vec<u8>>>>;

/// Process-wide store returned by `open_default` outside of Spin.
#[cfg(not(target_arch = "wasm32"))]
static DEFAULT_MEMORY: std::sync::OnceLock<MemoryMap> = std::sync::OnceLock::new();

enum Backend {
    #[cfg(target_arch = "wasm32")]
    Spin(spin_sdk::key_value::Store),
    Memory(MemoryMap),
}

/// Type-safe cache with JSON serialization.
pub struct Cache {
    backend: Backend,
}

impl Cache {
    /// Open the default Key-Value store.
    #[cfg(target_arch = "wasm32")]
    pub fn open_default() -> Result<Self, CacheError> {
        let store = spin_sdk::key_value::Store::open_default()
            .map_err(|e| CacheError::OpenError(e.to_string()))?;
        Ok(Self {
            backend: Backend::Spin(store),
        })
    }

    /// Open a named Key-Value store.
    #[cfg(target_arch = "wasm32")]
    pub fn open(name: &str) -> Result<Self, CacheError> {
        let store = spin_sdk::key_value::Store::open(name)
            .map_err(|e| CacheError::OpenError(e.to_string()))?;
        Ok(Self {
            backend: Backend::Spin(store),
        })
    }

    /// Open the default store.
    ///
    /// Outside of Spin this is a process-wide in-memory map, so every call
    /// sees the same data.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn open_default() -> Result<Self, CacheError> {
        let map = DEFAULT_MEMORY.get_or_init(MemoryMap::default).clone();
        Ok(Self {
            backend: Backend::Memory(map),
        })
    }

    /// Open a named store. Outside of Spin each call gets a fresh map.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn open(_name: &str) -> Result<Self, CacheError> {
        Ok(Self::in_memory())
    }

    /// Create an isolated in-memory cache.
    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(MemoryMap::default()),
        }
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let cart: Option<Cart> = cache.get("cart:sess_abc")?;
    /// ```
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.get_raw(key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Set a value in the cache.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(value)?;
        match &self.backend {
            #[cfg(target_arch = "wasm32")]
            Backend::Spin(store) => store
                .set(key, &bytes)
                .map_err(|e| CacheError::StoreError(e.to_string())),
            Backend::Memory(map) => {
                lock(map)?.insert(key.to_string(), bytes);
                Ok(())
            }
        }
    }

    /// Delete a value from the cache.
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        match &self.backend {
            #[cfg(target_arch = "wasm32")]
            Backend::Spin(store) => store
                .delete(key)
                .map_err(|e| CacheError::StoreError(e.to_string())),
            Backend::Memory(map) => {
                lock(map)?.remove(key);
                Ok(())
            }
        }
    }

    /// Check if a key exists in the cache.
    pub fn exists(&self, key: &str) -> Result<bool, CacheError> {
        match &self.backend {
            #[cfg(target_arch = "wasm32")]
            Backend::Spin(store) => store
                .exists(key)
                .map_err(|e| CacheError::StoreError(e.to_string())),
            Backend::Memory(map) => Ok(lock(map)?.contains_key(key)),
        }
    }

    /// Get all keys in the cache.
    pub fn keys(&self) -> Result<Vec<String>, CacheError> {
        match &self.backend {
            #[cfg(target_arch = "wasm32")]
            Backend::Spin(store) => store
                .get_keys()
                .map_err(|e| CacheError::StoreError(e.to_string())),
            Backend::Memory(map) => {
                let mut keys: Vec<String> = lock(map)?.keys().cloned().collect();
                keys.sort();
                Ok(keys)
            }
        }
    }

    fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        match &self.backend {
            #[cfg(target_arch = "wasm32")]
            Backend::Spin(store) => store
                .get(key)
                .map_err(|e| CacheError::StoreError(e.to_string())),
            Backend::Memory(map) => Ok(lock(map)?.get(key).cloned()),
        }
    }
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let backend = match &self.backend {
            #[cfg(target_arch = "wasm32")]
            Backend::Spin(_) => "spin",
            Backend::Memory(_) => "memory",
        };
        f.debug_struct("Cache").field("backend", &backend).finish()
    }
}

fn lock(
    map: &MemoryMap,
) -> Result<std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>>, CacheError> {
    map.lock()
        .map_err(|_| CacheError::StoreError("in-memory store poisoned".to_string()))
}

/// Helper to build cache keys with namespacing.
///
/// # Example
///
/// ```rust,ignore
/// let key = cache_key!("cart", session_id);
/// // Returns "cart:sess_..."
/// ```
#[macro_export]
macro_rules! cache_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}
