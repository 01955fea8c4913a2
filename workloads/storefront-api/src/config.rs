//! Storefront configuration.
//!
//! Settings come from a variable lookup: Spin variables inside the component,
//! environment variables (upper-cased names) everywhere else. The CLI can also
//! load the same structure from a TOML file.

use encore_payments::PaymentConfig;
use encore_shipping::{ShippingConfig, ShippingEnvironment};
use serde::{Deserialize, Serialize};

/// Variable names read by [`StoreConfig::from_lookup`].
pub mod vars {
    pub const MELHOR_ENVIO_TOKEN: &str = "melhor_envio_token";
    pub const ORIGIN_POSTAL_CODE: &str = "origin_postal_code";
    pub const MELHOR_ENVIO_ENVIRONMENT: &str = "melhor_envio_environment";
    pub const MP_ACCESS_TOKEN: &str = "mp_access_token";
    pub const STATEMENT_DESCRIPTOR: &str = "statement_descriptor";
    pub const STORE_ENVIRONMENT: &str = "store_environment";
    pub const PUBLIC_ORIGIN: &str = "public_origin";
}

/// Deployment mode of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreEnvironment {
    #[default]
    Production,
    Development,
}

impl StoreEnvironment {
    /// Parse a mode name; anything but `development` is production.
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("development") {
            StoreEnvironment::Development
        } else {
            StoreEnvironment::Production
        }
    }
}

/// Full storefront configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Melhor Envio settings.
    pub shipping: ShippingConfig,
    /// Mercado Pago settings.
    pub payments: PaymentConfig,
    /// Deployment mode.
    pub environment: StoreEnvironment,
    /// Public origin used for payment back URLs, e.g. `https://loja.example`.
    pub public_origin: Option<String>,
}

impl StoreConfig {
    /// Build a configuration from a variable lookup.
    ///
    /// Unset or blank variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut config = StoreConfig::default();

        if let Some(token) = get(vars::MELHOR_ENVIO_TOKEN) {
            config.shipping.token = Some(token);
        }
        if let Some(origin) = get(vars::ORIGIN_POSTAL_CODE) {
            config.shipping.origin_postal_code = origin;
        }
        if let Some(environment) = get(vars::MELHOR_ENVIO_ENVIRONMENT) {
            match ShippingEnvironment::from_name(&environment) {
                Some(environment) => config.shipping.environment = environment,
                None => tracing::warn!(
                    value = %environment,
                    "unknown shipping environment, keeping production"
                ),
            }
        }
        if let Some(token) = get(vars::MP_ACCESS_TOKEN) {
            config.payments.access_token = Some(token);
        }
        if let Some(descriptor) = get(vars::STATEMENT_DESCRIPTOR) {
            config.payments.statement_descriptor = descriptor;
        }
        if let Some(environment) = get(vars::STORE_ENVIRONMENT) {
            config.environment = StoreEnvironment::from_name(&environment);
        }
        config.public_origin = get(vars::PUBLIC_ORIGIN);

        config.apply_environment()
    }

    /// Build a configuration from the runtime's variables.
    pub fn from_runtime() -> Self {
        Self::from_lookup(variable)
    }

    /// Parse a TOML configuration.
    ///
    /// ```toml
    /// environment = "development"
    /// public_origin = "https://loja.example"
    ///
    /// [shipping]
    /// token = "..."
    /// environment = "sandbox"
    ///
    /// [payments]
    /// access_token = "TEST-..."
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        let config: StoreConfig = toml::from_str(content)?;
        Ok(config.apply_environment())
    }

    /// Names of credentials that are not configured.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.shipping.token().is_none() {
            missing.push(vars::MELHOR_ENVIO_TOKEN);
        }
        if self.payments.access_token().is_none() {
            missing.push(vars::MP_ACCESS_TOKEN);
        }
        missing
    }

    fn apply_environment(mut self) -> Self {
        if self.environment == StoreEnvironment::Development {
            self.payments.expose_provider_details = true;
        }
        self
    }
}

/// Read a configuration variable from the Spin runtime.
#[cfg(target_arch = "wasm32")]
pub fn variable(name: &str) -> Option<String> {
    spin_sdk::variables::get(name).ok()
}

/// Read a configuration variable from the environment (`NAME` upper-cased).
#[cfg(not(target_arch = "wasm32"))]
pub fn variable(name: &str) -> Option<String> {
    std::env::var(name.to_ascii_uppercase()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = StoreConfig::from_lookup(|_| None);
        assert!(config.shipping.token().is_none());
        assert_eq!(config.shipping.origin_postal_code, "12904290");
        assert_eq!(config.environment, StoreEnvironment::Production);
        assert!(!config.payments.expose_provider_details);
        assert_eq!(
            config.missing_credentials(),
            vec!["melhor_envio_token", "mp_access_token"]
        );
    }

    #[test]
    fn test_from_lookup() {
        let config = StoreConfig::from_lookup(lookup(&[
            ("melhor_envio_token", "me-token"),
            ("origin_postal_code", "01310-100"),
            ("melhor_envio_environment", "sandbox"),
            ("mp_access_token", "TEST-mp"),
            ("statement_descriptor", "ENCORE"),
            ("store_environment", "development"),
            ("public_origin", "https://loja.test"),
        ]));

        assert_eq!(config.shipping.token(), Some("me-token"));
        assert_eq!(config.shipping.origin_postal_code, "01310-100");
        assert_eq!(config.shipping.environment, ShippingEnvironment::Sandbox);
        assert_eq!(config.payments.access_token(), Some("TEST-mp"));
        assert_eq!(config.payments.statement_descriptor, "ENCORE");
        assert!(config.payments.expose_provider_details);
        assert_eq!(config.public_origin.as_deref(), Some("https://loja.test"));
        assert!(config.missing_credentials().is_empty());
    }

    #[test]
    fn test_blank_values_ignored() {
        let config = StoreConfig::from_lookup(lookup(&[
            ("melhor_envio_token", "  "),
            ("public_origin", ""),
        ]));
        assert!(config.shipping.token().is_none());
        assert!(config.public_origin.is_none());
    }

    #[test]
    fn test_from_toml() {
        let config = StoreConfig::from_toml_str(
            r#"
            environment = "development"

            [shipping]
            token = "me-token"
            environment = "sandbox"

            [payments]
            access_token = "TEST-mp"
            "#,
        )
        .unwrap();

        assert_eq!(config.shipping.environment, ShippingEnvironment::Sandbox);
        assert_eq!(config.shipping.origin_postal_code, "12904290");
        assert_eq!(config.payments.api_base, "https://api.mercadopago.com");
        assert!(config.payments.expose_provider_details);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(StoreConfig::from_toml_str("shipping = 3").is_err());
    }
}
