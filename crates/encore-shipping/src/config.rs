//! Shipping provider configuration.

use serde::{Deserialize, Serialize};

/// Melhor Envio environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShippingEnvironment {
    #[default]
    Production,
    Sandbox,
}

impl ShippingEnvironment {
    /// API base URL for this environment.
    pub fn base_url(&self) -> &'static str {
        match self {
            ShippingEnvironment::Production => "https://melhorenvio.com.br/api/v2",
            ShippingEnvironment::Sandbox => "https://sandbox.melhorenvio.com.br/api/v2",
        }
    }

    /// Parse a setting value; anything unrecognised is `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Some(ShippingEnvironment::Production),
            "sandbox" => Some(ShippingEnvironment::Sandbox),
            _ => None,
        }
    }
}

/// Melhor Envio client settings.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShippingConfig {
    /// Personal access token.
    pub token: Option<String>,
    /// Postal code parcels ship from.
    pub origin_postal_code: String,
    /// Production or sandbox.
    pub environment: ShippingEnvironment,
    /// Platform name reported with each quote.
    pub platform: String,
    /// Comma-separated service ids to quote.
    pub services: String,
    /// User-Agent sent to the provider.
    pub user_agent: String,
}

impl Default for ShippingConfig {
    fn default() -> Self {
        Self {
            token: None,
            origin_postal_code: "12904290".to_string(),
            environment: ShippingEnvironment::Production,
            platform: "Encore Store".to_string(),
            services: "1,2,3,4".to_string(),
            user_agent: "Aplicacao/1.0".to_string(),
        }
    }
}

impl ShippingConfig {
    /// Set the access token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the origin postal code.
    pub fn with_origin(mut self, postal_code: impl Into<String>) -> Self {
        self.origin_postal_code = postal_code.into();
        self
    }

    /// Set the environment.
    pub fn with_environment(mut self, environment: ShippingEnvironment) -> Self {
        self.environment = environment;
        self
    }

    /// Token, if set and non-empty.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.trim().is_empty())
    }

    /// Quote endpoint.
    pub fn calculate_url(&self) -> String {
        format!("{}/me/shipment/calculate", self.environment.base_url())
    }
}

impl std::fmt::Debug for ShippingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShippingConfig")
            .field("token", &self.token().map(|_| "<redacted>"))
            .field("origin_postal_code", &self.origin_postal_code)
            .field("environment", &self.environment)
            .field("platform", &self.platform)
            .field("services", &self.services)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ShippingConfig::default();
        assert_eq!(config.origin_postal_code, "12904290");
        assert_eq!(config.services, "1,2,3,4");
        assert_eq!(
            config.calculate_url(),
            "https://melhorenvio.com.br/api/v2/me/shipment/calculate"
        );
        assert!(config.token().is_none());
    }

    #[test]
    fn test_sandbox_url() {
        let config = ShippingConfig::default().with_environment(ShippingEnvironment::Sandbox);
        assert_eq!(
            config.calculate_url(),
            "https://sandbox.melhorenvio.com.br/api/v2/me/shipment/calculate"
        );
    }

    #[test]
    fn test_blank_token_is_unset() {
        let config = ShippingConfig::default().with_token("  ");
        assert!(config.token().is_none());
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = ShippingConfig::default().with_token("secret-token");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_environment_from_name() {
        assert_eq!(
            ShippingEnvironment::from_name("Sandbox"),
            Some(ShippingEnvironment::Sandbox)
        );
        assert_eq!(
            ShippingEnvironment::from_name("production"),
            Some(ShippingEnvironment::Production)
        );
        assert_eq!(ShippingEnvironment::from_name("staging"), None);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: ShippingConfig =
            serde_json::from_str(r#"{"environment": "sandbox"}"#).unwrap();
        assert_eq!(config.environment, ShippingEnvironment::Sandbox);
        assert_eq!(config.platform, "Encore Store");
    }
}
