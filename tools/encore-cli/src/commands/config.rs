//! Configuration commands.

use anyhow::Result;
use encore_shipping::PostalCode;
use serde::Serialize;
use storefront_api::{StoreConfig, StoreEnvironment};

use super::{ConfigArgs, ConfigCommand, Outcome};
use crate::context::Context;

/// Findings of a config check. Never carries secret values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigReport {
    pub source: String,
    pub environment: StoreEnvironment,
    pub shipping_api: String,
    pub payments_api: String,
    pub origin_postal_code: String,
    pub public_origin: Option<String>,
    pub missing: Vec<&'static str>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ConfigReport {
    pub fn is_valid(&self) -> bool {
        self.missing.is_empty() && self.errors.is_empty()
    }
}

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<Outcome> {
    match args.command {
        ConfigCommand::Check => check_config(ctx),
    }
}

fn check_config(ctx: &Context) -> Result<Outcome> {
    let report = check(&ctx.config, ctx.source.to_string());
    let outcome = if report.is_valid() {
        Outcome::Success
    } else {
        Outcome::Failure
    };

    if ctx.output.is_json() {
        ctx.output.json(&report);
        return Ok(outcome);
    }

    ctx.output.header("Validating configuration");
    ctx.output.kv("source", &report.source);
    let environment = match report.environment {
        StoreEnvironment::Production => "production",
        StoreEnvironment::Development => "development",
    };
    ctx.output.kv("environment", environment);
    ctx.output.kv("shipping api", &report.shipping_api);
    ctx.output.kv("payments api", &report.payments_api);
    ctx.output.kv("origin postal code", &report.origin_postal_code);
    ctx.output.kv(
        "public origin",
        report.public_origin.as_deref().unwrap_or("(from request)"),
    );

    for name in &report.missing {
        ctx.output
            .error(&format!("Missing credential: {}", name.to_ascii_uppercase()));
    }
    for error in &report.errors {
        ctx.output.error(&format!("Error: {}", error));
    }
    for warning in &report.warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    match (outcome, report.warnings.is_empty()) {
        (Outcome::Failure, _) => ctx.output.info("Configuration is incomplete"),
        (Outcome::Success, true) => ctx.output.success("Configuration is valid"),
        (Outcome::Success, false) => ctx.output.success("Configuration is valid (with warnings)"),
    }
    Ok(outcome)
}

/// Inspect a configuration.
pub fn check(config: &StoreConfig, source: String) -> ConfigReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if PostalCode::parse(&config.shipping.origin_postal_code).is_none() {
        errors.push(format!(
            "origin postal code '{}' must have 8 digits",
            config.shipping.origin_postal_code
        ));
    }
    if let Some(origin) = &config.public_origin {
        if !origin.starts_with("https://") && !origin.starts_with("http://") {
            errors.push(format!("public origin '{}' must be an http(s) URL", origin));
        }
    }
    if config.payments.statement_descriptor.trim().is_empty() {
        warnings.push("statement descriptor is empty".to_string());
    }
    if config.environment == StoreEnvironment::Development {
        warnings.push("development mode exposes provider error details".to_string());
    }

    ConfigReport {
        source,
        environment: config.environment,
        shipping_api: config.shipping.environment.base_url().to_string(),
        payments_api: config.payments.api_base.clone(),
        origin_postal_code: config.shipping.origin_postal_code.clone(),
        public_origin: config.public_origin.clone(),
        missing: config.missing_credentials(),
        errors,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encore_payments::PaymentConfig;
    use encore_shipping::ShippingConfig;

    #[test]
    fn test_check_reports_missing_credentials() {
        let report = check(&StoreConfig::default(), "environment variables".into());
        assert!(!report.is_valid());
        assert_eq!(report.missing, vec!["melhor_envio_token", "mp_access_token"]);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_check_valid_config() {
        let config = StoreConfig {
            shipping: ShippingConfig::default().with_token("me-secret"),
            payments: PaymentConfig::default().with_access_token("mp-secret"),
            public_origin: Some("https://loja.example".into()),
            ..Default::default()
        };
        let report = check(&config, "encore.toml".into());
        assert!(report.is_valid());

        let json = serde_json::to_string(&report).unwrap();
        assert!(!json.contains("me-secret"));
        assert!(!json.contains("mp-secret"));
    }

    #[test]
    fn test_check_flags_bad_values() {
        let config = StoreConfig {
            shipping: ShippingConfig::default()
                .with_token("t")
                .with_origin("1290"),
            payments: PaymentConfig::default().with_access_token("t"),
            public_origin: Some("loja.example".into()),
            environment: StoreEnvironment::Development,
        };
        let report = check(&config, "encore.toml".into());
        assert!(!report.is_valid());
        assert_eq!(report.errors.len(), 2);
        assert_eq!(report.warnings.len(), 1);
    }
}
