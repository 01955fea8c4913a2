//! The storefront application.

use crate::handlers;
use crate::request::REQUEST_ID_HEADER;
use crate::{ApiError, ApiRequest, ApiResponse, Route, Session, StoreConfig};
use encore_cache::Cache;
use encore_commerce::cart::CartStore;
use encore_commerce::catalog::Catalog;
use encore_data::Transport;
use encore_payments::PaymentClient;
use encore_shipping::ShippingClient;
use http::Method;
use std::sync::Arc;
use tracing::Instrument;

/// Catalog compiled into the component.
pub const CATALOG_TOML: &str = include_str!("../catalog.toml");

/// Fallback origin when the request carries no host.
pub const DEFAULT_ORIGIN: &str = "http://localhost:3000";

/// Routes API requests to the cart, shipping and payment handlers.
///
/// # Example
///
/// ```rust,ignore
/// let app = StorefrontApp::new(config, catalog, Cache::in_memory(), transport);
/// let response = app
///     .handle(ApiRequest::new(Method::GET, "/api/products"))
///     .await;
/// assert_eq!(response.status, 200);
/// ```
#[derive(Debug)]
pub struct StorefrontApp {
    pub(crate) config: StoreConfig,
    pub(crate) catalog: Catalog,
    pub(crate) carts: CartStore,
    pub(crate) shipping: ShippingClient,
    pub(crate) payments: PaymentClient,
}

impl StorefrontApp {
    /// Assemble the app from its parts.
    pub fn new(
        config: StoreConfig,
        catalog: Catalog,
        cache: Cache,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let shipping = ShippingClient::new(config.shipping.clone(), transport.clone());
        let payments = PaymentClient::new(config.payments.clone(), transport);
        Self {
            config,
            catalog,
            carts: CartStore::new(cache),
            shipping,
            payments,
        }
    }

    /// Assemble the app with the embedded catalog.
    pub fn with_embedded_catalog(
        config: StoreConfig,
        cache: Cache,
        transport: Arc<dyn Transport>,
    ) -> anyhow::Result<Self> {
        let catalog = Catalog::from_toml_str(CATALOG_TOML)?;
        Ok(Self::new(config, catalog, cache, transport))
    }

    /// Store configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Product catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Handle one request. Every response carries `x-request-id`.
    pub async fn handle(&self, request: ApiRequest) -> ApiResponse {
        let span = tracing::info_span!(
            "request",
            request_id = %request.request_id,
            method = %request.method,
            path = %request.path,
        );
        let response = self.route(&request).instrument(span).await;
        response.with_header(REQUEST_ID_HEADER, request.request_id.clone())
    }

    async fn route(&self, request: &ApiRequest) -> ApiResponse {
        let Some(route) = Route::resolve(&request.path) else {
            tracing::debug!("no route");
            return ApiError::NotFound.into_response();
        };
        if !route.allows(&request.method) {
            return ApiError::MethodNotAllowed.into_response();
        }

        let session = route.uses_session().then(|| Session::from_request(request));
        let mut response = match self.dispatch(&route, request, session.as_ref()).await {
            Ok(response) => response,
            Err(error) => {
                let status = error.status();
                if status >= 500 {
                    tracing::error!(
                        route = route.name(),
                        status,
                        error = %error,
                        "request failed"
                    );
                } else {
                    tracing::warn!(
                        route = route.name(),
                        status,
                        error = %error,
                        "request rejected"
                    );
                }
                error.into_response()
            }
        };

        if let Some(session) = session.filter(|s| s.fresh) {
            response = response.with_header("set-cookie", session.cookie());
        }
        tracing::info!(route = route.name(), status = response.status, "request handled");
        response
    }

    async fn dispatch(
        &self,
        route: &Route,
        request: &ApiRequest,
        session: Option<&Session>,
    ) -> Result<ApiResponse, ApiError> {
        match (route, session) {
            (Route::CalculateShipping, _) if request.method == Method::OPTIONS => {
                Ok(ApiResponse::empty(204).with_cors())
            }
            (Route::CalculateShipping, _) => handlers::shipping::calculate(self, request).await,
            (Route::CreatePreference, _) => {
                handlers::payments::create_preference(self, request).await
            }
            (Route::CreatePayment, _) => handlers::payments::create_payment(self, request).await,
            (Route::ProcessPayment, _) => handlers::payments::process_payment(self, request).await,
            (Route::PaymentStatus, _) => handlers::payments::payment_status(self, request).await,
            (Route::MercadoPagoWebhook, _) => handlers::webhook::mercadopago(self, request).await,
            (Route::Products, _) => handlers::products::list(self),
            (Route::Product(slug), _) => handlers::products::show(self, slug),
            (Route::Cart, Some(session)) if request.method == Method::DELETE => {
                handlers::cart::clear(self, session)
            }
            (Route::Cart, Some(session)) => handlers::cart::view(self, session),
            (Route::CartItems, Some(session)) => handlers::cart::add_item(self, request, session),
            (Route::CartItem(slug), Some(session)) => {
                handlers::cart::remove_item(self, session, slug)
            }
            (Route::CartShipping, Some(session)) => {
                handlers::cart::select_shipping(self, request, session).await
            }
            (Route::Cart | Route::CartItems | Route::CartItem(_) | Route::CartShipping, None) => {
                Err(ApiError::NotFound)
            }
        }
    }

    /// Public origin for payment back URLs.
    ///
    /// `public_origin` wins; otherwise the forwarded scheme (default
    /// `https`) and `host` header; otherwise the local development origin.
    pub fn origin(&self, request: &ApiRequest) -> String {
        if let Some(origin) = &self.config.public_origin {
            return origin.trim_end_matches('/').to_string();
        }
        match request.header("host").filter(|h| !h.trim().is_empty()) {
            Some(host) => {
                let scheme = request
                    .header("x-forwarded-proto")
                    .and_then(|p| p.split(',').next())
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .unwrap_or("https");
                format!("{}://{}", scheme, host.trim())
            }
            None => DEFAULT_ORIGIN.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encore_data::mock::MockTransport;

    fn app(config: StoreConfig) -> StorefrontApp {
        StorefrontApp::with_embedded_catalog(
            config,
            Cache::in_memory(),
            Arc::new(MockTransport::new()),
        )
        .unwrap()
    }

    #[test]
    fn test_embedded_catalog_loads() {
        let app = app(StoreConfig::default());
        assert!(!app.catalog().is_empty());
    }

    #[test]
    fn test_origin_from_config() {
        let app = app(StoreConfig {
            public_origin: Some("https://loja.test/".into()),
            ..Default::default()
        });
        let req = ApiRequest::new(Method::POST, "/").with_header("host", "ignored.test");
        assert_eq!(app.origin(&req), "https://loja.test");
    }

    #[test]
    fn test_origin_from_headers() {
        let app = app(StoreConfig::default());

        let req = ApiRequest::new(Method::POST, "/").with_header("host", "loja.test");
        assert_eq!(app.origin(&req), "https://loja.test");

        let req = ApiRequest::new(Method::POST, "/")
            .with_header("host", "localhost:3000")
            .with_header("x-forwarded-proto", "http");
        assert_eq!(app.origin(&req), "http://localhost:3000");

        let req = ApiRequest::new(Method::POST, "/");
        assert_eq!(app.origin(&req), "http://localhost:3000");
    }
}
