//! Route table.

use http::Method;

/// A resolved API route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    CalculateShipping,
    CreatePreference,
    CreatePayment,
    ProcessPayment,
    PaymentStatus,
    MercadoPagoWebhook,
    Products,
    Product(String),
    Cart,
    CartItems,
    CartItem(String),
    CartShipping,
}

impl Route {
    /// Match a request path. Trailing slashes are ignored.
    pub fn resolve(path: &str) -> Option<Route> {
        let path = path.trim_end_matches('/');
        let route = match path {
            "/api/calculate-shipping" => Route::CalculateShipping,
            "/api/create_preference" => Route::CreatePreference,
            "/api/create_payment" => Route::CreatePayment,
            "/api/process_payment" => Route::ProcessPayment,
            "/api/payment_status" => Route::PaymentStatus,
            "/api/webhooks/mercadopago" => Route::MercadoPagoWebhook,
            "/api/products" => Route::Products,
            "/api/cart" => Route::Cart,
            "/api/cart/items" => Route::CartItems,
            "/api/cart/shipping" => Route::CartShipping,
            _ => {
                if let Some(slug) = segment_after(path, "/api/products/") {
                    Route::Product(slug)
                } else if let Some(slug) = segment_after(path, "/api/cart/items/") {
                    Route::CartItem(slug)
                } else {
                    return None;
                }
            }
        };
        Some(route)
    }

    /// Whether the route answers `method`.
    pub fn allows(&self, method: &Method) -> bool {
        match self {
            Route::CalculateShipping => *method == Method::POST || *method == Method::OPTIONS,
            Route::CreatePreference
            | Route::CreatePayment
            | Route::ProcessPayment
            | Route::MercadoPagoWebhook
            | Route::CartItems
            | Route::CartShipping => *method == Method::POST,
            Route::PaymentStatus | Route::Products | Route::Product(_) => *method == Method::GET,
            Route::Cart => *method == Method::GET || *method == Method::DELETE,
            Route::CartItem(_) => *method == Method::DELETE,
        }
    }

    /// Stable name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Route::CalculateShipping => "calculate_shipping",
            Route::CreatePreference => "create_preference",
            Route::CreatePayment => "create_payment",
            Route::ProcessPayment => "process_payment",
            Route::PaymentStatus => "payment_status",
            Route::MercadoPagoWebhook => "mercadopago_webhook",
            Route::Products => "products",
            Route::Product(_) => "product",
            Route::Cart => "cart",
            Route::CartItems => "cart_items",
            Route::CartItem(_) => "cart_item",
            Route::CartShipping => "cart_shipping",
        }
    }

    /// Cart routes carry a session cookie.
    pub fn uses_session(&self) -> bool {
        matches!(
            self,
            Route::Cart | Route::CartItems | Route::CartItem(_) | Route::CartShipping
        )
    }
}

/// A single non-empty path segment following `prefix`.
fn segment_after(path: &str, prefix: &str) -> Option<String> {
    let rest = path.strip_prefix(prefix)?;
    if rest.is_empty() || rest.contains('/') {
        return None;
    }
    Some(rest.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_routes() {
        assert_eq!(
            Route::resolve("/api/calculate-shipping"),
            Some(Route::CalculateShipping)
        );
        assert_eq!(Route::resolve("/api/cart/"), Some(Route::Cart));
        assert_eq!(
            Route::resolve("/api/webhooks/mercadopago"),
            Some(Route::MercadoPagoWebhook)
        );
        assert_eq!(Route::resolve("/api/unknown"), None);
        assert_eq!(Route::resolve("/"), None);
    }

    #[test]
    fn test_slug_routes() {
        assert_eq!(
            Route::resolve("/api/products/vinil-ao-vivo"),
            Some(Route::Product("vinil-ao-vivo".into()))
        );
        assert_eq!(
            Route::resolve("/api/cart/items/camiseta"),
            Some(Route::CartItem("camiseta".into()))
        );
        assert_eq!(Route::resolve("/api/products/a/b"), None);
    }

    #[test]
    fn test_methods() {
        assert!(Route::CalculateShipping.allows(&Method::OPTIONS));
        assert!(!Route::CalculateShipping.allows(&Method::GET));
        assert!(Route::Cart.allows(&Method::DELETE));
        assert!(!Route::PaymentStatus.allows(&Method::POST));
    }

    #[test]
    fn test_session_routes() {
        assert!(Route::CartShipping.uses_session());
        assert!(!Route::Products.uses_session());
        assert_eq!(Route::CartItem("x".into()).name(), "cart_item");
    }
}
