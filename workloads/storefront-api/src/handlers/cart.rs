//! Cart routes.
//!
//! The cart lives in the key-value store under the session id from the
//! `encore_session` cookie. Every route answers with the full cart view.

use crate::{ApiError, ApiRequest, ApiResponse, Session, StorefrontApp};
use encore_commerce::cart::{Cart, CartItem, CartSummary};
use encore_commerce::ProductSlug;
use encore_shipping::ParcelInput;
use serde::Serialize;
use serde_json::Value;

/// Cart items plus pricing summary.
#[derive(Debug, Serialize)]
pub struct CartView<'a> {
    pub items: &'a [CartItem],
    #[serde(flatten)]
    pub summary: CartSummary,
}

impl<'a> CartView<'a> {
    pub fn new(cart: &'a Cart) -> Result<Self, ApiError> {
        Ok(Self {
            items: &cart.items,
            summary: cart.summary()?,
        })
    }
}

fn respond(cart: &Cart) -> Result<ApiResponse, ApiError> {
    Ok(ApiResponse::serialize(200, &CartView::new(cart)?))
}

/// `GET /api/cart`
pub(crate) fn view(app: &StorefrontApp, session: &Session) -> Result<ApiResponse, ApiError> {
    let cart = app.carts.load(&session.id)?;
    respond(&cart)
}

/// `POST /api/cart/items` with `{slug}`: add one unit.
pub(crate) fn add_item(
    app: &StorefrontApp,
    request: &ApiRequest,
    session: &Session,
) -> Result<ApiResponse, ApiError> {
    let body: Value = request.json()?;
    let slug = body
        .get("slug")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("slug is required".into()))?;

    let product = app
        .catalog
        .get(&ProductSlug::new(slug))
        .ok_or_else(|| ApiError::ProductNotFound(slug.to_string()))?;

    let mut cart = app.carts.load(&session.id)?;
    let quantity = cart.add(product)?;
    app.carts.save(&session.id, &cart)?;

    tracing::info!(slug, quantity, "cart item added");
    respond(&cart)
}

/// `DELETE /api/cart/items/{slug}`
pub(crate) fn remove_item(
    app: &StorefrontApp,
    session: &Session,
    slug: &str,
) -> Result<ApiResponse, ApiError> {
    let mut cart = app.carts.load(&session.id)?;
    if cart.remove(&ProductSlug::new(slug)) {
        app.carts.save(&session.id, &cart)?;
        tracing::info!(slug, "cart item removed");
    }
    respond(&cart)
}

/// `DELETE /api/cart`: empty the cart and drop the shipping selection.
pub(crate) fn clear(app: &StorefrontApp, session: &Session) -> Result<ApiResponse, ApiError> {
    app.carts.clear(&session.id)?;
    tracing::info!("cart cleared");
    respond(&Cart::new())
}

/// `POST /api/cart/shipping` with `{postalCode, serviceId?}`.
///
/// Quotes the cart's parcels and stores the requested service, or the
/// cheapest available one.
pub(crate) async fn select_shipping(
    app: &StorefrontApp,
    request: &ApiRequest,
    session: &Session,
) -> Result<ApiResponse, ApiError> {
    let body: Value = request.json()?;
    let postal_code = body
        .get("postalCode")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let service_id = body.get("serviceId").and_then(Value::as_i64);

    let mut cart = app.carts.load(&session.id)?;
    if cart.is_empty() {
        return Err(ApiError::BadRequest("Cart is empty".into()));
    }

    let parcels: Vec<ParcelInput> = cart.parcels().iter().map(ParcelInput::from).collect();
    let quote = app.shipping.calculate(postal_code, &parcels).await?;

    let option = match service_id {
        Some(id) => quote.find(id),
        None => quote.cheapest(),
    };
    let selection = option
        .and_then(|o| o.to_selection(cart.currency))
        .ok_or_else(|| ApiError::BadRequest("No shipping option available".into()))?;

    tracing::info!(
        service_id = selection.service_id,
        service = %selection.name,
        "shipping selected"
    );
    cart.select_shipping(selection)?;
    app.carts.save(&session.id, &cart)?;
    respond(&cart)
}
