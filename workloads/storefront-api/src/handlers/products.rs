//! Catalog routes.

use crate::{ApiError, ApiResponse, StorefrontApp};
use encore_commerce::ProductSlug;
use serde_json::json;

/// `GET /api/products`
pub(crate) fn list(app: &StorefrontApp) -> Result<ApiResponse, ApiError> {
    Ok(ApiResponse::serialize(
        200,
        &json!({ "products": app.catalog.products() }),
    ))
}

/// `GET /api/products/{slug}`
pub(crate) fn show(app: &StorefrontApp, slug: &str) -> Result<ApiResponse, ApiError> {
    let product = app
        .catalog
        .get(&ProductSlug::new(slug))
        .ok_or_else(|| ApiError::ProductNotFound(slug.to_string()))?;
    Ok(ApiResponse::serialize(200, product))
}
