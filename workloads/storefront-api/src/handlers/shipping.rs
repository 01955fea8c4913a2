//! `POST /api/calculate-shipping`.

use crate::{ApiError, ApiRequest, ApiResponse, StorefrontApp};
use encore_shipping::ParcelInput;
use serde_json::Value;

/// Quote shipping for browser-supplied parcels and return the provider body.
pub(crate) async fn calculate(
    app: &StorefrontApp,
    request: &ApiRequest,
) -> Result<ApiResponse, ApiError> {
    let body: Value = request.json()?;
    let postal_code = body
        .get("postalCode")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let parcels: Vec<ParcelInput> = body
        .get("products")
        .and_then(Value::as_array)
        .map(|products| products.iter().map(ParcelInput::from_value).collect())
        .unwrap_or_default();

    let quote = app.shipping.calculate(postal_code, &parcels).await?;
    Ok(ApiResponse::ok(&quote.raw).with_cors())
}
