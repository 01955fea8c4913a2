//! Mercado Pago routes.

use crate::{ApiError, ApiRequest, ApiResponse, StorefrontApp};
use encore_payments::{CheckoutRequest, DirectPaymentRequest};

/// `POST /api/create_preference`
pub(crate) async fn create_preference(
    app: &StorefrontApp,
    request: &ApiRequest,
) -> Result<ApiResponse, ApiError> {
    let checkout: CheckoutRequest = request.json()?;
    let origin = app.origin(request);
    let preference = app.payments.create_preference(&checkout, &origin).await?;
    Ok(ApiResponse::serialize(200, &preference))
}

/// `POST /api/create_payment`
pub(crate) async fn create_payment(
    app: &StorefrontApp,
    request: &ApiRequest,
) -> Result<ApiResponse, ApiError> {
    let checkout: CheckoutRequest = request.json()?;
    let origin = app.origin(request);
    let redirect = app.payments.create_payment(&checkout, &origin).await?;
    Ok(ApiResponse::serialize(200, &redirect))
}

/// `POST /api/process_payment`
pub(crate) async fn process_payment(
    app: &StorefrontApp,
    request: &ApiRequest,
) -> Result<ApiResponse, ApiError> {
    let payment: DirectPaymentRequest = request.json()?;
    let result = app.payments.process_payment(&payment).await?;
    Ok(ApiResponse::serialize(200, &result))
}

/// `GET /api/payment_status?id=`
pub(crate) async fn payment_status(
    app: &StorefrontApp,
    request: &ApiRequest,
) -> Result<ApiResponse, ApiError> {
    let summary = app
        .payments
        .payment_status(request.query_param("id"))
        .await?;
    Ok(ApiResponse::serialize(200, &summary))
}
