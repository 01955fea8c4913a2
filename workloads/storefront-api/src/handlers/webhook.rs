//! `POST /api/webhooks/mercadopago`.

use crate::{ApiError, ApiRequest, ApiResponse, StorefrontApp};
use encore_payments::PaymentNotification;
use serde_json::json;

/// Acknowledge a payment notification and log the payment's current status.
///
/// Lookup failures are logged and still acknowledged so the provider does
/// not keep redelivering.
pub(crate) async fn mercadopago(
    app: &StorefrontApp,
    request: &ApiRequest,
) -> Result<ApiResponse, ApiError> {
    let body = request.json_opt()?;
    let notification = PaymentNotification::parse(body.as_ref(), &request.query)
        .ok_or_else(|| ApiError::BadRequest("Missing notification id".into()))?;

    if notification.is_payment() {
        match app.payments.payment_status(Some(&notification.data_id)).await {
            Ok(summary) => tracing::info!(
                payment_id = %notification.data_id,
                status = %summary.payment_status(),
                status_detail = ?summary.status_detail,
                "payment notification"
            ),
            Err(error) => tracing::warn!(
                payment_id = %notification.data_id,
                error = %error,
                "payment notification lookup failed"
            ),
        }
    } else {
        tracing::debug!(kind = ?notification.kind, "ignoring notification");
    }

    Ok(ApiResponse::ok(&json!({ "received": true })))
}
