//! Mercado Pago integration for the Encore storefront.
//!
//! Three flows are supported:
//!
//! - **Checkout preferences** (`create_preference`, and the older redirect
//!   variant `create_payment`): validate the cart, create a preference and
//!   hand back the URL the buyer is sent to.
//! - **Direct payments** (`process_payment`): Pix with a QR code, or a card
//!   token produced by the browser SDK.
//! - **Status lookups** (`payment_status`), also used for webhook
//!   notifications and the CLI's watch loop.
//!
//! Every failure is a [`PaymentError`] that knows the HTTP status and JSON
//! body the storefront answers with.

mod checkout;
mod client;
mod config;
mod direct;
mod error;
mod notification;
mod reference;
mod status;

pub use checkout::{CheckoutItem, CheckoutRequest, PreferenceResponse, RedirectResponse};
pub use client::PaymentClient;
pub use config::PaymentConfig;
pub use direct::{
    DirectPaymentRequest, DirectPaymentResponse, PixTransactionData, PointOfInteraction,
};
pub use error::{PaymentError, PaymentOperation};
pub use notification::PaymentNotification;
pub use reference::{external_reference, idempotency_key, is_valid_payment_id};
pub use status::{PaymentStatus, PaymentSummary};
