//! Payment status values.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lifecycle state of a payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentStatus {
    Approved,
    Pending,
    InProcess,
    Authorized,
    InMediation,
    Rejected,
    Cancelled,
    Refunded,
    ChargedBack,
    Other(String),
}

impl PaymentStatus {
    /// Parse the provider's status string.
    pub fn parse(value: &str) -> Self {
        match value {
            "approved" => PaymentStatus::Approved,
            "pending" => PaymentStatus::Pending,
            "in_process" => PaymentStatus::InProcess,
            "authorized" => PaymentStatus::Authorized,
            "in_mediation" => PaymentStatus::InMediation,
            "rejected" => PaymentStatus::Rejected,
            "cancelled" => PaymentStatus::Cancelled,
            "refunded" => PaymentStatus::Refunded,
            "charged_back" => PaymentStatus::ChargedBack,
            other => PaymentStatus::Other(other.to_string()),
        }
    }

    /// Provider string for this status.
    pub fn as_str(&self) -> &str {
        match self {
            PaymentStatus::Approved => "approved",
            PaymentStatus::Pending => "pending",
            PaymentStatus::InProcess => "in_process",
            PaymentStatus::Authorized => "authorized",
            PaymentStatus::InMediation => "in_mediation",
            PaymentStatus::Rejected => "rejected",
            PaymentStatus::Cancelled => "cancelled",
            PaymentStatus::Refunded => "refunded",
            PaymentStatus::ChargedBack => "charged_back",
            PaymentStatus::Other(s) => s,
        }
    }

    /// Money has been captured.
    pub fn is_approved(&self) -> bool {
        matches!(self, PaymentStatus::Approved)
    }

    /// No further transitions are expected without manual action.
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            PaymentStatus::Approved
                | PaymentStatus::Rejected
                | PaymentStatus::Cancelled
                | PaymentStatus::Refunded
                | PaymentStatus::ChargedBack
        )
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fields of a payment the storefront exposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentSummary {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub status_detail: Option<String>,
    #[serde(default)]
    pub transaction_amount: Option<f64>,
    #[serde(default)]
    pub date_created: Option<String>,
    #[serde(default)]
    pub date_approved: Option<String>,
}

impl PaymentSummary {
    /// Parsed status; a missing status counts as pending.
    pub fn payment_status(&self) -> PaymentStatus {
        self.status
            .as_deref()
            .map(PaymentStatus::parse)
            .unwrap_or(PaymentStatus::Pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_roundtrip() {
        for s in [
            "approved",
            "pending",
            "in_process",
            "authorized",
            "in_mediation",
            "rejected",
            "cancelled",
            "refunded",
            "charged_back",
        ] {
            assert_eq!(PaymentStatus::parse(s).as_str(), s);
        }
        assert_eq!(
            PaymentStatus::parse("expired"),
            PaymentStatus::Other("expired".to_string())
        );
    }

    #[test]
    fn test_final_states() {
        assert!(PaymentStatus::Approved.is_final());
        assert!(PaymentStatus::Approved.is_approved());
        assert!(PaymentStatus::Rejected.is_final());
        assert!(!PaymentStatus::Rejected.is_approved());
        assert!(!PaymentStatus::Pending.is_final());
        assert!(!PaymentStatus::InProcess.is_final());
        assert!(!PaymentStatus::Other("x".into()).is_final());
    }

    #[test]
    fn test_summary_from_provider_body() {
        let summary: PaymentSummary = serde_json::from_value(json!({
            "id": 123456,
            "status": "approved",
            "status_detail": "accredited",
            "transaction_amount": 149.9,
            "date_created": "2026-10-17T10:00:00.000-03:00",
            "date_approved": null,
            "payer": {"email": "x@y.z"}
        }))
        .unwrap();

        assert_eq!(summary.id, json!(123456));
        assert!(summary.payment_status().is_approved());
        assert_eq!(summary.date_approved, None);
    }
}
