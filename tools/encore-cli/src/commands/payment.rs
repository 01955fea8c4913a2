//! Payment lookup commands.

use std::time::Duration;

use anyhow::{Context as _, Result};
use encore_payments::{PaymentClient, PaymentError, PaymentSummary};
use serde_json::Value;

use super::{Outcome, PaymentArgs, PaymentCommand};
use crate::context::Context;
use crate::output::{format_brl, status_badge};

/// Result of watching a payment.
#[derive(Debug, Clone, PartialEq)]
pub enum WatchResult {
    /// Reached a final status.
    Settled(PaymentSummary),
    /// Polls ran out; holds the last status seen, if any.
    TimedOut(Option<PaymentSummary>),
}

/// Run the payment command.
pub async fn run(args: PaymentArgs, ctx: &Context) -> Result<Outcome> {
    let client = PaymentClient::new(ctx.config.payments.clone(), ctx.transport());
    match args.command {
        PaymentCommand::Status { id } => show_status(&client, &id, ctx).await,
        PaymentCommand::Watch {
            id,
            interval_secs,
            max_polls,
        } => {
            let interval = Duration::from_secs(interval_secs);
            watch_payment(&client, &id, interval, max_polls, ctx).await
        }
    }
}

async fn show_status(client: &PaymentClient, id: &str, ctx: &Context) -> Result<Outcome> {
    let summary = client
        .payment_status(Some(id))
        .await
        .with_context(|| format!("Failed to look up payment {}", id))?;
    print_summary(&summary, ctx);
    Ok(Outcome::Success)
}

async fn watch_payment(
    client: &PaymentClient,
    id: &str,
    interval: Duration,
    max_polls: u32,
    ctx: &Context,
) -> Result<Outcome> {
    ctx.output.info(&format!(
        "Watching payment {} (every {}s, up to {} polls)",
        id,
        interval.as_secs(),
        max_polls
    ));

    let result = watch(client, id, interval, max_polls, |poll, summary| {
        ctx.output.debug(&format!(
            "Poll {}: {}",
            poll,
            summary.payment_status().as_str()
        ));
    })
    .await?;

    match result {
        WatchResult::Settled(summary) => {
            print_summary(&summary, ctx);
            if summary.payment_status().is_approved() {
                ctx.output.success("Payment approved");
                Ok(Outcome::Success)
            } else {
                ctx.output.warn(&format!(
                    "Payment finished as {}",
                    summary.payment_status()
                ));
                Ok(Outcome::Failure)
            }
        }
        WatchResult::TimedOut(last) => {
            if let Some(summary) = &last {
                print_summary(summary, ctx);
            }
            ctx.output.warn(&format!(
                "Payment {} not settled after {} polls",
                id, max_polls
            ));
            Ok(Outcome::Failure)
        }
    }
}

/// Poll until the status is final or `max_polls` lookups have been made.
///
/// Provider 5xx answers and network failures are logged and polled
/// through; anything else, such as a malformed id, ends the watch.
pub async fn watch<F>(
    client: &PaymentClient,
    id: &str,
    interval: Duration,
    max_polls: u32,
    mut on_poll: F,
) -> Result<WatchResult>
where
    F: FnMut(u32, &PaymentSummary),
{
    let mut last = None;
    for poll in 1..=max_polls {
        match client.payment_status(Some(id)).await {
            Ok(summary) => {
                on_poll(poll, &summary);
                if summary.payment_status().is_final() {
                    return Ok(WatchResult::Settled(summary));
                }
                last = Some(summary);
            }
            Err(e) if is_transient(&e) => {
                tracing::warn!(payment_id = id, poll, error = %e, "status lookup failed");
            }
            Err(e) => return Err(e).with_context(|| format!("Failed to look up payment {}", id)),
        }
        if poll < max_polls {
            tokio::time::sleep(interval).await;
        }
    }
    Ok(WatchResult::TimedOut(last))
}

fn is_transient(error: &PaymentError) -> bool {
    match error {
        PaymentError::Provider { status, .. } => *status >= 500,
        PaymentError::Fetch { .. } => true,
        _ => false,
    }
}

fn print_summary(summary: &PaymentSummary, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(summary);
        return;
    }

    ctx.output.header("Payment");
    let id = match &summary.id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    ctx.output.kv("id", &id);
    ctx.output
        .kv("status", &status_badge(&summary.payment_status()));
    if let Some(detail) = &summary.status_detail {
        ctx.output.kv("detail", detail);
    }
    if let Some(amount) = summary.transaction_amount {
        ctx.output.kv("amount", &format_brl(amount));
    }
    if let Some(created) = &summary.date_created {
        ctx.output.kv("created", created);
    }
    if let Some(approved) = &summary.date_approved {
        ctx.output.kv("approved", approved);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encore_data::mock::MockTransport;
    use encore_data::FetchError;
    use encore_payments::PaymentConfig;
    use serde_json::json;
    use std::sync::Arc;

    fn client(transport: &Arc<MockTransport>) -> PaymentClient {
        PaymentClient::new(
            PaymentConfig::default().with_access_token("mp-token"),
            transport.clone(),
        )
    }

    #[tokio::test]
    async fn test_watch_until_final() {
        let transport = Arc::new(MockTransport::new());
        transport
            .push_json(200, json!({"id": 1, "status": "pending"}))
            .push_json(200, json!({"id": 1, "status": "in_process"}))
            .push_json(200, json!({"id": 1, "status": "approved"}));

        let mut seen = Vec::new();
        let result = watch(&client(&transport), "1", Duration::ZERO, 10, |poll, s| {
            seen.push((poll, s.payment_status().as_str().to_string()))
        })
        .await
        .unwrap();

        match result {
            WatchResult::Settled(summary) => assert!(summary.payment_status().is_approved()),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[2], (3, "approved".to_string()));
        assert_eq!(transport.request_count(), 3);
    }

    #[tokio::test]
    async fn test_watch_times_out() {
        let transport = Arc::new(MockTransport::new());
        transport
            .push_json(200, json!({"id": 1, "status": "pending"}))
            .push_json(200, json!({"id": 1, "status": "pending"}));

        let result = watch(&client(&transport), "1", Duration::ZERO, 2, |_, _| {})
            .await
            .unwrap();

        match result {
            WatchResult::TimedOut(Some(last)) => assert_eq!(last.status.as_deref(), Some("pending")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_watch_polls_through_provider_errors() {
        let transport = Arc::new(MockTransport::new());
        transport
            .push_json(503, json!({"message": "unavailable"}))
            .push_json(503, json!({"message": "unavailable"}))
            .push_error(FetchError::RequestError("reset".into()))
            .push_error(FetchError::RequestError("reset".into()))
            .push_json(200, json!({"id": 1, "status": "rejected"}));

        let result = watch(&client(&transport), "1", Duration::ZERO, 3, |_, _| {})
            .await
            .unwrap();

        match result {
            WatchResult::Settled(summary) => {
                assert_eq!(summary.status.as_deref(), Some("rejected"))
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_watch_stops_on_not_found() {
        let transport = Arc::new(MockTransport::new());
        transport.push_json(404, json!({"message": "Payment not found"}));

        let result = watch(&client(&transport), "999", Duration::ZERO, 5, |_, _| {}).await;

        assert!(result.is_err());
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn test_watch_stops_on_invalid_id() {
        let transport = Arc::new(MockTransport::new());
        let result = watch(&client(&transport), "../1", Duration::ZERO, 3, |_, _| {}).await;

        assert!(result.is_err());
        assert_eq!(transport.request_count(), 0);
    }
}
