use super::model::{Delivered, DeliveryFailure, DeliveryReport, Envelope};
use crate::eventbrite::model::EventRecord;
use crate::http::WebhookTransport;
use crate::throttle::Clock;
use lazy_static::lazy_static;
use reqwest_retry::policies::ExponentialBackoff;
use reqwest_retry::{RetryDecision, RetryPolicy};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tracing::{error, info, instrument, warn};

/// Retries after the first POST of an event, so at most `1 + MAX_RETRIES` posts.
pub const MAX_RETRIES: u32 = 3;

lazy_static! {
    static ref RETRY_POLICY: ExponentialBackoff = ExponentialBackoff::builder()
        .retry_bounds(Duration::from_millis(500), Duration::from_secs(5))
        .build_with_max_retries(MAX_RETRIES);
}

pub struct TelexAPI {
    transport: Arc<dyn WebhookTransport>,
    clock: Arc<dyn Clock>,
}

impl TelexAPI {
    pub fn new(transport: Arc<dyn WebhookTransport>, clock: Arc<dyn Clock>) -> Self {
        Self { transport, clock }
    }

    /// Posts every record to the target, in order. A record that exhausts its
    /// retries is reported and never stops the following ones.
    #[instrument(skip(self, records), fields(record_count = records.len()))]
    pub async fn deliver(&self, records: &[EventRecord], target: &str) -> DeliveryReport {
        let mut report = DeliveryReport::default();

        for record in records {
            match self.send_event(record, target).await {
                Ok(attempts) => report.delivered.push(Delivered {
                    title: record.title.clone(),
                    attempts,
                }),
                Err(failure) => report.failures.push(failure),
            }
        }

        info!(
            "Delivered {} of {} events",
            report.delivered.len(),
            records.len()
        );

        report
    }

    #[instrument(skip(self, record, target), fields(event = %record.title))]
    async fn send_event(&self, record: &EventRecord, target: &str) -> Result<u32, DeliveryFailure> {
        let envelope = Envelope::for_event(record);
        let started_at = SystemTime::now();
        let mut attempts = 0;

        loop {
            attempts += 1;

            let reason = match self.transport.post_json(target, &envelope).await {
                Ok(status) if status.is_success() => {
                    info!("Successfully posted event");
                    return Ok(attempts);
                }
                Ok(status) => format!("webhook answered {}", status),
                Err(err) => err.to_string(),
            };

            match RETRY_POLICY.should_retry(started_at, attempts - 1) {
                RetryDecision::Retry { execute_after } => {
                    warn!("Attempt {} failed ({}), retrying", attempts, reason);

                    let delay = execute_after
                        .duration_since(SystemTime::now())
                        .unwrap_or_default();
                    self.clock.sleep(delay).await;
                }
                RetryDecision::DoNotRetry => {
                    error!("Giving up on event after {} attempts: {}", attempts, reason);

                    return Err(DeliveryFailure {
                        title: record.title.clone(),
                        attempts,
                        reason,
                    });
                }
            }
        }
    }
}
