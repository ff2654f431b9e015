use crate::config::model::Config;
use crate::error::ScrapeError;
use crate::eventbrite::api::EventbriteAPI;
use crate::http::{PageSource, WebhookTransport};
use crate::telex::api::TelexAPI;
use crate::telex::model::DeliveryReport;
use crate::throttle::Clock;
use crate::trigger::dto::TickPayload;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::JoinHandle;
use tracing::{error, info, info_span, instrument, warn, Instrument};
use uuid::Uuid;

/// Runs one scrape-and-deliver job per tick in the background, at most one
/// at a time per location.
pub struct Announcer {
    eventbrite: EventbriteAPI,
    telex: TelexAPI,
    default_location: String,
    default_target: Option<String>,
    running: Arc<Mutex<HashSet<String>>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TickAck {
    Accepted { job_id: Uuid },
    AlreadyRunning { location: String },
    NoTarget,
}

pub struct Dispatch {
    pub ack: TickAck,
    /// Dropping it leaves the job running detached.
    pub job: Option<JoinHandle<Result<JobReport, ScrapeError>>>,
}

impl Dispatch {
    fn ack_only(ack: TickAck) -> Self {
        Self { ack, job: None }
    }
}

#[derive(Debug)]
pub struct JobReport {
    pub job_id: Uuid,
    pub location: String,
    pub target: String,
    pub stubs_found: usize,
    pub enriched: usize,
    pub skipped: usize,
    pub delivery: DeliveryReport,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Holds a location as running until dropped.
struct RunningGuard {
    running: Arc<Mutex<HashSet<String>>>,
    location: String,
}

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.location);
    }
}

impl Announcer {
    pub fn new(
        eventbrite: EventbriteAPI,
        telex: TelexAPI,
        default_location: String,
        default_target: Option<String>,
    ) -> Self {
        Self {
            eventbrite,
            telex,
            default_location,
            default_target,
            running: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn from_config(
        config: &Config,
        source: Arc<dyn PageSource>,
        transport: Arc<dyn WebhookTransport>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::new(
            EventbriteAPI::new(source, Arc::clone(&clock), &config.scrape),
            TelexAPI::new(transport, clock),
            config.scrape.default_location.clone(),
            config.delivery.webhook_url.clone(),
        )
    }

    /// Acknowledges the tick straight away and spawns the job, if any.
    ///
    /// The caller's return URL wins over the configured webhook.
    pub fn tick(self: &Arc<Self>, payload: &TickPayload) -> Dispatch {
        let location = payload
            .location()
            .unwrap_or(self.default_location.as_str())
            .to_string();

        let Some(target) = payload
            .return_url()
            .or(self.default_target.as_deref())
            .map(str::to_string)
        else {
            warn!("Tick has no return URL and no webhook is configured, ignoring it");
            return Dispatch::ack_only(TickAck::NoTarget);
        };

        let Some(guard) = self.claim(&location) else {
            info!("A job for '{}' is still running, skipping tick", location);
            return Dispatch::ack_only(TickAck::AlreadyRunning { location });
        };

        let job_id = Uuid::new_v4();
        let announcer = Arc::clone(self);
        let span = info_span!("job", %job_id, %location);

        let job = tokio::spawn(
            async move {
                let _guard = guard;

                let result = announcer.run_job(job_id, &location, &target).await;

                match &result {
                    Ok(report) => info!(
                        stubs = report.stubs_found,
                        enriched = report.enriched,
                        skipped = report.skipped,
                        delivered = report.delivery.delivered.len(),
                        failed = report.delivery.failures.len(),
                        "Job finished"
                    ),
                    Err(err) => error!("Job aborted: {}", err),
                }

                result
            }
            .instrument(span),
        );

        Dispatch {
            ack: TickAck::Accepted { job_id },
            job: Some(job),
        }
    }

    /// Fetch, enrich and deliver, in sequence. Only a failed listing fetch
    /// aborts the job.
    #[instrument(skip(self, target))]
    pub async fn run_job(
        &self,
        job_id: Uuid,
        location: &str,
        target: &str,
    ) -> Result<JobReport, ScrapeError> {
        let started_at = Utc::now();

        let stubs = self.eventbrite.fetch_listing(location).await?;
        let stubs_found = stubs.len();

        let enrichment = self.eventbrite.enrich_all(stubs).await;
        let delivery = self.telex.deliver(&enrichment.records, target).await;

        Ok(JobReport {
            job_id,
            location: location.to_string(),
            target: target.to_string(),
            stubs_found,
            enriched: enrichment.records.len(),
            skipped: enrichment.skipped,
            delivery,
            started_at,
            finished_at: Utc::now(),
        })
    }

    fn claim(&self, location: &str) -> Option<RunningGuard> {
        let mut running = self.running.lock().unwrap_or_else(PoisonError::into_inner);

        if !running.insert(location.to_string()) {
            return None;
        }

        Some(RunningGuard {
            running: Arc::clone(&self.running),
            location: location.to_string(),
        })
    }
}
