use super::model::{EventRecord, EventStub};
use super::parser::{parse_details, parse_listing};
use crate::config::model::ScrapeConfig;
use crate::error::ScrapeError;
use crate::http::PageSource;
use crate::throttle::{Clock, Throttle};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

pub struct EventbriteAPI {
    source: Arc<dyn PageSource>,
    clock: Arc<dyn Clock>,
    listing_base_url: String,
    detail_delay: Duration,
}

/// Outcome of enriching a whole listing.
#[derive(Debug, Default)]
pub struct Enrichment {
    /// In listing order.
    pub records: Vec<EventRecord>,
    pub skipped: usize,
}

impl EventbriteAPI {
    pub fn new(source: Arc<dyn PageSource>, clock: Arc<dyn Clock>, config: &ScrapeConfig) -> Self {
        Self {
            source,
            clock,
            listing_base_url: config.listing_base_url.trim_end_matches('/').to_string(),
            detail_delay: config.detail_delay,
        }
    }

    pub fn listing_url(&self, location_id: &str) -> String {
        format!(
            "{}/{}",
            self.listing_base_url,
            location_id.trim_start_matches('/')
        )
    }

    #[instrument(skip(self))]
    pub async fn fetch_listing(&self, location_id: &str) -> Result<Vec<EventStub>, ScrapeError> {
        let url = self.listing_url(location_id);

        info!("Fetching listing from {}", url);

        let html = self.source.get_html(&url).await?;
        let stubs = parse_listing(&html);

        if stubs.is_empty() {
            warn!("No event cards found on the listing (has the card markup changed?)");
        } else {
            info!("Found {} events", stubs.len());
        }

        Ok(stubs)
    }

    #[instrument(skip(self, stub), fields(event = %stub.title, link = %stub.detail_link))]
    pub async fn enrich(&self, stub: EventStub) -> Result<EventRecord, ScrapeError> {
        let html = self.source.get_html(&stub.detail_link).await?;
        let record = parse_details(stub, &html);

        info!("Scraped event");

        Ok(record)
    }

    /// Enriches stubs one by one, waiting the detail delay after each of them
    /// whether it succeeded or not. Failed stubs are dropped.
    #[instrument(skip(self, stubs), fields(stub_count = stubs.len()))]
    pub async fn enrich_all(&self, stubs: Vec<EventStub>) -> Enrichment {
        let mut enrichment = Enrichment::default();
        let mut throttle = Throttle::new(stubs, self.detail_delay, self.clock.as_ref());

        while let Some(stub) = throttle.next().await {
            let title = stub.title.clone();

            match self.enrich(stub).await {
                Ok(record) => enrichment.records.push(record),
                Err(err) => {
                    error!("Failed to fetch details of '{}': {}", title, err);
                    enrichment.skipped += 1;
                }
            }
        }

        enrichment
    }
}
