#![allow(dead_code)]

use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use techeventannouncer::config::model::ScrapeConfig;
use techeventannouncer::error::{DeliveryError, ScrapeError};
use techeventannouncer::http::{PageSource, WebhookTransport};
use techeventannouncer::telex::model::Envelope;
use tokio::sync::Notify;

pub const LISTING_BASE_URL: &str = "https://www.eventbrite.com/d";
pub const RUST_EVENT_URL: &str = "https://www.eventbrite.com/e/rust-in-production-tickets-1001";

pub fn fixture(name: &str) -> String {
    std::fs::read_to_string(format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name))
        .unwrap_or_else(|err| panic!("Missing fixture {}: {}", name, err))
}

pub fn scrape_config() -> ScrapeConfig {
    ScrapeConfig {
        listing_base_url: LISTING_BASE_URL.to_string(),
        ..ScrapeConfig::default()
    }
}

/// Serves canned pages by URL and remembers every request.
#[derive(Default)]
pub struct FixtureSource {
    pages: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl FixtureSource {
    pub fn with_page(mut self, url: &str, html: String) -> Self {
        self.pages.insert(url.to_string(), html);
        self
    }

    /// The online--tech listing plus the detail page of its first card.
    pub fn online_tech() -> Self {
        Self::default()
            .with_page(
                &format!("{}/online--tech", LISTING_BASE_URL),
                fixture("listing_online_tech.html"),
            )
            .with_page(RUST_EVENT_URL, fixture("event_rust_in_production.html"))
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageSource for FixtureSource {
    async fn get_html(&self, url: &str) -> Result<String, ScrapeError> {
        self.requests.lock().unwrap().push(url.to_string());

        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| ScrapeError::network(url, "connection refused"))
    }
}

/// Holds every fetch until the gate is opened.
pub struct GatedSource {
    pub gate: Arc<Notify>,
    inner: FixtureSource,
}

impl GatedSource {
    pub fn new(inner: FixtureSource) -> Self {
        Self {
            gate: Arc::new(Notify::new()),
            inner,
        }
    }
}

#[async_trait]
impl PageSource for GatedSource {
    async fn get_html(&self, url: &str) -> Result<String, ScrapeError> {
        self.gate.notified().await;
        self.gate.notify_one();

        self.inner.get_html(url).await
    }
}

/// Answers posts with scripted statuses, then with the fallback status.
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<StatusCode, String>>>,
    fallback: StatusCode,
    posts: Mutex<Vec<(String, Envelope)>>,
}

impl ScriptedTransport {
    pub fn always(status: StatusCode) -> Self {
        Self::scripted(Vec::new(), status)
    }

    pub fn scripted(script: Vec<Result<StatusCode, String>>, fallback: StatusCode) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback,
            posts: Mutex::new(Vec::new()),
        }
    }

    pub fn posts(&self) -> Vec<(String, Envelope)> {
        self.posts.lock().unwrap().clone()
    }
}

#[async_trait]
impl WebhookTransport for ScriptedTransport {
    async fn post_json(
        &self,
        target: &str,
        envelope: &Envelope,
    ) -> Result<StatusCode, DeliveryError> {
        self.posts
            .lock()
            .unwrap()
            .push((target.to_string(), envelope.clone()));

        match self.script.lock().unwrap().pop_front() {
            Some(Ok(status)) => Ok(status),
            Some(Err(reason)) => Err(DeliveryError::Transport {
                target: target.to_string(),
                reason,
            }),
            None => Ok(self.fallback),
        }
    }
}
