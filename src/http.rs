use crate::config::model::HttpConfig;
use crate::error::{DeliveryError, ScrapeError};
use crate::telex::model::Envelope;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, StatusCode};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::policies::ExponentialBackoff;
use reqwest_retry::RetryTransientMiddleware;
use tracing::{debug, instrument};

/// Eventbrite answers bare clients with a bot wall.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0";

const JSON_MIME: &str = "application/json";

#[async_trait]
pub trait PageSource: Send + Sync {
    async fn get_html(&self, url: &str) -> Result<String, ScrapeError>;
}

#[async_trait]
pub trait WebhookTransport: Send + Sync {
    async fn post_json(&self, target: &str, envelope: &Envelope)
        -> Result<StatusCode, DeliveryError>;
}

pub struct HttpClient {
    pages: ClientWithMiddleware,
    webhooks: Client,
}

impl HttpClient {
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;

        // Webhook posts have their own retry loop, only page fetches go through the middleware
        let pages = ClientBuilder::new(client.clone())
            .with(RetryTransientMiddleware::new_with_policy(
                ExponentialBackoff::builder().build_with_max_retries(config.fetch_max_retries),
            ))
            .build();

        Ok(Self {
            pages,
            webhooks: client,
        })
    }
}

#[async_trait]
impl PageSource for HttpClient {
    #[instrument(skip(self))]
    async fn get_html(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self
            .pages
            .get(url)
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .await
            .map_err(|err| ScrapeError::network(url, err))?;

        let status = response.status();
        debug!("Got status {}", status);

        if !status.is_success() {
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status,
            });
        }

        response
            .text()
            .await
            .map_err(|err| ScrapeError::network(url, err))
    }
}

#[async_trait]
impl WebhookTransport for HttpClient {
    async fn post_json(
        &self,
        target: &str,
        envelope: &Envelope,
    ) -> Result<StatusCode, DeliveryError> {
        self.webhooks
            .post(target)
            .header(ACCEPT, JSON_MIME)
            .header(CONTENT_TYPE, JSON_MIME)
            .json(envelope)
            .send()
            .await
            .map(|response| response.status())
            .map_err(|err| DeliveryError::Transport {
                target: target.to_string(),
                reason: err.to_string(),
            })
    }
}
