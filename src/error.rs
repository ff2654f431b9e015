use reqwest::StatusCode;
use thiserror::Error;

/// Failure while fetching a listing or detail page.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Failed fetching '{url}': {reason}")]
    Network { url: String, reason: String },

    #[error("'{url}' answered with status {status}")]
    Status { url: String, status: StatusCode },
}

impl ScrapeError {
    pub fn network(url: &str, reason: impl ToString) -> Self {
        ScrapeError::Network {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Transport-level failure while posting to a webhook. Non-success statuses
/// are not errors at this level.
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Failed posting to '{target}': {reason}")]
    Transport { target: String, reason: String },
}
