use crate::eventbrite::model::EventRecord;
use serde::{Deserialize, Serialize};

pub const SENDER: &str = "Tech Event Announcer";
pub const EVENT_CATEGORY: &str = "Tech Event";
pub const STATUS: &str = "success";

/// Payload posted to a Telex channel webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub message: String,
    pub username: String,
    pub event_name: String,
    pub status: String,
}

impl Envelope {
    pub fn for_event(record: &EventRecord) -> Self {
        Self {
            message: format_message(record),
            username: SENDER.to_string(),
            event_name: EVENT_CATEGORY.to_string(),
            status: STATUS.to_string(),
        }
    }
}

pub fn format_message(record: &EventRecord) -> String {
    format!(
        "**{}**\nDate: {}\nLocation: {}\nLink: {}",
        record.title, record.date, record.location, record.detail_link
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivered {
    pub title: String,
    pub attempts: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryFailure {
    pub title: String,
    pub attempts: u32,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct DeliveryReport {
    pub delivered: Vec<Delivered>,
    pub failures: Vec<DeliveryFailure>,
}

impl DeliveryReport {
    /// Total POSTs made, retries included.
    pub fn attempts(&self) -> u32 {
        self.delivered.iter().map(|d| d.attempts).sum::<u32>()
            + self.failures.iter().map(|f| f.attempts).sum::<u32>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> EventRecord {
        EventRecord {
            title: "Lagos Rust Meetup".to_string(),
            detail_link: "https://www.eventbrite.com/e/lagos-rust-meetup-1".to_string(),
            date: "Saturday, March 1".to_string(),
            location: "Yaba, Lagos".to_string(),
        }
    }

    #[test_log::test]
    fn should_format_bold_title_followed_by_labeled_lines() {
        assert_eq!(
            format_message(&record()),
            "**Lagos Rust Meetup**\nDate: Saturday, March 1\nLocation: Yaba, Lagos\nLink: https://www.eventbrite.com/e/lagos-rust-meetup-1"
        );
    }

    #[test_log::test]
    fn should_serialize_envelope_with_fixed_metadata() {
        let envelope = Envelope::for_event(&record());

        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(
            value,
            json!({
                "message": format_message(&record()),
                "username": "Tech Event Announcer",
                "event_name": "Tech Event",
                "status": "success"
            })
        );
    }

    #[test_log::test]
    fn should_count_attempts_of_delivered_and_failed_events() {
        let report = DeliveryReport {
            delivered: vec![Delivered {
                title: "a".to_string(),
                attempts: 2,
            }],
            failures: vec![DeliveryFailure {
                title: "b".to_string(),
                attempts: 4,
                reason: "webhook answered 500".to_string(),
            }],
        };

        assert_eq!(report.attempts(), 6);
    }
}
