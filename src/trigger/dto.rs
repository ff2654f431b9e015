use serde::{Deserialize, Serialize};

pub const LOCATION_SETTING: &str = "Eventbrite Location";

/// Body Telex sends to the tick URL.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TickPayload {
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub return_url: Option<String>,
    #[serde(default)]
    pub settings: Vec<Setting>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Setting {
    pub label: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub default: String,
}

impl TickPayload {
    pub fn location(&self) -> Option<&str> {
        self.settings
            .iter()
            .find(|setting| setting.label == LOCATION_SETTING)
            .map(|setting| setting.default.trim())
            .filter(|location| !location.is_empty())
    }

    pub fn return_url(&self) -> Option<&str> {
        self.return_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}
