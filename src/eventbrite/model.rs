use serde::Serialize;

pub const NO_TITLE: &str = "No title";
pub const NO_LINK: &str = "No link";
pub const NO_DATE: &str = "No date found";
pub const NO_LOCATION: &str = "No location found";

/// An event card as found on the listing page, before its detail page is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventStub {
    pub title: String,
    pub detail_link: String,
}

impl EventStub {
    pub fn new(title: String, detail_link: String) -> Self {
        Self { title, detail_link }
    }
}

/// A fully enriched event. Missing data is always replaced by one of the
/// sentinels above, never left empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRecord {
    pub title: String,
    pub detail_link: String,
    pub date: String,
    pub location: String,
}

impl EventRecord {
    pub fn new(stub: EventStub, date: String, location: String) -> Self {
        Self {
            title: stub.title,
            detail_link: stub.detail_link,
            date,
            location,
        }
    }
}
