use super::model::{EventRecord, EventStub, NO_DATE, NO_LINK, NO_LOCATION, NO_TITLE};
use itertools::Itertools;
use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};

/// Class of the search result cards. Eventbrite ships it from a CSS module so
/// the suffix changes whenever their markup is rebuilt; when that happens the
/// listing silently parses to zero events.
pub const EVENT_CARD_CLASS: &str =
    "SearchResultPanelContentEventCardList-module__map_experiment_event_card___vyRC3";

const LOCATION_ADDRESS_CLASS: &str = "location-info__address";

lazy_static! {
    static ref EVENT_CARD: Selector =
        Selector::parse(&format!("div.{EVENT_CARD_CLASS}")).expect("Invalid event card selector");
    static ref HEADING: Selector =
        Selector::parse("h1, h2, h3, h4, h5, h6").expect("Invalid heading selector");
    static ref ANCHOR: Selector = Selector::parse("a").expect("Invalid anchor selector");
    static ref TIME: Selector = Selector::parse("time").expect("Invalid time selector");
    static ref LOCATION_ADDRESS: Selector =
        Selector::parse(&format!("div.{LOCATION_ADDRESS_CLASS}"))
            .expect("Invalid location selector");
}

/// Extracts one stub per event card, in page order.
pub fn parse_listing(html: &str) -> Vec<EventStub> {
    let document = Html::parse_document(html);

    document
        .select(&EVENT_CARD)
        .map(|card| {
            let title = first_text(card, &HEADING).unwrap_or_else(|| NO_TITLE.to_string());
            let link = card
                .select(&ANCHOR)
                .next()
                .and_then(|anchor| anchor.value().attr("href"))
                .map(str::to_string)
                .unwrap_or_else(|| NO_LINK.to_string());

            EventStub::new(title, link)
        })
        .collect()
}

/// Merges the date and location of a detail page into the stub.
pub fn parse_details(stub: EventStub, html: &str) -> EventRecord {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let date = first_text(root, &TIME).unwrap_or_else(|| NO_DATE.to_string());
    let location = first_text(root, &LOCATION_ADDRESS).unwrap_or_else(|| NO_LOCATION.to_string());

    EventRecord::new(stub, date, location)
}

fn first_text(scope: ElementRef, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .next()
        .map(|element| element.text().collect::<String>().split_whitespace().join(" "))
        .filter(|text| !text.is_empty())
}
