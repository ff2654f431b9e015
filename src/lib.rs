pub mod announcer;
pub mod config;
pub mod error;
pub mod eventbrite;
pub mod http;
pub mod logging;
pub mod telex;
pub mod throttle;
pub mod trigger;
