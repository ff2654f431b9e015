use crate::config::model::{
    Config, DeliveryConfig, HttpConfig, ScrapeConfig, DEFAULT_BIND_ADDRESS, DEFAULT_DETAIL_DELAY,
    DEFAULT_HTTP_TIMEOUT, DEFAULT_LISTING_BASE_URL, DEFAULT_LOCATION,
};
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub fn load_config() -> Config {
    let bind_address = load_parsed_config(
        "BIND_ADDRESS",
        DEFAULT_BIND_ADDRESS
            .parse()
            .expect("Default bind address is invalid"),
        "a socket address like 0.0.0.0:8000",
    );

    let detail_delay = load_parsed_config(
        "DETAIL_DELAY_SECS",
        DEFAULT_DETAIL_DELAY.as_secs(),
        "a whole number of seconds",
    );
    let timeout = load_parsed_config(
        "HTTP_TIMEOUT_SECS",
        DEFAULT_HTTP_TIMEOUT.as_secs(),
        "a whole number of seconds",
    );
    let fetch_max_retries = load_parsed_config("FETCH_MAX_RETRIES", 0, "a non-negative integer");

    Config {
        bind_address,
        loki_url: load_optional_config("LOKI_URL"),
        scrape: ScrapeConfig {
            listing_base_url: load_string_config("LISTING_BASE_URL", DEFAULT_LISTING_BASE_URL),
            default_location: load_string_config("DEFAULT_LOCATION", DEFAULT_LOCATION),
            detail_delay: Duration::from_secs(detail_delay),
        },
        http: HttpConfig {
            timeout: Duration::from_secs(timeout),
            fetch_max_retries,
        },
        delivery: DeliveryConfig {
            webhook_url: load_optional_config("WEBHOOK_URL"),
        },
    }
}

fn load_optional_config(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn load_string_config(name: &str, default: &str) -> String {
    load_optional_config(name).unwrap_or_else(|| default.to_string())
}

fn load_parsed_config<T: FromStr>(name: &str, default: T, expected: &str) -> T {
    match load_optional_config(name) {
        Some(value) => value
            .parse()
            .unwrap_or_else(|_| panic!("Invalid config '{}'. Expected {}.", name, expected)),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn when_a_variable_is_missing_should_use_default() {
        let value: u64 = load_parsed_config("TEA_TEST_MISSING_SECS", 12, "seconds");

        assert_eq!(value, 12);
    }

    #[test_log::test]
    fn should_parse_a_set_variable() {
        env::set_var("TEA_TEST_SET_RETRIES", " 2 ");

        let value: u32 = load_parsed_config("TEA_TEST_SET_RETRIES", 0, "an integer");

        assert_eq!(value, 2);
    }

    #[test_log::test]
    fn when_a_variable_is_blank_should_treat_it_as_missing() {
        env::set_var("TEA_TEST_BLANK_URL", "   ");

        assert_eq!(load_optional_config("TEA_TEST_BLANK_URL"), None);
        assert_eq!(
            load_string_config("TEA_TEST_BLANK_URL", "online--tech"),
            "online--tech"
        );
    }

    #[test_log::test]
    #[should_panic(expected = "Invalid config 'TEA_TEST_BAD_DELAY'")]
    fn when_a_variable_is_invalid_should_panic() {
        env::set_var("TEA_TEST_BAD_DELAY", "soon");

        let _: u64 = load_parsed_config("TEA_TEST_BAD_DELAY", 12, "seconds");
    }
}
