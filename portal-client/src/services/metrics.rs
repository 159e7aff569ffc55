use metrics::{counter, histogram};
use std::time::Duration;

/// Record one logical API call (including any refresh-and-retry it needed).
pub fn record_request(method: &str, outcome: &'static str, duration: Duration) {
    let labels = [("method", method.to_string()), ("outcome", outcome.to_string())];

    counter!("portal_api_requests_total", &labels).increment(1);
    histogram!("portal_api_request_duration_seconds", &labels).record(duration.as_secs_f64());
}

pub fn record_refresh(outcome: &'static str) {
    counter!("portal_token_refresh_total", "outcome" => outcome).increment(1);
}
