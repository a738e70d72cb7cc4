use lazy_static::lazy_static;
use prometheus::core::Collector;
use prometheus::{register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec};

lazy_static! {
    pub static ref API_REQUEST_DURATION: HistogramVec = register_histogram_vec!(
        "api_request_duration_seconds",
        "Admin API request duration in seconds",
        &["endpoint", "status"]
    ).unwrap();

    pub static ref API_REQUEST_COUNTER: IntCounterVec = register_int_counter_vec!(
        "api_requests_total",
        "Total number of admin API requests",
        &["endpoint", "status"]
    ).unwrap();
}

/// `status` is the HTTP status code, or the failure class when no response
/// arrived (`timeout`, `network`).
pub fn record_request(endpoint: &str, status: &str, duration: f64) {
    API_REQUEST_DURATION
        .with_label_values(&[endpoint, status])
        .observe(duration);
    API_REQUEST_COUNTER
        .with_label_values(&[endpoint, status])
        .inc();
}

/// (succeeded, failed) request totals across all endpoints.
pub fn request_totals() -> (u64, u64) {
    let mut ok = 0;
    let mut failed = 0;
    for family in API_REQUEST_COUNTER.collect() {
        for metric in family.get_metric() {
            let status = metric
                .get_label()
                .iter()
                .find(|l| l.get_name() == "status")
                .map(|l| l.get_value().to_string())
                .unwrap_or_default();
            let count = metric.get_counter().get_value() as u64;
            if status.starts_with('2') {
                ok += count;
            } else {
                failed += count;
            }
        }
    }
    (ok, failed)
}
