use once_cell::sync::Lazy;
use prometheus::{
    opts, Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Registry,
    TextEncoder,
};

macro_rules! counter_vec {
    ($name:expr, $help:expr, $labels:expr) => {
        Lazy::new(|| IntCounterVec::new(opts!($name, $help), $labels).unwrap())
    };
}
macro_rules! histogram_vec {
    ($name:expr, $help:expr, $labels:expr) => {
        Lazy::new(|| {
            HistogramVec::new(HistogramOpts::new($name, $help).buckets(LATENCY_BUCKETS.to_vec()), $labels)
                .unwrap()
        })
    };
}
macro_rules! counter {
    ($name:expr, $help:expr) => {
        Lazy::new(|| IntCounter::new($name, $help).unwrap())
    };
}
macro_rules! gauge {
    ($name:expr, $help:expr) => {
        Lazy::new(|| IntGauge::new($name, $help).unwrap())
    };
}

const LATENCY_BUCKETS: [f64; 12] = [
    0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

// ── HTTP ────────────────────────────────────────────────────────────────────
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> =
    counter_vec!("http_requests_total", "Total HTTP requests", &["method", "status"]);
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> =
    histogram_vec!("http_request_duration_seconds", "HTTP request latency", &["method"]);
pub static HTTP_IN_FLIGHT: Lazy<IntGauge> = gauge!("http_requests_in_flight", "In-flight HTTP requests");

// ── Registration ────────────────────────────────────────────────────────────
pub static ATHLETES_REGISTERED: Lazy<IntCounter> =
    counter!("athletes_registered_total", "Athletes accepted and persisted");
pub static REGISTRATION_REJECTIONS: Lazy<IntCounterVec> = counter_vec!(
    "registration_rejections_total",
    "Athlete registrations and updates refused, by reason",
    &["reason"]
);
pub static ATHLETES_UPDATED: Lazy<IntCounter> = counter!("athletes_updated_total", "Athlete updates applied");
pub static ATHLETES_DELETED: Lazy<IntCounter> = counter!("athletes_deleted_total", "Athletes deleted");
pub static CATEGORIES_CREATED: Lazy<IntCounter> = counter!("categories_created_total", "Categories created");
pub static GYMS_CREATED: Lazy<IntCounter> = counter!("gyms_created_total", "Gyms created");

// ── Storage ─────────────────────────────────────────────────────────────────
pub static REPOSITORY_ERRORS: Lazy<IntCounterVec> =
    counter_vec!("repository_errors_total", "Storage failures by operation", &["operation"]);

// ── System ──────────────────────────────────────────────────────────────────
pub static PROCESS_START_TIME: Lazy<IntGauge> = gauge!("process_start_time_seconds", "Process start time");

pub fn register_all(r: &Registry) -> prometheus::Result<()> {
    r.register(Box::new(HTTP_REQUESTS_TOTAL.clone()))?;
    r.register(Box::new(HTTP_REQUEST_DURATION.clone()))?;
    r.register(Box::new(HTTP_IN_FLIGHT.clone()))?;
    r.register(Box::new(ATHLETES_REGISTERED.clone()))?;
    r.register(Box::new(REGISTRATION_REJECTIONS.clone()))?;
    r.register(Box::new(ATHLETES_UPDATED.clone()))?;
    r.register(Box::new(ATHLETES_DELETED.clone()))?;
    r.register(Box::new(CATEGORIES_CREATED.clone()))?;
    r.register(Box::new(GYMS_CREATED.clone()))?;
    r.register(Box::new(REPOSITORY_ERRORS.clone()))?;
    r.register(Box::new(PROCESS_START_TIME.clone()))?;
    Ok(())
}

pub fn gather_metrics(r: &Registry) -> String {
    let encoder = TextEncoder::new();
    let families = r.gather();
    let mut buf = Vec::new();
    encoder.encode(&families, &mut buf).unwrap_or_default();
    String::from_utf8(buf).unwrap_or_default()
}

pub fn observe_http(method: &str, status: u16, duration_secs: f64) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, &status.to_string()])
        .inc();
    HTTP_REQUEST_DURATION
        .with_label_values(&[method])
        .observe(duration_secs);
}

pub fn record_rejection(reason: &str) {
    REGISTRATION_REJECTIONS.with_label_values(&[reason]).inc();
}

pub fn record_repository_error(operation: &str) {
    REPOSITORY_ERRORS.with_label_values(&[operation]).inc();
}
