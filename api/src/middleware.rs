use axum::{extract::Request, middleware::Next, response::Response};

use crate::metrics;

/// Log and count every request with its status and latency
pub async fn request_logger(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let start = std::time::Instant::now();
    metrics::HTTP_IN_FLIGHT.inc();

    let response = next.run(req).await;

    metrics::HTTP_IN_FLIGHT.dec();
    let elapsed = start.elapsed();
    let status = response.status().as_u16();
    metrics::observe_http(method.as_str(), status, elapsed.as_secs_f64());

    tracing::info!("{method} {uri} {status} {}ms", elapsed.as_millis());

    response
}
