use std::time::Instant;

use axum::{body::Body, http::Request, http::Response, middleware::Next};

pub async fn latency_ms(request: Request<Body>, next: Next) -> Response<Body> {
    let start = Instant::now();
    let response = next.run(request).await;

    tracing::info!(
        status = %response.status(),
        "request processed in {} ms",
        start.elapsed().as_millis()
    );
    response
}
