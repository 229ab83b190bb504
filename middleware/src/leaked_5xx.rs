use axum::{
    body::Body,
    http::{Request, Response},
    middleware::Next,
    response::IntoResponse,
};

/// 5xx errors are normally mapped to bare status codes by the handlers,
/// but anything that slips through with a body must not reach the client.
/// Log the body here and forward only the status.
pub async fn handle_leaked_5xx(request: Request<Body>, next: Next) -> Response<Body> {
    let response = next.run(request).await;
    let status = response.status();

    if status.is_server_error() {
        match axum::body::to_bytes(response.into_body(), usize::MAX).await {
            Ok(content) if !content.is_empty() => {
                tracing::error!("leaked 5xx body :: {:?}", content)
            }
            Err(err) => tracing::error!("unable to buffer leaked 5xx body :: {:?}", err),
            _ => {}
        }

        return status.into_response();
    }

    response
}
