use http::Request;
use tracing::Span;

pub fn span<B>(request: &Request<B>) -> Span {
    let trace_id = match request.headers().get("x-trace-id") {
        None => "<unknown-trace-id>",
        Some(header_value) => match header_value.to_str() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("malformed trace id :: {:?}", header_value);
                "<malformed-trace-id>"
            }
        },
    };

    // error_span! so the span survives restrictive log levels and any
    // warn!/error! emitted deeper in the pipeline keeps its request context
    tracing::error_span!(
        "request",
        %trace_id,
        method = %request.method(),
        uri = %request.uri(),
    )
}
