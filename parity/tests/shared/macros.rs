#[macro_export]
macro_rules! request {
    ( $method:ident $url:expr $( ; $header:literal => $value:expr )* ) => {{
        #[allow(unused_mut)]
        let mut builder = http::Request::builder()
            .method(stringify!($method))
            .uri($url);
        $( builder = builder.header($header, $value); )*
        builder
            .body(axum::body::Body::empty())
            .expect("unable to build request")
    }};
    ( $method:ident $url:expr $( ; $header:literal => $value:expr )* ; json $body:tt ) => {{
        #[allow(unused_mut)]
        let mut builder = http::Request::builder()
            .method(stringify!($method))
            .uri($url)
            .header("content-type", "application/json");
        $( builder = builder.header($header, $value); )*
        builder
            .body(axum::body::Body::from(
                serde_json::json!($body).to_string(),
            ))
            .expect("unable to build request")
    }};
    ( $method:ident $url:expr $( ; $header:literal => $value:expr )* ; json_value $body:expr ) => {{
        #[allow(unused_mut)]
        let mut builder = http::Request::builder()
            .method(stringify!($method))
            .uri($url)
            .header("content-type", "application/json");
        $( builder = builder.header($header, $value); )*
        builder
            .body(axum::body::Body::from($body.to_string()))
            .expect("unable to build request")
    }};
}
