mod api;
mod core;
mod db;

#[cfg(feature = "tracing")]
mod span;

use std::net::SocketAddr;

use axum::{Router, extract::FromRef, middleware::from_fn};
use contextual::Context;
use data_access::DataAccess;
use http::HeaderName;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

pub use crate::core::tiers::Tier;

#[derive(Debug)]
pub struct ServerOpts {
    pub database: DatabaseConfig,

    /// Country code to assume when the edge did not set `x-country-code`.
    /// Meant for local development only.
    pub test_country_code: Option<String>,
}

#[derive(Debug)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Clone)]
pub struct AppState {
    pub data: DataAccess,
    pub test_country_code: Option<String>,
}

pub async fn router(opts: ServerOpts) -> Result<Router, ServerError> {
    use crate::api::{analytics, banner, heartbeat, products, subscription, users};

    let pool = opts
        .database
        .pool()
        .await
        .context(format!("connect database :: {}", opts.database.url))?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("run migrations")?;

    let router = Router::new()
        .route(analytics::views_by_country::PATH, analytics::views_by_country::method_router())
        .route(banner::PATH, banner::method_router())
        .route(heartbeat::PATH, heartbeat::method_router())
        .route(products::PATH, products::method_router())
        .route(products::detail::PATH, products::detail::method_router())
        .route(
            products::customization::PATH,
            products::customization::method_router(),
        )
        .route(
            products::country_discounts::PATH,
            products::country_discounts::method_router(),
        )
        .route(subscription::PATH, subscription::method_router())
        .route(users::PATH, users::method_router())
        .route(users::detail::PATH, users::detail::method_router())
        .route(users::tier::PATH, users::tier::method_router());

    const X_TRACE_ID: HeaderName = HeaderName::from_static("x-trace-id");
    let middleware_stack = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(X_TRACE_ID, MakeRequestUuid))
        .layer(PropagateRequestIdLayer::new(X_TRACE_ID));

    #[cfg(feature = "tracing")]
    let middleware_stack = middleware_stack
        .layer(tower_http::trace::TraceLayer::new_for_http().make_span_with(span::span))
        .layer(from_fn(middleware::latency_ms));

    let middleware_stack = middleware_stack.layer(from_fn(middleware::handle_leaked_5xx));

    let router = router.layer(middleware_stack);

    let router = router.with_state(AppState {
        data: DataAccess::new(pool),
        test_country_code: opts.test_country_code,
    });

    Ok(router)
}

/// Returns the local address that the listener is bound to.
/// Useful when binding to port 0 to figure out which port was actually bound.
pub async fn serve(server: Router, port: u16) -> Result<SocketAddr, ServerError> {
    let listener = TcpListener::bind(SocketAddr::from(([0, 0, 0, 0], port)))
        .await
        .context("bind")?;

    let local_addr = listener.local_addr().context("local_addr")?;

    #[cfg(feature = "tracing")]
    tracing::info!("listening on {}", local_addr);

    axum::serve(listener, server.into_make_service())
        .await
        .context("axum::serve")?;
    Ok(local_addr)
}

#[derive(thiserror::Error, Debug)]
pub enum ServerError {
    #[error("{0}")]
    Sqlx(#[from] contextual::Error<sqlx::Error>),

    #[error("{0}")]
    Migrate(#[from] contextual::Error<sqlx::migrate::MigrateError>),

    #[error("{0}")]
    Io(#[from] contextual::Error<std::io::Error>),
}

impl DatabaseConfig {
    pub async fn pool(&self) -> Result<sqlx::Pool<sqlx::Sqlite>, sqlx::Error> {
        let options = SqliteConnectOptions::new()
            .filename(&self.url)
            .create_if_missing(true)
            .foreign_keys(true);

        SqlitePoolOptions::new().connect_with(options).await
    }
}

impl FromRef<AppState> for DataAccess {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.data.clone()
    }
}
