use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{MethodRouter, delete},
};
use axum_macros::debug_handler;

use crate::{
    AppState,
    db::{products, subscriptions},
};

pub const PATH: &str = "/users/{user_id}";

pub fn method_router() -> MethodRouter<AppState> {
    delete(handler)
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{0}")]
    DataAccess(#[from] data_access::Error),
}

/// Tears down everything the user owns. Idempotent: deleting an unknown
/// user is still a 204.
#[debug_handler]
#[cfg_attr(feature = "tracing", tracing::instrument(fields(%user_id), skip_all))]
pub async fn handler(
    State(AppState { data, .. }): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<StatusCode, Error> {
    let removed_products = products::delete_all_products_for_user(&data, &user_id).await?;
    subscriptions::delete_user_subscription(&data, &user_id).await?;

    #[cfg(feature = "tracing")]
    tracing::info!("removed user with {} products", removed_products.len());
    #[cfg(not(feature = "tracing"))]
    let _ = removed_products;

    Ok(StatusCode::NO_CONTENT)
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::DataAccess(_) => {
                #[cfg(feature = "tracing")]
                tracing::error!("{:?}", self);

                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
