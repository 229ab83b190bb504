use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{MethodRouter, put},
};
use axum_macros::debug_handler;
use serde::Deserialize;

use crate::{AppState, core::tiers::Tier, db::subscriptions};

/// Tier changes come from the billing provider's webhook handler,
/// not from end users.
pub const PATH: &str = "/users/{user_id}/tier";

pub fn method_router() -> MethodRouter<AppState> {
    put(handler)
}

#[derive(Debug, Deserialize)]
pub struct TierChange {
    pub tier: Tier,
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("user has no subscription")]
    NoSubscription,

    #[error("{0}")]
    DataAccess(#[from] data_access::Error),
}

#[debug_handler]
#[cfg_attr(feature = "tracing", tracing::instrument(fields(%user_id), skip_all))]
pub async fn handler(
    State(AppState { data, .. }): State<AppState>,
    Path(user_id): Path<String>,
    Json(TierChange { tier }): Json<TierChange>,
) -> Result<StatusCode, Error> {
    match subscriptions::update_user_tier(&data, &user_id, tier).await? {
        true => {
            #[cfg(feature = "tracing")]
            tracing::info!(?tier, "tier updated");

            Ok(StatusCode::NO_CONTENT)
        }
        false => Err(Error::NoSubscription),
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NoSubscription => {
                #[cfg(feature = "tracing")]
                tracing::info!("{:?}", self);

                StatusCode::NOT_FOUND.into_response()
            }
            Error::DataAccess(_) => {
                #[cfg(feature = "tracing")]
                tracing::error!("{:?}", self);

                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
