pub mod detail;
pub mod tier;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{MethodRouter, post},
};
use axum_macros::debug_handler;
use serde::Deserialize;

use crate::{AppState, db::subscriptions};

/// Provisioning endpoints, driven by the auth provider's user webhooks.
/// Deployment keeps these off the public edge.
pub const PATH: &str = "/users";

pub fn method_router() -> MethodRouter<AppState> {
    post(handler)
}

#[derive(Debug, Deserialize)]
pub struct NewUser {
    pub user_id: String,
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("user id must not be empty")]
    EmptyUserId,

    #[error("{0}")]
    DataAccess(#[from] data_access::Error),
}

#[debug_handler]
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
pub async fn handler(
    State(AppState { data, .. }): State<AppState>,
    Json(NewUser { user_id }): Json<NewUser>,
) -> Result<StatusCode, Error> {
    if user_id.is_empty() {
        return Err(Error::EmptyUserId);
    }

    match subscriptions::create_user_subscription(&data, &user_id).await? {
        true => {
            #[cfg(feature = "tracing")]
            tracing::info!("user {} provisioned", user_id);

            Ok(StatusCode::CREATED)
        }
        false => Ok(StatusCode::OK),
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::EmptyUserId => {
                #[cfg(feature = "tracing")]
                tracing::info!("{:?}", self);

                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(error_response::ErrorResponse::new(self.to_string())),
                )
                    .into_response()
            }
            Error::DataAccess(_) => {
                #[cfg(feature = "tracing")]
                tracing::error!("{:?}", self);

                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
