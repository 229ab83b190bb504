use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{MethodRouter, get},
};
use axum_macros::debug_handler;

use crate::{
    AppState,
    core::principal::AuthedUser,
    db::products::{self, Product, ProductDetails},
};

pub const PATH: &str = "/products/{product_id}";

pub fn method_router() -> MethodRouter<AppState> {
    get(get_handler).put(update_handler).delete(delete_handler)
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("product not found")]
    NotFound,

    #[error("{0}")]
    InvalidDetails(&'static str),

    #[error("{0}")]
    DataAccess(#[from] data_access::Error),
}

#[debug_handler]
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(fields(%user_id, %product_id), skip_all)
)]
pub async fn get_handler(
    State(AppState { data, .. }): State<AppState>,
    AuthedUser { user_id }: AuthedUser,
    Path(product_id): Path<i64>,
) -> Result<Json<Product>, Error> {
    let product = products::get_product(&data, product_id, &user_id)
        .await?
        .ok_or(Error::NotFound)?;
    Ok(Json(product))
}

#[debug_handler]
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(fields(%user_id, %product_id), skip_all)
)]
pub async fn update_handler(
    State(AppState { data, .. }): State<AppState>,
    AuthedUser { user_id }: AuthedUser,
    Path(product_id): Path<i64>,
    Json(details): Json<ProductDetails>,
) -> Result<StatusCode, Error> {
    let details = super::validate_details(details).map_err(Error::InvalidDetails)?;

    match products::update_product(&data, product_id, &user_id, details).await? {
        true => Ok(StatusCode::NO_CONTENT),
        false => Err(Error::NotFound),
    }
}

#[debug_handler]
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(fields(%user_id, %product_id), skip_all)
)]
pub async fn delete_handler(
    State(AppState { data, .. }): State<AppState>,
    AuthedUser { user_id }: AuthedUser,
    Path(product_id): Path<i64>,
) -> Result<StatusCode, Error> {
    match products::delete_product(&data, product_id, &user_id).await? {
        true => Ok(StatusCode::NO_CONTENT),
        false => Err(Error::NotFound),
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => {
                #[cfg(feature = "tracing")]
                tracing::info!("{:?}", self);

                StatusCode::NOT_FOUND.into_response()
            }
            Error::InvalidDetails(message) => {
                #[cfg(feature = "tracing")]
                tracing::info!("{:?}", self);

                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(error_response::ErrorResponse::new(message)),
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
