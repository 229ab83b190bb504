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
    core::{permissions, principal::AuthedUser, validate},
    db::products::{self, ProductCustomization},
};

pub const PATH: &str = "/products/{product_id}/customization";

pub fn method_router() -> MethodRouter<AppState> {
    get(get_handler).put(update_handler)
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("product not found")]
    NotFound,

    #[error("current tier cannot customize the banner")]
    CustomizationNotAllowed,

    #[error("{0}")]
    InvalidCustomization(&'static str),

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
) -> Result<Json<ProductCustomization>, Error> {
    let customization = products::get_product_customization(&data, product_id, &user_id)
        .await?
        .ok_or(Error::NotFound)?;
    Ok(Json(customization))
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
    Json(customization): Json<ProductCustomization>,
) -> Result<StatusCode, Error> {
    validate::validate_banner_container(&customization.banner_container)
        .map_err(Error::InvalidCustomization)?;

    if !permissions::can_customize_banner(&data, &user_id).await? {
        return Err(Error::CustomizationNotAllowed);
    }

    match products::update_product_customization(&data, product_id, &user_id, customization).await?
    {
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
            Error::CustomizationNotAllowed => {
                #[cfg(feature = "tracing")]
                tracing::info!("{:?}", self);

                StatusCode::FORBIDDEN.into_response()
            }
            Error::InvalidCustomization(message) => {
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
