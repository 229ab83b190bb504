pub mod country_discounts;
pub mod customization;
pub mod detail;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{MethodRouter, get},
};
use axum_macros::debug_handler;

use crate::{
    AppState,
    core::{permissions, principal::AuthedUser, validate},
    db::products::{self, Product, ProductDetails},
};

pub const PATH: &str = "/products";

pub fn method_router() -> MethodRouter<AppState> {
    get(list_handler).post(create_handler)
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{0}")]
    InvalidDetails(&'static str),

    #[error("product limit for the current tier reached")]
    ProductLimitReached,

    #[error("{0}")]
    DataAccess(#[from] data_access::Error),
}

#[debug_handler]
#[cfg_attr(feature = "tracing", tracing::instrument(fields(%user_id), skip_all))]
pub async fn list_handler(
    State(AppState { data, .. }): State<AppState>,
    AuthedUser { user_id }: AuthedUser,
) -> Result<Json<Vec<Product>>, Error> {
    let products = products::get_products(&data, &user_id).await?;
    Ok(Json(products))
}

#[debug_handler]
#[cfg_attr(feature = "tracing", tracing::instrument(fields(%user_id), skip_all))]
pub async fn create_handler(
    State(AppState { data, .. }): State<AppState>,
    AuthedUser { user_id }: AuthedUser,
    Json(details): Json<ProductDetails>,
) -> Result<(StatusCode, Json<Product>), Error> {
    let details = validate_details(details).map_err(Error::InvalidDetails)?;

    if !permissions::can_create_product(&data, &user_id).await? {
        return Err(Error::ProductLimitReached);
    }

    let product = products::create_product(&data, &user_id, details).await?;

    #[cfg(feature = "tracing")]
    tracing::info!("product {} created", product.id);

    Ok((StatusCode::CREATED, Json(product)))
}

pub(super) fn validate_details(details: ProductDetails) -> Result<ProductDetails, &'static str> {
    validate::validate_product_name(&details.name)?;
    validate::validate_product_url(&details.url)?;
    Ok(details)
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::InvalidDetails(message) => {
                #[cfg(feature = "tracing")]
                tracing::info!("{:?}", self);

                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(error_response::ErrorResponse::new(message)),
                )
                    .into_response()
            }
            Error::ProductLimitReached => {
                #[cfg(feature = "tracing")]
                tracing::info!("{:?}", self);

                StatusCode::FORBIDDEN.into_response()
            }
            Error::DataAccess(_) => {
                #[cfg(feature = "tracing")]
                tracing::error!("{:?}", self);

                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
