use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{MethodRouter, get},
};
use axum_macros::debug_handler;
use serde::Deserialize;

use crate::{
    AppState,
    core::{principal::AuthedUser, validate},
    db::products::{self, CountryGroupDiscounts},
};

pub const PATH: &str = "/products/{product_id}/country-discounts";

pub fn method_router() -> MethodRouter<AppState> {
    get(get_handler).put(update_handler)
}

#[derive(Debug, Deserialize)]
pub struct DiscountUpdates {
    pub groups: Vec<GroupDiscount>,
}

/// A group with no coupon or no positive percentage clears its discount,
/// mirroring how the dashboard form submits every group at once.
#[derive(Debug, Deserialize)]
pub struct GroupDiscount {
    pub country_group_id: i64,
    pub coupon: Option<String>,
    /// Whole percentage (1-100) as entered; stored as a fraction.
    pub discount_percentage: Option<f64>,
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("product not found")]
    NotFound,

    #[error("{0}")]
    InvalidDiscount(&'static str),

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
) -> Result<Json<Vec<CountryGroupDiscounts>>, Error> {
    products::get_product(&data, product_id, &user_id)
        .await?
        .ok_or(Error::NotFound)?;

    let groups = products::get_product_country_groups(&data, product_id).await?;
    Ok(Json(groups))
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
    Json(updates): Json<DiscountUpdates>,
) -> Result<StatusCode, Error> {
    products::get_product(&data, product_id, &user_id)
        .await?
        .ok_or(Error::NotFound)?;

    let mut deletes = Vec::new();
    let mut upserts = Vec::new();

    for group in updates.groups {
        match (group.coupon, group.discount_percentage) {
            (Some(coupon), Some(percentage)) if !coupon.is_empty() && percentage > 0.0 => {
                let coupon = validate::validate_coupon(coupon).map_err(Error::InvalidDiscount)?;
                let percentage = validate::validate_discount_percentage(percentage)
                    .map_err(Error::InvalidDiscount)?;
                upserts.push((group.country_group_id, coupon, percentage / 100.0));
            }
            _ => deletes.push(group.country_group_id),
        }
    }

    products::update_country_discounts(&data, product_id, &user_id, deletes, upserts).await?;
    Ok(StatusCode::NO_CONTENT)
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => {
                #[cfg(feature = "tracing")]
                tracing::info!("{:?}", self);

                StatusCode::NOT_FOUND.into_response()
            }
            Error::InvalidDiscount(message) => {
                #[cfg(feature = "tracing")]
                tracing::info!("{:?}", self);

                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(error_response::ErrorResponse::new(message).with_help(
                        "send the discount as a whole percentage between 1 and 100; \
                         leave coupon and percentage empty to clear a group",
                    )),
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
