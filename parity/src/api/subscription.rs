use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{MethodRouter, get},
};
use axum_macros::debug_handler;
use serde::Serialize;

use crate::{
    AppState,
    core::{
        permissions,
        principal::AuthedUser,
        tiers::{Tier, TierLimits},
    },
    db::{product_views, products, subscriptions},
};

pub const PATH: &str = "/subscription";

pub fn method_router() -> MethodRouter<AppState> {
    get(handler)
}

#[derive(Debug, Serialize)]
pub struct SubscriptionStatus {
    pub tier: Tier,
    pub limits: &'static TierLimits,
    pub product_count: i64,
    pub views_this_month: i64,
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
    AuthedUser { user_id }: AuthedUser,
) -> Result<Json<SubscriptionStatus>, Error> {
    let tier = subscriptions::get_user_tier(&data, &user_id)
        .await?
        .ok_or(Error::NoSubscription)?;

    let product_count = products::get_products_count(&data, &user_id).await?;
    let views_this_month =
        product_views::get_product_view_count(&data, &user_id, permissions::start_of_month())
            .await?;

    Ok(Json(SubscriptionStatus {
        tier,
        limits: tier.limits(),
        product_count,
        views_this_month,
    }))
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
