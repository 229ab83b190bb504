use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{MethodRouter, get},
};
use axum_macros::debug_handler;
use serde::Deserialize;
use time::{Duration, OffsetDateTime, Time};

use crate::{
    AppState,
    core::{permissions, principal::AuthedUser},
    db::product_views::{self, CountryViews},
};

pub const PATH: &str = "/analytics/views-by-country";

pub fn method_router() -> MethodRouter<AppState> {
    get(handler)
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub enum Interval {
    #[default]
    #[serde(rename = "7d")]
    Last7Days,

    #[serde(rename = "30d")]
    Last30Days,

    #[serde(rename = "365d")]
    Last365Days,
}

impl Interval {
    /// Cutoff at a UTC day boundary; the cutoff is part of the cache key,
    /// so it must repeat between requests within the same day.
    fn since(self) -> OffsetDateTime {
        let days = match self {
            Interval::Last7Days => 7,
            Interval::Last30Days => 30,
            Interval::Last365Days => 365,
        };
        (OffsetDateTime::now_utc() - Duration::days(days)).replace_time(Time::MIDNIGHT)
    }
}

#[derive(Debug, Deserialize)]
pub struct Params {
    #[serde(default)]
    pub interval: Interval,
    pub product_id: Option<i64>,
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("current tier cannot access analytics")]
    AnalyticsNotAllowed,

    #[error("{0}")]
    DataAccess(#[from] data_access::Error),
}

#[debug_handler]
#[cfg_attr(feature = "tracing", tracing::instrument(fields(%user_id), skip_all))]
pub async fn handler(
    State(AppState { data, .. }): State<AppState>,
    AuthedUser { user_id }: AuthedUser,
    Query(params): Query<Params>,
) -> Result<Json<Vec<CountryViews>>, Error> {
    if !permissions::can_access_analytics(&data, &user_id).await? {
        return Err(Error::AnalyticsNotAllowed);
    }

    let views = product_views::get_views_by_country(
        &data,
        &user_id,
        params.product_id,
        params.interval.since(),
    )
    .await?;

    Ok(Json(views))
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::AnalyticsNotAllowed => {
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
