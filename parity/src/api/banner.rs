use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{MethodRouter, get},
};
use axum_macros::debug_handler;

use crate::{
    AppState,
    core::{banner, permissions},
    db::{product_views, products},
};

/// The public embed endpoint sales pages load via a script tag. Everything
/// that prevents showing a banner is a plain 404 so the page degrades
/// silently.
pub const PATH: &str = "/banner/{product_id}";

const X_COUNTRY_CODE: &str = "x-country-code";

pub fn method_router() -> MethodRouter<AppState> {
    get(handler)
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("no banner to show")]
    NoBanner,

    #[error("{0}")]
    DataAccess(#[from] data_access::Error),
}

#[debug_handler]
#[cfg_attr(feature = "tracing", tracing::instrument(fields(%product_id), skip_all))]
pub async fn handler(
    State(AppState {
        data,
        test_country_code,
    }): State<AppState>,
    Path(product_id): Path<i64>,
    headers: HeaderMap,
) -> Result<Response, Error> {
    // the embedding page identifies itself; direct fetches get nothing
    headers
        .get(header::REFERER)
        .or_else(|| headers.get(header::ORIGIN))
        .ok_or(Error::NoBanner)?;

    let country_code = headers
        .get(X_COUNTRY_CODE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .or(test_country_code)
        .ok_or(Error::NoBanner)?;

    let banner_data = products::get_product_for_banner(&data, product_id, &country_code)
        .await?
        .ok_or(Error::NoBanner)?;

    let can_show = permissions::can_show_discount_banner(&data, &banner_data.user_id).await?;

    // the view counts against the quota whether or not a banner renders
    product_views::record_product_view(
        &data,
        banner_data.product_id,
        banner_data.country.as_ref().map(|country| country.id),
        &banner_data.user_id,
    )
    .await?;

    if !can_show {
        return Err(Error::NoBanner);
    }

    let (Some(country), Some(discount)) = (&banner_data.country, &banner_data.discount) else {
        return Err(Error::NoBanner);
    };

    let can_remove_branding =
        permissions::can_remove_branding(&data, &banner_data.user_id).await?;

    let script = banner::embed_script(&banner::Banner {
        customization: &banner_data.customization,
        country_name: &country.name,
        coupon: &discount.coupon,
        discount_percentage: discount.discount_percentage,
        can_remove_branding,
    });

    Ok((
        [(header::CONTENT_TYPE, "text/javascript")],
        script,
    )
        .into_response())
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NoBanner => {
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
