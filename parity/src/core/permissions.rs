use data_access::DataAccess;
use time::{OffsetDateTime, Time};

use crate::db::{product_views, products, subscriptions};

/// Tier checks mirror what the subscription grants; a user without a
/// subscription row can do nothing that requires one.
pub async fn can_create_product(
    data: &DataAccess,
    user_id: &str,
) -> Result<bool, data_access::Error> {
    let Some(tier) = subscriptions::get_user_tier(data, user_id).await? else {
        return Ok(false);
    };

    let count = products::get_products_count(data, user_id).await?;
    Ok(count < tier.limits().max_products)
}

pub async fn can_show_discount_banner(
    data: &DataAccess,
    user_id: &str,
) -> Result<bool, data_access::Error> {
    let Some(tier) = subscriptions::get_user_tier(data, user_id).await? else {
        return Ok(false);
    };

    let views = product_views::get_product_view_count(data, user_id, start_of_month()).await?;
    Ok(views < tier.limits().max_visits_per_month)
}

pub async fn can_access_analytics(
    data: &DataAccess,
    user_id: &str,
) -> Result<bool, data_access::Error> {
    Ok(subscriptions::get_user_tier(data, user_id)
        .await?
        .is_some_and(|tier| tier.limits().can_access_analytics))
}

pub async fn can_customize_banner(
    data: &DataAccess,
    user_id: &str,
) -> Result<bool, data_access::Error> {
    Ok(subscriptions::get_user_tier(data, user_id)
        .await?
        .is_some_and(|tier| tier.limits().can_customize_banner))
}

pub async fn can_remove_branding(
    data: &DataAccess,
    user_id: &str,
) -> Result<bool, data_access::Error> {
    Ok(subscriptions::get_user_tier(data, user_id)
        .await?
        .is_some_and(|tier| tier.limits().can_remove_branding))
}

/// Monthly visit quotas reset at midnight UTC on the first of the month.
pub fn start_of_month() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    now.replace_day(1)
        .unwrap_or(now)
        .replace_time(Time::MIDNIGHT)
}
