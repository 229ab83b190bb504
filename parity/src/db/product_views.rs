use cache::{Invalidation, Tag};
use dashcache::DashCache;
use data_access::DataAccess;
use time::OffsetDateTime;

use crate::db::tags;

#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct CountryViews {
    pub country_name: String,
    pub country_code: String,
    pub views: i64,
}

pub async fn get_product_view_count(
    data: &DataAccess,
    user_id: &str,
    since: OffsetDateTime,
) -> Result<i64, data_access::Error> {
    let owner = user_id.to_string();
    data.read(
        {
            let owner = owner.clone();
            |pool| async move {
                sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*)
                     FROM product_views pv
                     INNER JOIN products p ON p.id = pv.product_id
                     WHERE p.user_id = ? AND pv.visited_at >= ?",
                )
                .bind(owner)
                .bind(since)
                .fetch_one(pool)
                .await
            }
        },
        "product_view_count",
        (owner.clone(), since.unix_timestamp()),
        |_| vec![Tag::user(owner, tags::PRODUCT_VIEWS)],
        DashCache::<(String, i64), i64>::new,
    )
    .await
}

/// Chart data: views per visitor country over the interval, one user's
/// products or a single product. Capped at the top 25 countries.
pub async fn get_views_by_country(
    data: &DataAccess,
    user_id: &str,
    product_id: Option<i64>,
    since: OffsetDateTime,
) -> Result<Vec<CountryViews>, data_access::Error> {
    let owner = user_id.to_string();
    data.read(
        {
            let owner = owner.clone();
            |pool| async move {
                sqlx::query_as::<_, CountryViews>(
                    "SELECT c.name AS country_name, c.code AS country_code, COUNT(*) AS views
                     FROM product_views pv
                     INNER JOIN products p ON p.id = pv.product_id
                     INNER JOIN countries c ON c.id = pv.country_id
                     WHERE p.user_id = ?
                       AND pv.visited_at >= ?
                       AND (? IS NULL OR p.id = ?)
                     GROUP BY c.code, c.name
                     ORDER BY views DESC
                     LIMIT 25",
                )
                .bind(owner)
                .bind(since)
                .bind(product_id)
                .bind(product_id)
                .fetch_all(pool)
                .await
            }
        },
        "views_by_country",
        (owner.clone(), product_id, since.unix_timestamp()),
        |_| {
            vec![
                Tag::user(owner.clone(), tags::PRODUCT_VIEWS),
                match product_id {
                    Some(product_id) => Tag::entity(product_id, tags::PRODUCTS),
                    None => Tag::user(owner, tags::PRODUCTS),
                },
                Tag::global(tags::COUNTRIES),
            ]
        },
        DashCache::<(String, Option<i64>, i64), Vec<CountryViews>>::new,
    )
    .await
}

pub async fn record_product_view(
    data: &DataAccess,
    product_id: i64,
    country_id: Option<i64>,
    owner_user_id: &str,
) -> Result<(), data_access::Error> {
    let owner = owner_user_id.to_string();
    data.write(
        |pool| async move {
            sqlx::query(
                "INSERT INTO product_views (product_id, country_id, visited_at)
                 VALUES (?, ?, ?)",
            )
            .bind(product_id)
            .bind(country_id)
            .bind(OffsetDateTime::now_utc())
            .execute(pool)
            .await?;
            Ok(())
        },
        |_: &()| {
            vec![
                Invalidation::of(tags::PRODUCT_VIEWS)
                    .for_user(owner)
                    .for_entity(product_id),
            ]
        },
    )
    .await
}
