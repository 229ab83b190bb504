use cache::{Invalidation, Tag};
use dashcache::DashCache;
use data_access::DataAccess;

use crate::core::tiers::Tier;
use crate::db::tags;

#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct Subscription {
    pub id: i64,
    pub user_id: String,
    pub tier: Tier,
}

/// Provision the default (free) subscription for a new user.
/// Returns false when the user was already provisioned.
pub async fn create_user_subscription(
    data: &DataAccess,
    user_id: &str,
) -> Result<bool, data_access::Error> {
    let owner = user_id.to_string();
    let created = data
        .write(
            {
                let owner = owner.clone();
                |pool| async move {
                    sqlx::query_scalar::<_, i64>(
                        "INSERT INTO user_subscriptions (user_id) VALUES (?)
                         ON CONFLICT (user_id) DO NOTHING
                         RETURNING id",
                    )
                    .bind(owner)
                    .fetch_optional(pool)
                    .await
                }
            },
            |inserted: &Option<i64>| match inserted {
                Some(id) => vec![
                    Invalidation::of(tags::SUBSCRIPTIONS)
                        .for_user(owner)
                        .for_entity(*id),
                ],
                None => vec![],
            },
        )
        .await?;

    Ok(created.is_some())
}

pub async fn get_user_subscription(
    data: &DataAccess,
    user_id: &str,
) -> Result<Option<Subscription>, data_access::Error> {
    let owner = user_id.to_string();
    data.read(
        {
            let owner = owner.clone();
            |pool| async move {
                sqlx::query_as::<_, Subscription>(
                    "SELECT id, user_id, tier FROM user_subscriptions WHERE user_id = ?",
                )
                .bind(owner)
                .fetch_optional(pool)
                .await
            }
        },
        "user_subscription",
        owner.clone(),
        |_| vec![Tag::user(owner, tags::SUBSCRIPTIONS)],
        DashCache::<String, Option<Subscription>>::new,
    )
    .await
}

pub async fn get_user_tier(
    data: &DataAccess,
    user_id: &str,
) -> Result<Option<Tier>, data_access::Error> {
    Ok(get_user_subscription(data, user_id)
        .await?
        .map(|subscription| subscription.tier))
}

/// Tier changes arrive from the billing provider's webhook handler.
pub async fn update_user_tier(
    data: &DataAccess,
    user_id: &str,
    tier: Tier,
) -> Result<bool, data_access::Error> {
    let owner = user_id.to_string();
    let updated = data
        .write(
            {
                let owner = owner.clone();
                |pool| async move {
                    sqlx::query_scalar::<_, i64>(
                        "UPDATE user_subscriptions
                         SET tier = ?, updated_at = datetime('now')
                         WHERE user_id = ?
                         RETURNING id",
                    )
                    .bind(tier)
                    .bind(owner)
                    .fetch_optional(pool)
                    .await
                }
            },
            |updated: &Option<i64>| match updated {
                Some(id) => vec![
                    Invalidation::of(tags::SUBSCRIPTIONS)
                        .for_user(owner)
                        .for_entity(*id),
                ],
                None => vec![],
            },
        )
        .await?;

    Ok(updated.is_some())
}

pub async fn delete_user_subscription(
    data: &DataAccess,
    user_id: &str,
) -> Result<bool, data_access::Error> {
    let owner = user_id.to_string();
    let deleted = data
        .write(
            {
                let owner = owner.clone();
                |pool| async move {
                    sqlx::query_scalar::<_, i64>(
                        "DELETE FROM user_subscriptions WHERE user_id = ? RETURNING id",
                    )
                    .bind(owner)
                    .fetch_optional(pool)
                    .await
                }
            },
            |deleted: &Option<i64>| match deleted {
                Some(id) => vec![
                    Invalidation::of(tags::SUBSCRIPTIONS)
                        .for_user(owner)
                        .for_entity(*id),
                ],
                None => vec![],
            },
        )
        .await?;

    Ok(deleted.is_some())
}
