use cache::{Invalidation, Tag};
use dashcache::DashCache;
use data_access::DataAccess;

use crate::db::tags;

#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub url: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct ProductDetails {
    pub name: String,
    pub url: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, sqlx::FromRow)]
pub struct ProductCustomization {
    pub class_prefix: Option<String>,
    pub location_message: String,
    pub background_color: String,
    pub text_color: String,
    pub font_size: String,
    pub banner_container: String,
    pub is_sticky: bool,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct CountryGroupDiscounts {
    pub id: i64,
    pub name: String,
    pub recommended_discount_percentage: Option<f64>,
    pub countries: Vec<CountrySummary>,
    pub discount: Option<Discount>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct CountrySummary {
    pub name: String,
    pub code: String,
}

#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct Discount {
    pub coupon: String,
    /// Fraction, 0.5 = 50% off.
    pub discount_percentage: f64,
}

/// Everything the public embed endpoint needs in one cached lookup,
/// keyed by (product, visitor country).
#[derive(Debug, Clone)]
pub struct BannerData {
    pub product_id: i64,
    pub user_id: String,
    pub customization: ProductCustomization,
    pub country: Option<BannerCountry>,
    pub discount: Option<Discount>,
}

#[derive(Debug, Clone)]
pub struct BannerCountry {
    pub id: i64,
    pub name: String,
}

pub async fn get_product(
    data: &DataAccess,
    id: i64,
    user_id: &str,
) -> Result<Option<Product>, data_access::Error> {
    let owner = user_id.to_string();
    data.read(
        {
            let owner = owner.clone();
            |pool| async move {
                sqlx::query_as::<_, Product>(
                    "SELECT id, user_id, name, url, description
                     FROM products WHERE id = ? AND user_id = ?",
                )
                .bind(id)
                .bind(owner)
                .fetch_optional(pool)
                .await
            }
        },
        "product",
        (id, owner),
        |_| vec![Tag::entity(id, tags::PRODUCTS)],
        DashCache::<(i64, String), Option<Product>>::new,
    )
    .await
}

pub async fn get_products(
    data: &DataAccess,
    user_id: &str,
) -> Result<Vec<Product>, data_access::Error> {
    let owner = user_id.to_string();
    data.read(
        {
            let owner = owner.clone();
            |pool| async move {
                sqlx::query_as::<_, Product>(
                    "SELECT id, user_id, name, url, description
                     FROM products WHERE user_id = ?
                     ORDER BY created_at DESC, id DESC",
                )
                .bind(owner)
                .fetch_all(pool)
                .await
            }
        },
        "products_for_user",
        owner.clone(),
        |_| vec![Tag::user(owner, tags::PRODUCTS)],
        DashCache::<String, Vec<Product>>::new,
    )
    .await
}

pub async fn get_products_count(
    data: &DataAccess,
    user_id: &str,
) -> Result<i64, data_access::Error> {
    let owner = user_id.to_string();
    data.read(
        {
            let owner = owner.clone();
            |pool| async move {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products WHERE user_id = ?")
                    .bind(owner)
                    .fetch_one(pool)
                    .await
            }
        },
        "products_count",
        owner.clone(),
        |_| vec![Tag::user(owner, tags::PRODUCTS)],
        DashCache::<String, i64>::new,
    )
    .await
}

/// Inserts the product together with its default customization row.
pub async fn create_product(
    data: &DataAccess,
    user_id: &str,
    details: ProductDetails,
) -> Result<Product, data_access::Error> {
    let owner = user_id.to_string();
    data.write(
        {
            let owner = owner.clone();
            |pool| async move {
                let mut tx = pool.begin().await?;

                let product = sqlx::query_as::<_, Product>(
                    "INSERT INTO products (user_id, name, url, description)
                     VALUES (?, ?, ?, ?)
                     RETURNING id, user_id, name, url, description",
                )
                .bind(owner)
                .bind(details.name)
                .bind(details.url)
                .bind(details.description)
                .fetch_one(&mut *tx)
                .await?;

                sqlx::query("INSERT INTO product_customizations (product_id) VALUES (?)")
                    .bind(product.id)
                    .execute(&mut *tx)
                    .await?;

                tx.commit().await?;
                Ok(product)
            }
        },
        |product: &Product| {
            vec![
                Invalidation::of(tags::PRODUCTS)
                    .for_user(owner)
                    .for_entity(product.id),
            ]
        },
    )
    .await
}

pub async fn update_product(
    data: &DataAccess,
    id: i64,
    user_id: &str,
    details: ProductDetails,
) -> Result<bool, data_access::Error> {
    let owner = user_id.to_string();
    data.write(
        {
            let owner = owner.clone();
            |pool| async move {
                let result = sqlx::query(
                    "UPDATE products
                     SET name = ?, url = ?, description = ?, updated_at = datetime('now')
                     WHERE id = ? AND user_id = ?",
                )
                .bind(details.name)
                .bind(details.url)
                .bind(details.description)
                .bind(id)
                .bind(owner)
                .execute(pool)
                .await?;
                Ok(result.rows_affected() > 0)
            }
        },
        |updated: &bool| match updated {
            true => vec![
                Invalidation::of(tags::PRODUCTS)
                    .for_user(owner)
                    .for_entity(id),
            ],
            false => vec![],
        },
    )
    .await
}

pub async fn delete_product(
    data: &DataAccess,
    id: i64,
    user_id: &str,
) -> Result<bool, data_access::Error> {
    let owner = user_id.to_string();
    data.write(
        {
            let owner = owner.clone();
            |pool| async move {
                let result = sqlx::query("DELETE FROM products WHERE id = ? AND user_id = ?")
                    .bind(id)
                    .bind(owner)
                    .execute(pool)
                    .await?;
                Ok(result.rows_affected() > 0)
            }
        },
        |deleted: &bool| match deleted {
            true => vec![
                Invalidation::of(tags::PRODUCTS)
                    .for_user(owner)
                    .for_entity(id),
            ],
            false => vec![],
        },
    )
    .await
}

/// User removal: drops every product (cascades take the customizations,
/// discounts and views with them). Entity-tagged entries are keyed by the
/// removed ids, so each one needs its own invalidation.
pub async fn delete_all_products_for_user(
    data: &DataAccess,
    user_id: &str,
) -> Result<Vec<i64>, data_access::Error> {
    let owner = user_id.to_string();
    data.write(
        {
            let owner = owner.clone();
            |pool| async move {
                sqlx::query_scalar::<_, i64>("DELETE FROM products WHERE user_id = ? RETURNING id")
                    .bind(owner)
                    .fetch_all(pool)
                    .await
            }
        },
        |removed: &Vec<i64>| {
            let mut invalidations = vec![
                Invalidation::of(tags::PRODUCTS).for_user(owner.clone()),
                Invalidation::of(tags::PRODUCT_VIEWS).for_user(owner.clone()),
            ];
            for &id in removed {
                invalidations.push(
                    Invalidation::of(tags::PRODUCTS)
                        .for_user(owner.clone())
                        .for_entity(id),
                );
            }
            invalidations
        },
    )
    .await
}

pub async fn get_product_customization(
    data: &DataAccess,
    product_id: i64,
    user_id: &str,
) -> Result<Option<ProductCustomization>, data_access::Error> {
    let owner = user_id.to_string();
    data.read(
        {
            let owner = owner.clone();
            |pool| async move {
                sqlx::query_as::<_, ProductCustomization>(
                    "SELECT pc.class_prefix, pc.location_message, pc.background_color,
                            pc.text_color, pc.font_size, pc.banner_container, pc.is_sticky
                     FROM product_customizations pc
                     INNER JOIN products p ON p.id = pc.product_id
                     WHERE pc.product_id = ? AND p.user_id = ?",
                )
                .bind(product_id)
                .bind(owner)
                .fetch_optional(pool)
                .await
            }
        },
        "product_customization",
        (product_id, owner),
        |_| vec![Tag::entity(product_id, tags::PRODUCTS)],
        DashCache::<(i64, String), Option<ProductCustomization>>::new,
    )
    .await
}

pub async fn update_product_customization(
    data: &DataAccess,
    product_id: i64,
    user_id: &str,
    customization: ProductCustomization,
) -> Result<bool, data_access::Error> {
    let owner = user_id.to_string();
    data.write(
        {
            let owner = owner.clone();
            |pool| async move {
                let result = sqlx::query(
                    "UPDATE product_customizations
                     SET class_prefix = ?, location_message = ?, background_color = ?,
                         text_color = ?, font_size = ?, banner_container = ?, is_sticky = ?
                     WHERE product_id = ?
                       AND product_id IN (SELECT id FROM products WHERE id = ? AND user_id = ?)",
                )
                .bind(customization.class_prefix)
                .bind(customization.location_message)
                .bind(customization.background_color)
                .bind(customization.text_color)
                .bind(customization.font_size)
                .bind(customization.banner_container)
                .bind(customization.is_sticky)
                .bind(product_id)
                .bind(product_id)
                .bind(owner)
                .execute(pool)
                .await?;
                Ok(result.rows_affected() > 0)
            }
        },
        |updated: &bool| match updated {
            true => vec![
                Invalidation::of(tags::PRODUCTS)
                    .for_user(owner)
                    .for_entity(product_id),
            ],
            false => vec![],
        },
    )
    .await
}

/// Every country group with its member countries and, where configured,
/// this product's discount for the group. Ownership is the caller's problem.
pub async fn get_product_country_groups(
    data: &DataAccess,
    product_id: i64,
) -> Result<Vec<CountryGroupDiscounts>, data_access::Error> {
    #[derive(Debug, Clone, sqlx::FromRow)]
    struct GroupRow {
        id: i64,
        name: String,
        recommended_discount_percentage: Option<f64>,
    }

    #[derive(Debug, Clone, sqlx::FromRow)]
    struct CountryRow {
        country_group_id: i64,
        name: String,
        code: String,
    }

    #[derive(Debug, Clone, sqlx::FromRow)]
    struct DiscountRow {
        country_group_id: i64,
        coupon: String,
        discount_percentage: f64,
    }

    data.read(
        |pool| async move {
            let groups = sqlx::query_as::<_, GroupRow>(
                "SELECT id, name, recommended_discount_percentage
                 FROM country_groups ORDER BY recommended_discount_percentage DESC",
            )
            .fetch_all(pool)
            .await?;

            let countries = sqlx::query_as::<_, CountryRow>(
                "SELECT country_group_id, name, code FROM countries ORDER BY name",
            )
            .fetch_all(pool)
            .await?;

            let discounts = sqlx::query_as::<_, DiscountRow>(
                "SELECT country_group_id, coupon, discount_percentage
                 FROM country_group_discounts WHERE product_id = ?",
            )
            .bind(product_id)
            .fetch_all(pool)
            .await?;

            Ok(groups
                .into_iter()
                .map(|group| CountryGroupDiscounts {
                    id: group.id,
                    name: group.name,
                    recommended_discount_percentage: group.recommended_discount_percentage,
                    countries: countries
                        .iter()
                        .filter(|country| country.country_group_id == group.id)
                        .map(|country| CountrySummary {
                            name: country.name.clone(),
                            code: country.code.clone(),
                        })
                        .collect(),
                    discount: discounts
                        .iter()
                        .find(|discount| discount.country_group_id == group.id)
                        .map(|discount| Discount {
                            coupon: discount.coupon.clone(),
                            discount_percentage: discount.discount_percentage,
                        }),
                })
                .collect())
        },
        "product_country_groups",
        product_id,
        |_| {
            vec![
                Tag::entity(product_id, tags::PRODUCTS),
                Tag::global(tags::COUNTRIES),
                Tag::global(tags::COUNTRY_GROUPS),
            ]
        },
        DashCache::<i64, Vec<CountryGroupDiscounts>>::new,
    )
    .await
}

/// Replaces the product's per-group discounts: `upserts` overwrite,
/// `deletes` clear the group back to "no discount".
pub async fn update_country_discounts(
    data: &DataAccess,
    product_id: i64,
    user_id: &str,
    deletes: Vec<i64>,
    upserts: Vec<(i64, String, f64)>,
) -> Result<(), data_access::Error> {
    let owner = user_id.to_string();
    data.write(
        |pool| async move {
            let mut tx = pool.begin().await?;

            for country_group_id in deletes {
                sqlx::query(
                    "DELETE FROM country_group_discounts
                     WHERE product_id = ? AND country_group_id = ?",
                )
                .bind(product_id)
                .bind(country_group_id)
                .execute(&mut *tx)
                .await?;
            }

            for (country_group_id, coupon, discount_percentage) in upserts {
                sqlx::query(
                    "INSERT INTO country_group_discounts
                         (country_group_id, product_id, coupon, discount_percentage)
                     VALUES (?, ?, ?, ?)
                     ON CONFLICT (country_group_id, product_id) DO UPDATE
                     SET coupon = excluded.coupon,
                         discount_percentage = excluded.discount_percentage",
                )
                .bind(country_group_id)
                .bind(product_id)
                .bind(coupon)
                .bind(discount_percentage)
                .execute(&mut *tx)
                .await?;
            }

            tx.commit().await?;
            Ok(())
        },
        |_: &()| {
            vec![
                Invalidation::of(tags::PRODUCTS)
                    .for_user(owner)
                    .for_entity(product_id),
            ]
        },
    )
    .await
}

pub async fn get_product_for_banner(
    data: &DataAccess,
    product_id: i64,
    country_code: &str,
) -> Result<Option<BannerData>, data_access::Error> {
    #[derive(Debug, Clone, sqlx::FromRow)]
    struct ProductRow {
        id: i64,
        user_id: String,
        class_prefix: Option<String>,
        location_message: String,
        background_color: String,
        text_color: String,
        font_size: String,
        banner_container: String,
        is_sticky: bool,
    }

    #[derive(Debug, Clone, sqlx::FromRow)]
    struct CountryRow {
        id: i64,
        name: String,
        country_group_id: i64,
    }

    let code = country_code.to_string();
    data.read(
        {
            let code = code.clone();
            |pool| async move {
                let Some(product) = sqlx::query_as::<_, ProductRow>(
                    "SELECT p.id, p.user_id, pc.class_prefix, pc.location_message,
                            pc.background_color, pc.text_color, pc.font_size,
                            pc.banner_container, pc.is_sticky
                     FROM products p
                     INNER JOIN product_customizations pc ON pc.product_id = p.id
                     WHERE p.id = ?",
                )
                .bind(product_id)
                .fetch_optional(pool)
                .await?
                else {
                    return Ok(None);
                };

                let country = sqlx::query_as::<_, CountryRow>(
                    "SELECT id, name, country_group_id FROM countries WHERE code = ?",
                )
                .bind(code)
                .fetch_optional(pool)
                .await?;

                let discount = match &country {
                    Some(country) => {
                        sqlx::query_as::<_, Discount>(
                            "SELECT coupon, discount_percentage
                             FROM country_group_discounts
                             WHERE country_group_id = ? AND product_id = ?",
                        )
                        .bind(country.country_group_id)
                        .bind(product_id)
                        .fetch_optional(pool)
                        .await?
                    }
                    None => None,
                };

                Ok(Some(BannerData {
                    product_id: product.id,
                    user_id: product.user_id,
                    customization: ProductCustomization {
                        class_prefix: product.class_prefix,
                        location_message: product.location_message,
                        background_color: product.background_color,
                        text_color: product.text_color,
                        font_size: product.font_size,
                        banner_container: product.banner_container,
                        is_sticky: product.is_sticky,
                    },
                    country: country.map(|country| BannerCountry {
                        id: country.id,
                        name: country.name,
                    }),
                    discount,
                }))
            }
        },
        "product_for_banner",
        (product_id, code),
        |_| {
            vec![
                Tag::entity(product_id, tags::PRODUCTS),
                Tag::global(tags::COUNTRIES),
                Tag::global(tags::COUNTRY_GROUPS),
            ]
        },
        DashCache::<(i64, String), Option<BannerData>>::new,
    )
    .await
}
