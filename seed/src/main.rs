use std::fs;

use clap::Parser;
use sqlx::SqlitePool;

#[derive(Debug, clap::Parser)]
struct Args {
    /// The sqlite database path used by the server.
    /// Example: `/var/lib/parity/data.db` (or) `./data.db`
    #[arg(long, env("DATABASE_URL"))]
    database_url: String,

    /// JSON file mapping country groups to their member countries and
    /// recommended discounts.
    #[arg(long, env("SEED_DATASET"), default_value = "./seed/data/countries-by-discount.json")]
    dataset: std::path::PathBuf,
}

#[derive(Debug, serde::Deserialize)]
struct CountryGroupSpec {
    name: String,
    recommended_discount_percentage: f64,
    countries: Vec<CountrySpec>,
}

#[derive(Debug, serde::Deserialize)]
struct CountrySpec {
    code: String,
    name: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let content = fs::read_to_string(&args.dataset)
        .unwrap_or_else(|e| exit(e, "Failed to read dataset file"));

    let groups: Vec<CountryGroupSpec> = serde_json::from_str(&content)
        .unwrap_or_else(|e| exit(e, "Failed to parse dataset file"));

    let pool = SqlitePool::connect(&args.database_url)
        .await
        .unwrap_or_else(|e| exit(e, "Failed to connect to database"));

    let mut group_count = 0_u64;
    let mut country_count = 0_u64;

    for group in &groups {
        let group_id = match sqlx::query_scalar::<_, i64>(
            "INSERT INTO country_groups (name, recommended_discount_percentage)
             VALUES (?, ?)
             ON CONFLICT (name) DO UPDATE
             SET recommended_discount_percentage = excluded.recommended_discount_percentage
             RETURNING id",
        )
        .bind(&group.name)
        .bind(group.recommended_discount_percentage)
        .fetch_one(&pool)
        .await
        {
            Ok(group_id) => group_id,
            Err(err) => {
                warn(err, format!("Failed to upsert country group `{}`", group.name));
                continue;
            }
        };
        group_count += 1;

        for country in &group.countries {
            let upserted = sqlx::query(
                "INSERT INTO countries (name, code, country_group_id)
                 VALUES (?, ?, ?)
                 ON CONFLICT (code) DO UPDATE
                 SET name = excluded.name, country_group_id = excluded.country_group_id",
            )
            .bind(&country.name)
            .bind(&country.code)
            .bind(group_id)
            .execute(&pool)
            .await;

            match upserted {
                Ok(_) => country_count += 1,
                Err(err) => warn(
                    err,
                    format!("Failed to upsert country `{}`", country.code),
                ),
            }
        }
    }

    println!("Updated {group_count} country groups and {country_count} countries");
}

fn warn(err: impl std::error::Error, message: impl AsRef<str>) {
    eprintln!("{} :: {}", message.as_ref(), err);
}

#[inline(always)]
fn exit(err: impl std::error::Error, message: impl AsRef<str>) -> ! {
    eprintln!("{} :: {}", message.as_ref(), err);
    std::process::exit(1)
}
