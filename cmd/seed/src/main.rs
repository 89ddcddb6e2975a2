//! Loads a demo organization into Postgres and prints a bearer token for it.
//!
//! Ids are fixed, so running the seed twice leaves the data unchanged.

use anyhow::{Context, Result};
use auth_adapters::JwtAuth;
use chrono::{DateTime, Duration, Utc};
use configs::Settings;
use domains::Session;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use storage_adapters::PostgresStore;
use tracing::info;
use uuid::Uuid;

struct DemoDonor {
    id: u128,
    first: &'static str,
    last: &'static str,
    tags: &'static [&'static str],
    /// (days ago, amount, campaign index)
    gifts: &'static [(i64, f64, usize)],
}

const CAMPAIGNS: [(u128, &str, Option<f64>, bool); 4] = [
    (0xc1, "Annual Fund", Some(50_000.0), true),
    (0xc2, "Spring Gala", Some(20_000.0), true),
    (0xc3, "Library Expansion", None, true),
    (0xc4, "Winter Coat Drive", Some(5_000.0), false),
];

const DONORS: [DemoDonor; 6] = [
    DemoDonor {
        id: 0xd1,
        first: "Margaret",
        last: "Okafor",
        tags: &["major_donor"],
        gifts: &[(2, 5_000.0, 0), (60, 2_500.0, 1)],
    },
    DemoDonor {
        id: 0xd2,
        first: "Luis",
        last: "Fernandez",
        tags: &["monthly"],
        gifts: &[(5, 50.0, 0), (35, 50.0, 0), (65, 50.0, 0)],
    },
    DemoDonor {
        id: 0xd3,
        first: "Priya",
        last: "Natarajan",
        tags: &[],
        gifts: &[(12, 250.0, 2)],
    },
    DemoDonor {
        id: 0xd4,
        first: "Henry",
        last: "Walsh",
        tags: &["major_donor"],
        gifts: &[(120, 1_000.0, 3), (400, 3_000.0, 0)],
    },
    DemoDonor {
        id: 0xd5,
        first: "Aiko",
        last: "Tanaka",
        tags: &[],
        gifts: &[(200, 75.0, 1)],
    },
    DemoDonor {
        id: 0xd6,
        first: "Samuel",
        last: "Brooks",
        tags: &["monthly"],
        gifts: &[(95, 25.0, 0), (125, 25.0, 0)],
    },
];

async fn seed_organization(pool: &PgPool, org: Uuid) -> Result<()> {
    sqlx::query("INSERT INTO organizations (id, name) VALUES ($1, $2) ON CONFLICT (id) DO NOTHING")
        .bind(org)
        .bind("Riverside Community Foundation")
        .execute(pool)
        .await?;
    Ok(())
}

async fn seed_campaigns(pool: &PgPool, org: Uuid) -> Result<()> {
    for (i, (id, name, goal, active)) in CAMPAIGNS.iter().enumerate() {
        let raised: f64 = DONORS
            .iter()
            .flat_map(|d| d.gifts.iter())
            .filter(|(_, _, campaign)| *campaign == i)
            .map(|(_, amount, _)| amount)
            .sum();
        sqlx::query(
            "INSERT INTO campaigns (id, organization_id, name, goal_amount, total_raised, is_active) \
             VALUES ($1, $2, $3, $4::float8::numeric, $5::float8::numeric, $6) \
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(Uuid::from_u128(*id))
        .bind(org)
        .bind(*name)
        .bind(*goal)
        .bind(raised)
        .bind(*active)
        .execute(pool)
        .await?;
    }
    Ok(())
}

async fn seed_donors(pool: &PgPool, org: Uuid, now: DateTime<Utc>) -> Result<()> {
    for donor in &DONORS {
        let donor_id = Uuid::from_u128(donor.id);
        let dates: Vec<DateTime<Utc>> = donor
            .gifts
            .iter()
            .map(|(days, _, _)| now - Duration::days(*days))
            .collect();
        let total: f64 = donor.gifts.iter().map(|(_, amount, _)| amount).sum();
        let tags: Vec<String> = donor.tags.iter().map(|t| t.to_string()).collect();

        sqlx::query(
            "INSERT INTO donors (id, organization_id, first_name, last_name, email, tags, \
             total_donated, donation_count, first_donation_date, last_donation_date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7::float8::numeric, $8, $9, $10) \
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(donor_id)
        .bind(org)
        .bind(donor.first)
        .bind(donor.last)
        .bind(format!("{}.{}@example.org", donor.first, donor.last).to_lowercase())
        .bind(&tags)
        .bind(total)
        .bind(donor.gifts.len() as i32)
        .bind(dates.iter().min().map(|d| d.date_naive()))
        .bind(dates.iter().max().map(|d| d.date_naive()))
        .execute(pool)
        .await?;

        for (n, ((_, amount, campaign), date)) in donor.gifts.iter().zip(&dates).enumerate() {
            sqlx::query(
                "INSERT INTO donations (id, donor_id, campaign_id, amount, donation_date) \
                 VALUES ($1, $2, $3, $4::float8::numeric, $5) \
                 ON CONFLICT (id) DO NOTHING",
            )
            .bind(Uuid::from_u128((donor.id << 16) | n as u128))
            .bind(donor_id)
            .bind(Uuid::from_u128(CAMPAIGNS[*campaign].0))
            .bind(*amount)
            .bind(*date)
            .execute(pool)
            .await?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::load().context("loading configuration")?;
    let url = settings
        .database
        .url
        .as_ref()
        .context("DATABASE_URL must be set to seed")?;

    let store = PostgresStore::connect(url.expose_secret(), 1)
        .await
        .context("connecting to Postgres")?;
    store.migrate().await?;

    let org = settings.report.organization_id;
    let pool = store.pool();
    seed_organization(pool, org).await?;
    seed_campaigns(pool, org).await?;
    seed_donors(pool, org, Utc::now()).await?;
    info!(%org, donors = DONORS.len(), campaigns = CAMPAIGNS.len(), "demo data loaded");

    let session = Session {
        user_id: Uuid::from_u128(0xa1),
        organization_id: Some(org),
    };
    let token = JwtAuth::new(&settings.auth.jwt_secret).issue(&session, Duration::days(7))?;
    println!("dev token (7 days): {token}");

    Ok(())
}
