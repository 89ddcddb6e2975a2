//! # Postgres adapter
//!
//! Maps the relational model onto the `domains` entities.
//! Money columns are `numeric` and are cast to `float8` on the way out.

use async_trait::async_trait;
use domains::{
    Campaign, Donation, Donor, FundraisingStore, NewReport, ReportRepository, StoreError,
    StoredReport,
};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::Row;
use tracing::info;
use uuid::Uuid;

const DONOR_COLUMNS: &str = "id, organization_id, first_name, last_name, email, phone, \
     donor_type, tags, total_donated::float8 AS total_donated, donation_count, \
     first_donation_date, last_donation_date, created_at";

const REPORT_COLUMNS: &str = "id, organization_id, report_type, title, content, metadata, \
     period_start, period_end, generated_by, generated_at";

#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

fn unavailable(err: sqlx::Error) -> StoreError {
    StoreError::Unavailable(err.to_string())
}

fn malformed(table: &'static str) -> impl Fn(sqlx::Error) -> StoreError {
    move |err| StoreError::Malformed {
        table,
        reason: err.to_string(),
    }
}

impl PostgresStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(unavailable)?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Applies the embedded migrations.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        info!("database migrations applied");
        Ok(())
    }
}

fn donor_from_row(row: &PgRow) -> Result<Donor, sqlx::Error> {
    Ok(Donor {
        id: row.try_get("id")?,
        organization_id: row.try_get("organization_id")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        donor_type: row.try_get("donor_type")?,
        tags: row.try_get("tags")?,
        total_donated: row.try_get("total_donated")?,
        donation_count: row.try_get("donation_count")?,
        first_donation_date: row.try_get("first_donation_date")?,
        last_donation_date: row.try_get("last_donation_date")?,
        created_at: row.try_get("created_at")?,
    })
}

fn donation_from_row(row: &PgRow) -> Result<Donation, sqlx::Error> {
    Ok(Donation {
        id: row.try_get("id")?,
        donor_id: row.try_get("donor_id")?,
        campaign_id: row.try_get("campaign_id")?,
        amount: row.try_get("amount")?,
        donation_date: row.try_get("donation_date")?,
        payment_method: row.try_get("payment_method")?,
    })
}

fn campaign_from_row(row: &PgRow) -> Result<Campaign, sqlx::Error> {
    Ok(Campaign {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        goal_amount: row.try_get("goal_amount")?,
        total_raised: row.try_get("total_raised")?,
        is_active: row.try_get("is_active")?,
    })
}

fn report_from_row(row: &PgRow) -> Result<StoredReport, sqlx::Error> {
    let Json(metadata): Json<serde_json::Value> = row.try_get("metadata")?;
    Ok(StoredReport {
        id: row.try_get("id")?,
        organization_id: row.try_get("organization_id")?,
        report_type: row.try_get("report_type")?,
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        metadata,
        period_start: row.try_get("period_start")?,
        period_end: row.try_get("period_end")?,
        generated_by: row.try_get("generated_by")?,
        generated_at: row.try_get("generated_at")?,
    })
}

#[async_trait]
impl FundraisingStore for PostgresStore {
    async fn list_donors(&self) -> Result<Vec<Donor>, StoreError> {
        sqlx::query(&format!("SELECT {DONOR_COLUMNS} FROM donors ORDER BY created_at"))
            .fetch_all(&self.pool)
            .await
            .map_err(unavailable)?
            .iter()
            .map(|row| donor_from_row(row).map_err(malformed("donors")))
            .collect()
    }

    async fn list_donations(&self) -> Result<Vec<Donation>, StoreError> {
        sqlx::query(
            "SELECT id, donor_id, campaign_id, amount::float8 AS amount, donation_date, payment_method \
             FROM donations ORDER BY donation_date DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(unavailable)?
        .iter()
        .map(|row| donation_from_row(row).map_err(malformed("donations")))
        .collect()
    }

    async fn list_campaigns(&self) -> Result<Vec<Campaign>, StoreError> {
        sqlx::query(
            "SELECT id, name, goal_amount::float8 AS goal_amount, \
             total_raised::float8 AS total_raised, is_active \
             FROM campaigns ORDER BY total_raised DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(unavailable)?
        .iter()
        .map(|row| campaign_from_row(row).map_err(malformed("campaigns")))
        .collect()
    }

    async fn get_donor(&self, id: Uuid) -> Result<Option<Donor>, StoreError> {
        let row = sqlx::query(&format!("SELECT {DONOR_COLUMNS} FROM donors WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(unavailable)?;

        row.as_ref()
            .map(donor_from_row)
            .transpose()
            .map_err(malformed("donors"))
    }
}

#[async_trait]
impl ReportRepository for PostgresStore {
    async fn insert_report(&self, report: NewReport) -> Result<StoredReport, StoreError> {
        let row = sqlx::query(&format!(
            "INSERT INTO ai_reports \
             (id, organization_id, report_type, title, content, metadata, period_start, period_end, generated_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {REPORT_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(report.organization_id)
        .bind(&report.report_type)
        .bind(&report.title)
        .bind(&report.content)
        .bind(Json(&report.metadata))
        .bind(report.period_start)
        .bind(report.period_end)
        .bind(report.generated_by)
        .fetch_one(&self.pool)
        .await
        .map_err(unavailable)?;

        report_from_row(&row).map_err(malformed("ai_reports"))
    }

    async fn list_reports(
        &self,
        report_type: &str,
        limit: usize,
    ) -> Result<Vec<StoredReport>, StoreError> {
        sqlx::query(&format!(
            "SELECT {REPORT_COLUMNS} FROM ai_reports \
             WHERE report_type = $1 ORDER BY generated_at DESC LIMIT $2"
        ))
        .bind(report_type)
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(unavailable)?
        .iter()
        .map(|row| report_from_row(row).map_err(malformed("ai_reports")))
        .collect()
    }
}
