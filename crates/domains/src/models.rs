//! # Domain Models
//!
//! Donors, donations and campaigns are owned by the datastore; ripple only
//! reads them. Reports are the one entity this system produces.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `report_type` value written by the weekly executive pipeline.
pub const WEEKLY_EXECUTIVE: &str = "weekly_executive";

/// A person or organization that gives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donor {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// e.g. "individual", "foundation", "corporate"
    pub donor_type: String,
    /// Free-form labels such as "major_donor" or "monthly"
    #[serde(default)]
    pub tags: Vec<String>,
    pub total_donated: f64,
    pub donation_count: i32,
    pub first_donation_date: Option<NaiveDate>,
    pub last_donation_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Donor {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// A single recorded gift. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donation {
    pub id: Uuid,
    pub donor_id: Uuid,
    pub campaign_id: Option<Uuid>,
    pub amount: f64,
    pub donation_date: DateTime<Utc>,
    pub payment_method: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: Uuid,
    pub name: String,
    /// Missing or zero goals are tolerated everywhere progress is computed
    pub goal_amount: Option<f64>,
    pub total_raised: f64,
    pub is_active: bool,
}

/// Whole-number percent of goal reached, or `None` when no usable goal is set.
pub fn percent_of_goal(raised: f64, goal: Option<f64>) -> Option<i64> {
    match goal {
        Some(goal) if goal > 0.0 && goal.is_finite() => {
            let pct = (raised / goal * 100.0).round();
            pct.is_finite().then_some(pct as i64)
        }
        _ => None,
    }
}

/// The `{name, raised, goal}` triple carried in reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopCampaign {
    pub name: String,
    pub raised: f64,
    pub goal: Option<f64>,
}

impl TopCampaign {
    pub fn percent_of_goal(&self) -> Option<i64> {
        percent_of_goal(self.raised, self.goal)
    }
}

impl From<&Campaign> for TopCampaign {
    fn from(c: &Campaign) -> Self {
        Self {
            name: c.name.clone(),
            raised: c.total_raised,
            goal: c.goal_amount,
        }
    }
}

/// Statistics persisted with, and returned alongside, a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportStats {
    pub total_raised: f64,
    pub total_donors: usize,
    pub week_total: f64,
    pub month_total: f64,
    pub at_risk_count: usize,
}

/// The structured blob stored in `ai_reports.metadata`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub stats: ReportStats,
    pub top_campaigns: Vec<TopCampaign>,
}

/// A report ready to be inserted. Created once per successful pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewReport {
    pub organization_id: Uuid,
    pub report_type: String,
    pub title: String,
    pub content: String,
    pub metadata: ReportMetadata,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub generated_by: Uuid,
}

/// A report as read back from the datastore. Read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredReport {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub report_type: String,
    pub title: String,
    pub content: String,
    /// Opaque once stored; readers must not assume the writer's schema
    pub metadata: serde_json::Value,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub generated_by: Uuid,
    pub generated_at: DateTime<Utc>,
}

/// Result of the best-effort write at the end of the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum PersistOutcome {
    Persisted { id: Uuid },
    PersistFailed { reason: String },
}

impl PersistOutcome {
    pub fn report_id(&self) -> Option<Uuid> {
        match self {
            PersistOutcome::Persisted { id } => Some(*id),
            PersistOutcome::PersistFailed { .. } => None,
        }
    }
}

/// The authenticated caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user_id: Uuid,
    /// Present when the token scopes the caller to an organization
    pub organization_id: Option<Uuid>,
}

/// Knobs passed to the text-generation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationParams {
    pub max_new_tokens: u32,
    pub temperature: f32,
    /// When false the endpoint must not echo the prompt back
    pub return_full_text: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_new_tokens: 500,
            temperature: 0.7,
            return_full_text: false,
        }
    }
}
