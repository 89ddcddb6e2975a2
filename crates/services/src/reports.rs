//! # Report Assembler
//!
//! Runs the weekly executive pipeline end to end:
//! fetch -> aggregate -> prompt -> generate -> assemble -> persist.
//!
//! # Developer Note
//! Persistence is best effort. A failed insert is logged and reported back
//! as [`PersistOutcome::PersistFailed`]; the caller still gets the generated
//! content, just without an `id`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use domains::{
    AppError, Donor, FundraisingStore, GenerationParams, NewReport, PersistOutcome,
    ReportRepository, ReportStats, Session, StoredReport, TextGenerator, TopCampaign,
    WEEKLY_EXECUTIVE,
};
use serde::Serialize;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::aggregator::{aggregate, FundraisingSnapshot, AT_RISK_LIMIT};
use crate::datasets::fetch_datasets;
use crate::prompts::weekly_report_prompt;

/// What the caller receives. Every field is always present; `id` is `None`
/// only when the write failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedReport {
    pub id: Option<Uuid>,
    pub title: String,
    pub content: String,
    pub stats: ReportStats,
    pub top_campaigns: Vec<TopCampaign>,
    pub at_risk_donors: Vec<Donor>,
}

/// A finished run: the response plus how the write went.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRun {
    pub report: GeneratedReport,
    pub persistence: PersistOutcome,
}

/// Reports shown in the history view.
pub const REPORT_HISTORY_LIMIT: usize = 10;

pub fn report_title(now: DateTime<Utc>) -> String {
    format!("Weekly Executive Report - {}", now.format("%Y-%m-%d"))
}

/// Builds the row to insert from a snapshot and the model's text.
pub fn assemble(
    snapshot: &FundraisingSnapshot,
    content: String,
    organization_id: Uuid,
    generated_by: Uuid,
) -> NewReport {
    NewReport {
        organization_id,
        report_type: WEEKLY_EXECUTIVE.to_string(),
        title: report_title(snapshot.as_of),
        content,
        metadata: snapshot.metadata(),
        period_start: snapshot.week_start.date_naive(),
        period_end: snapshot.as_of.date_naive(),
        generated_by,
    }
}

pub struct ReportService {
    store: Arc<dyn FundraisingStore>,
    reports: Arc<dyn ReportRepository>,
    generator: Arc<dyn TextGenerator>,
    params: GenerationParams,
    default_organization: Uuid,
}

impl ReportService {
    pub fn new(
        store: Arc<dyn FundraisingStore>,
        reports: Arc<dyn ReportRepository>,
        generator: Arc<dyn TextGenerator>,
        params: GenerationParams,
        default_organization: Uuid,
    ) -> Self {
        Self {
            store,
            reports,
            generator,
            params,
            default_organization,
        }
    }

    /// Generates, persists (best effort) and shapes one weekly report.
    #[instrument(skip_all, fields(user_id = %session.user_id))]
    pub async fn generate_weekly_report(
        &self,
        session: &Session,
        now: DateTime<Utc>,
    ) -> Result<ReportRun, AppError> {
        // 1. Aggregate
        let data = fetch_datasets(self.store.as_ref()).await;
        let snapshot = aggregate(&data.donors, &data.donations, &data.campaigns, now);

        // 2. Generate
        let prompt = weekly_report_prompt(&snapshot);
        let content = self
            .generator
            .generate(&prompt, &self.params)
            .await
            .map_err(|err| {
                error!(error = %err, "report generation failed");
                AppError::from(err)
            })?;

        // 3. Persist
        let organization_id = session
            .organization_id
            .unwrap_or(self.default_organization);
        let new_report = assemble(&snapshot, content.clone(), organization_id, session.user_id);
        let title = new_report.title.clone();
        let persistence = self.persist(new_report).await;

        Ok(ReportRun {
            report: GeneratedReport {
                id: persistence.report_id(),
                title,
                content,
                stats: snapshot.stats(),
                top_campaigns: snapshot.top_campaigns,
                at_risk_donors: snapshot
                    .at_risk_donors
                    .into_iter()
                    .take(AT_RISK_LIMIT)
                    .collect(),
            },
            persistence,
        })
    }

    async fn persist(&self, report: NewReport) -> PersistOutcome {
        match self.reports.insert_report(report).await {
            Ok(stored) => {
                info!(report_id = %stored.id, "report saved");
                PersistOutcome::Persisted { id: stored.id }
            }
            Err(err) => {
                error!(error = %err, "error saving report, returning unsaved content");
                PersistOutcome::PersistFailed {
                    reason: err.to_string(),
                }
            }
        }
    }

    /// The most recent weekly reports, newest first.
    pub async fn list_weekly_reports(&self) -> Result<Vec<StoredReport>, AppError> {
        Ok(self
            .reports
            .list_reports(WEEKLY_EXECUTIVE, REPORT_HISTORY_LIMIT)
            .await?)
    }
}
