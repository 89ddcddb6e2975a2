//! # api-adapters Handlers
//!
//! Thin glue between HTTP and the `services` crate. Handlers authenticate
//! through [`AuthSession`], call exactly one service operation, and map the
//! result onto JSON.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use domains::AppError;
use serde::Deserialize;
use serde_json::{json, Value};
use services::{fetch_datasets, DashboardStats, DonorDirectory, OutreachDraft, Tone};
use tracing::{error, warn};
use uuid::Uuid;

use crate::auth::AuthSession;
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/ai/generate-report
pub async fn generate_report(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
) -> Result<Json<Value>, ApiError> {
    match state.reports.generate_weekly_report(&session, Utc::now()).await {
        Ok(run) => {
            state
                .metrics
                .report_generated(run.persistence.report_id().is_some());
            Ok(Json(json!({ "success": true, "report": run.report })))
        }
        Err(err) => {
            error!(error = %err, kind = err.kind(), "report generation error");
            state.metrics.report_failed(err.kind());
            Err(err.into())
        }
    }
}

/// GET /api/reports
pub async fn list_reports(
    State(state): State<AppState>,
    AuthSession(_): AuthSession,
) -> Result<Json<Value>, ApiError> {
    let reports = state.reports.list_weekly_reports().await?;
    Ok(Json(json!({ "reports": reports })))
}

/// GET /api/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    AuthSession(_): AuthSession,
) -> Json<DashboardStats> {
    let data = fetch_datasets(state.store.as_ref()).await;
    Json(DashboardStats::summarize(
        &data.donors,
        &data.donations,
        &data.campaigns,
        Utc::now(),
    ))
}

/// GET /api/donors
pub async fn list_donors(
    State(state): State<AppState>,
    AuthSession(_): AuthSession,
) -> Result<Json<DonorDirectory>, ApiError> {
    let donors = state.store.list_donors().await.map_err(AppError::from)?;
    Ok(Json(DonorDirectory::build(donors)))
}

#[derive(Debug, Default, Deserialize)]
pub struct OutreachQuery {
    #[serde(default)]
    pub tone: Tone,
}

/// POST /api/ai/donor-outreach/{donor_id}?tone=warm|professional|urgent
pub async fn draft_outreach(
    State(state): State<AppState>,
    AuthSession(_): AuthSession,
    Path(donor_id): Path<Uuid>,
    Query(query): Query<OutreachQuery>,
) -> Result<Json<OutreachDraft>, ApiError> {
    let draft = state
        .outreach
        .draft(donor_id, query.tone)
        .await
        .inspect_err(|err| warn!(error = %err, %donor_id, "outreach draft failed"))?;
    Ok(Json(draft))
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    match state.metrics.render() {
        Ok(body) => (
            StatusCode::OK,
            [(
                header::CONTENT_TYPE,
                "application/openmetrics-text; version=1.0.0; charset=utf-8",
            )],
            body,
        )
            .into_response(),
        Err(err) => {
            error!(error = %err, "metrics encoding failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
