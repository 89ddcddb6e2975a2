use std::sync::Arc;

use domains::{FundraisingStore, SessionVerifier};
use services::{OutreachService, ReportService};

use crate::metrics::Metrics;

/// State shared across all axum workers.
#[derive(Clone)]
pub struct AppState {
    pub reports: Arc<ReportService>,
    pub outreach: Arc<OutreachService>,
    pub store: Arc<dyn FundraisingStore>,
    pub sessions: Arc<dyn SessionVerifier>,
    pub metrics: Arc<Metrics>,
}
