//! # services
//!
//! Application logic for ripple. Everything here talks to the outside world
//! only through the ports in `domains`.

pub mod aggregator;
pub mod dashboard;
pub mod datasets;
pub mod donors;
pub mod extract;
pub mod outreach;
pub mod prompts;
pub mod reports;

pub use aggregator::{aggregate, days_before, FundraisingSnapshot};
pub use dashboard::DashboardStats;
pub use datasets::{fetch_datasets, Datasets};
pub use donors::DonorDirectory;
pub use extract::{extract_json, extract_json_as};
pub use outreach::{OutreachDraft, OutreachService, Tone};
pub use reports::{GeneratedReport, ReportRun, ReportService};
