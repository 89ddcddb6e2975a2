//! # Core Traits (Ports)
//!
//! Any adapter must implement these traits to be wired into the binary.

use async_trait::async_trait;
use uuid::Uuid;

#[cfg(feature = "testing")]
use mockall::automock;

use crate::errors::{AuthError, GenerationError, StoreError};
use crate::models::{Campaign, Donation, Donor, GenerationParams, NewReport, Session, StoredReport};

/// Read access to the fundraising collections.
///
/// Every call is independently fallible; callers decide whether a failed
/// read aborts anything.
#[cfg_attr(feature = "testing", automock)]
#[async_trait]
pub trait FundraisingStore: Send + Sync {
    async fn list_donors(&self) -> Result<Vec<Donor>, StoreError>;
    /// Newest donation first.
    async fn list_donations(&self) -> Result<Vec<Donation>, StoreError>;
    /// Highest `total_raised` first.
    async fn list_campaigns(&self) -> Result<Vec<Campaign>, StoreError>;
    async fn get_donor(&self, id: Uuid) -> Result<Option<Donor>, StoreError>;
}

/// Write-once storage for generated reports.
#[cfg_attr(feature = "testing", automock)]
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Inserts and reads the row back, returning the stored form.
    async fn insert_report(&self, report: NewReport) -> Result<StoredReport, StoreError>;
    /// At most `limit` reports, newest first.
    async fn list_reports(
        &self,
        report_type: &str,
        limit: usize,
    ) -> Result<Vec<StoredReport>, StoreError>;
}

/// Hosted text-generation model.
#[cfg_attr(feature = "testing", automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, GenerationError>;
}

/// Turns a bearer credential into a session.
#[cfg_attr(feature = "testing", automock)]
pub trait SessionVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<Session, AuthError>;
}
