//! In-process implementation of the datastore ports.
//!
//! Backed by `DashMap`s so it can be shared behind an `Arc` across axum
//! workers without an outer lock. Ordering guarantees match the Postgres
//! adapter.

use std::cmp::Ordering;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use domains::{
    Campaign, Donation, Donor, FundraisingStore, NewReport, ReportRepository, StoreError,
    StoredReport,
};
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryStore {
    donors: DashMap<Uuid, Donor>,
    donations: DashMap<Uuid, Donation>,
    campaigns: DashMap<Uuid, Campaign>,
    /// Keyed by insertion sequence, which breaks `generated_at` ties
    reports: DashMap<u64, StoredReport>,
    next_report: AtomicU64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_donor(&self, donor: Donor) {
        self.donors.insert(donor.id, donor);
    }

    pub fn insert_donation(&self, donation: Donation) {
        self.donations.insert(donation.id, donation);
    }

    pub fn insert_campaign(&self, campaign: Campaign) {
        self.campaigns.insert(campaign.id, campaign);
    }

    pub fn report_count(&self) -> usize {
        self.reports.len()
    }
}

#[async_trait]
impl FundraisingStore for InMemoryStore {
    async fn list_donors(&self) -> Result<Vec<Donor>, StoreError> {
        let mut donors: Vec<Donor> = self.donors.iter().map(|e| e.value().clone()).collect();
        donors.sort_by_key(|d| d.created_at);
        Ok(donors)
    }

    async fn list_donations(&self) -> Result<Vec<Donation>, StoreError> {
        let mut donations: Vec<Donation> =
            self.donations.iter().map(|e| e.value().clone()).collect();
        donations.sort_by(|a, b| b.donation_date.cmp(&a.donation_date));
        Ok(donations)
    }

    async fn list_campaigns(&self) -> Result<Vec<Campaign>, StoreError> {
        let mut campaigns: Vec<Campaign> =
            self.campaigns.iter().map(|e| e.value().clone()).collect();
        campaigns.sort_by(|a, b| {
            b.total_raised
                .partial_cmp(&a.total_raised)
                .unwrap_or(Ordering::Equal)
        });
        Ok(campaigns)
    }

    async fn get_donor(&self, id: Uuid) -> Result<Option<Donor>, StoreError> {
        Ok(self.donors.get(&id).map(|e| e.value().clone()))
    }
}

#[async_trait]
impl ReportRepository for InMemoryStore {
    async fn insert_report(&self, report: NewReport) -> Result<StoredReport, StoreError> {
        let metadata = serde_json::to_value(&report.metadata).map_err(|e| {
            StoreError::Malformed {
                table: "ai_reports",
                reason: e.to_string(),
            }
        })?;

        let stored = StoredReport {
            id: Uuid::new_v4(),
            organization_id: report.organization_id,
            report_type: report.report_type,
            title: report.title,
            content: report.content,
            metadata,
            period_start: report.period_start,
            period_end: report.period_end,
            generated_by: report.generated_by,
            generated_at: Utc::now(),
        };
        let seq = self.next_report.fetch_add(1, AtomicOrdering::SeqCst);
        self.reports.insert(seq, stored.clone());
        Ok(stored)
    }

    async fn list_reports(
        &self,
        report_type: &str,
        limit: usize,
    ) -> Result<Vec<StoredReport>, StoreError> {
        let mut reports: Vec<(u64, StoredReport)> = self
            .reports
            .iter()
            .filter(|e| e.value().report_type == report_type)
            .map(|e| (*e.key(), e.value().clone()))
            .collect();
        reports.sort_by(|(seq_a, a), (seq_b, b)| {
            (b.generated_at, seq_b).cmp(&(a.generated_at, seq_a))
        });
        Ok(reports
            .into_iter()
            .take(limit)
            .map(|(_, report)| report)
            .collect())
    }
}
