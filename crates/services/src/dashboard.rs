//! Headline numbers for the dashboard landing page.

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};
use domains::{Campaign, Donation, Donor};
use serde::Serialize;

/// Newest donations shown under "recent activity".
pub const RECENT_ACTIVITY: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_donors: usize,
    pub total_raised: f64,
    pub avg_donation: f64,
    pub this_month_total: f64,
    pub this_month_count: usize,
    /// Donations inside the trailing 90 x 24h
    pub active_donations: usize,
    pub active_campaigns: usize,
    pub total_campaigns: usize,
    pub recent_donations: Vec<Donation>,
}

fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let today = now.date_naive();
    today
        .with_day(1)
        .unwrap_or(today)
        .and_time(NaiveTime::MIN)
        .and_utc()
}

impl DashboardStats {
    /// `donations` is expected newest first, as the store returns them.
    pub fn summarize(
        donors: &[Donor],
        donations: &[Donation],
        campaigns: &[Campaign],
        now: DateTime<Utc>,
    ) -> Self {
        let total_raised: f64 = donations.iter().map(|d| d.amount).sum();
        let avg_donation = if donations.is_empty() {
            0.0
        } else {
            total_raised / donations.len() as f64
        };

        let since = month_start(now);
        let (this_month_total, this_month_count) = donations
            .iter()
            .filter(|d| d.donation_date >= since)
            .fold((0.0_f64, 0_usize), |(sum, n), d| (sum + d.amount, n + 1));

        let active_since = now - Duration::days(90);

        Self {
            total_donors: donors.len(),
            total_raised,
            avg_donation,
            this_month_total,
            this_month_count,
            active_donations: donations
                .iter()
                .filter(|d| d.donation_date >= active_since)
                .count(),
            active_campaigns: campaigns.iter().filter(|c| c.is_active).count(),
            total_campaigns: campaigns.len(),
            recent_donations: donations.iter().take(RECENT_ACTIVITY).cloned().collect(),
        }
    }
}
