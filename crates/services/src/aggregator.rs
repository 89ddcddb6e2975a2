//! # Aggregator
//!
//! Derives the time-windowed totals and the at-risk heuristic that feed the
//! weekly executive report. Pure: `now` is passed in.

use std::cmp::Ordering;

use chrono::{DateTime, Days, NaiveTime, Utc};
use domains::{Campaign, Donation, Donor, ReportMetadata, ReportStats, TopCampaign};
use serde::Serialize;

/// Trailing window for "this week".
pub const WEEK_DAYS: u64 = 7;
/// Trailing window for "this month". Independent of the weekly window.
pub const MONTH_DAYS: u64 = 30;
/// A repeat donor silent for longer than this is at risk.
pub const LAPSE_DAYS: u64 = 90;
/// At most this many at-risk donors are kept.
pub const AT_RISK_LIMIT: usize = 5;
/// At most this many campaigns are reported.
pub const TOP_CAMPAIGN_LIMIT: usize = 3;

/// Everything the prompt builder and the report assembler need.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FundraisingSnapshot {
    pub total_raised: f64,
    pub total_donors: usize,
    /// 0 when there are no donations
    pub avg_donation: f64,
    pub week_total: f64,
    pub recent_donations: Vec<Donation>,
    pub month_total: f64,
    pub month_count: usize,
    /// Store order, no sort applied
    pub at_risk_donors: Vec<Donor>,
    /// Descending by amount raised
    pub top_campaigns: Vec<TopCampaign>,
    /// Start of the weekly window
    pub week_start: DateTime<Utc>,
    pub as_of: DateTime<Utc>,
}

impl FundraisingSnapshot {
    pub fn stats(&self) -> ReportStats {
        ReportStats {
            total_raised: self.total_raised,
            total_donors: self.total_donors,
            week_total: self.week_total,
            month_total: self.month_total,
            at_risk_count: self.at_risk_donors.len(),
        }
    }

    pub fn metadata(&self) -> ReportMetadata {
        ReportMetadata {
            stats: self.stats(),
            top_campaigns: self.top_campaigns.clone(),
        }
    }
}

/// "N days ago" by calendar: the date moves back N days, the time of day stays.
pub fn days_before(now: DateTime<Utc>, days: u64) -> DateTime<Utc> {
    now.checked_sub_days(Days::new(days))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

fn sum_amounts<'a>(donations: impl IntoIterator<Item = &'a Donation>) -> f64 {
    donations.into_iter().map(|d| d.amount).sum()
}

/// A repeat donor whose last gift is strictly before `cutoff`.
/// One-time donors and donors with no recorded gift never qualify.
pub fn is_at_risk(donor: &Donor, cutoff: DateTime<Utc>) -> bool {
    let Some(last) = donor.last_donation_date else {
        return false;
    };
    donor.donation_count > 1 && last.and_time(NaiveTime::MIN).and_utc() < cutoff
}

pub fn aggregate(
    donors: &[Donor],
    donations: &[Donation],
    campaigns: &[Campaign],
    now: DateTime<Utc>,
) -> FundraisingSnapshot {
    let total_raised = sum_amounts(donations);
    let avg_donation = if donations.is_empty() {
        0.0
    } else {
        total_raised / donations.len() as f64
    };

    let week_start = days_before(now, WEEK_DAYS);
    let recent_donations: Vec<Donation> = donations
        .iter()
        .filter(|d| d.donation_date >= week_start)
        .cloned()
        .collect();

    let month_start = days_before(now, MONTH_DAYS);
    let month: Vec<&Donation> = donations
        .iter()
        .filter(|d| d.donation_date >= month_start)
        .collect();

    let lapse_cutoff = days_before(now, LAPSE_DAYS);
    let at_risk_donors = donors
        .iter()
        .filter(|d| is_at_risk(d, lapse_cutoff))
        .take(AT_RISK_LIMIT)
        .cloned()
        .collect();

    let mut ranked: Vec<&Campaign> = campaigns.iter().collect();
    ranked.sort_by(|a, b| {
        b.total_raised
            .partial_cmp(&a.total_raised)
            .unwrap_or(Ordering::Equal)
    });
    let top_campaigns = ranked
        .into_iter()
        .take(TOP_CAMPAIGN_LIMIT)
        .map(TopCampaign::from)
        .collect();

    FundraisingSnapshot {
        total_raised,
        total_donors: donors.len(),
        avg_donation,
        week_total: sum_amounts(&recent_donations),
        recent_donations,
        month_total: sum_amounts(month.iter().copied()),
        month_count: month.len(),
        at_risk_donors,
        top_campaigns,
        week_start,
        as_of: now,
    }
}
