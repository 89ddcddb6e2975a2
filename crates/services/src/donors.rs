//! Donor list ordered by lifetime giving, with the header counts.

use std::cmp::Ordering;

use domains::Donor;
use serde::Serialize;

pub const MAJOR_DONOR_TAG: &str = "major_donor";
pub const MONTHLY_TAG: &str = "monthly";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorSummary {
    pub total_donors: usize,
    pub major_donors: usize,
    pub monthly_donors: usize,
    pub lifetime_giving: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonorDirectory {
    pub summary: DonorSummary,
    pub donors: Vec<Donor>,
}

impl DonorDirectory {
    pub fn build(mut donors: Vec<Donor>) -> Self {
        donors.sort_by(|a, b| {
            b.total_donated
                .partial_cmp(&a.total_donated)
                .unwrap_or(Ordering::Equal)
        });

        let summary = DonorSummary {
            total_donors: donors.len(),
            major_donors: donors.iter().filter(|d| d.has_tag(MAJOR_DONOR_TAG)).count(),
            monthly_donors: donors.iter().filter(|d| d.has_tag(MONTHLY_TAG)).count(),
            lifetime_giving: donors.iter().map(|d| d.total_donated).sum(),
        };

        Self { summary, donors }
    }
}
