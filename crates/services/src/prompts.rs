//! # Prompt Builder
//!
//! Renders aggregated figures into instructions for the text-generation
//! model. Pure functions, no I/O.

use std::fmt::Write;

use domains::Donor;

use crate::aggregator::FundraisingSnapshot;
use crate::outreach::Tone;

/// At-risk donors listed by name in the weekly prompt.
pub const AT_RISK_SAMPLE: usize = 3;

/// `1234.5` -> `"1,234.5"`, `150.0` -> `"150"`. Cents precision.
pub fn format_currency(amount: f64) -> String {
    let cents = (amount * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    let digits = (cents / 100).to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match cents % 100 {
        0 => format!("{sign}{grouped}"),
        frac if frac % 10 == 0 => format!("{sign}{grouped}.{}", frac / 10),
        frac => format!("{sign}{grouped}.{frac:02}"),
    }
}

pub fn weekly_report_prompt(snapshot: &FundraisingSnapshot) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "You are an executive assistant for a nonprofit organization. \
         Generate a concise weekly executive summary report."
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "DATA SUMMARY:");
    let _ = writeln!(
        out,
        "- Total Raised (All Time): ${}",
        format_currency(snapshot.total_raised)
    );
    let _ = writeln!(out, "- Total Donors: {}", snapshot.total_donors);
    let _ = writeln!(
        out,
        "- Average Donation: ${}",
        snapshot.avg_donation.round() as i64
    );
    let _ = writeln!(
        out,
        "- This Week's Donations: ${} ({} donations)",
        format_currency(snapshot.week_total),
        snapshot.recent_donations.len()
    );
    let _ = writeln!(
        out,
        "- This Month's Total: ${}",
        format_currency(snapshot.month_total)
    );
    let _ = writeln!(
        out,
        "- At-Risk Donors: {} donors haven't given in 90+ days",
        snapshot.at_risk_donors.len()
    );
    match snapshot.top_campaigns.first() {
        Some(top) => {
            let _ = writeln!(
                out,
                "- Top Campaign: {} - ${} raised",
                top.name,
                format_currency(top.raised)
            );
        }
        None => {
            let _ = writeln!(out, "- Top Campaign: N/A - $0 raised");
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "TOP CAMPAIGNS:");
    if snapshot.top_campaigns.is_empty() {
        let _ = writeln!(out, "- none");
    }
    for campaign in &snapshot.top_campaigns {
        match (campaign.goal, campaign.percent_of_goal()) {
            (Some(goal), Some(pct)) => {
                let _ = writeln!(
                    out,
                    "- {}: ${} / ${} ({}%)",
                    campaign.name,
                    format_currency(campaign.raised),
                    format_currency(goal),
                    pct
                );
            }
            _ => {
                let _ = writeln!(
                    out,
                    "- {}: ${} / no goal set",
                    campaign.name,
                    format_currency(campaign.raised)
                );
            }
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "AT-RISK DONORS (Sample):");
    if snapshot.at_risk_donors.is_empty() {
        let _ = writeln!(out, "- none");
    }
    for donor in snapshot.at_risk_donors.iter().take(AT_RISK_SAMPLE) {
        let last_gift = donor
            .last_donation_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let _ = writeln!(
            out,
            "- {}: Last gift {}, Total: ${}",
            donor.full_name(),
            last_gift,
            format_currency(donor.total_donated)
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Generate a professional 3-paragraph executive summary that includes:"
    );
    let _ = writeln!(
        out,
        "1. Overall Performance - Highlight this week's results and trends"
    );
    let _ = writeln!(
        out,
        "2. Key Insights - Notable patterns or concerns from the data"
    );
    let _ = writeln!(
        out,
        "3. Recommended Actions - Top 3 specific next steps for the team"
    );
    let _ = writeln!(out);
    let _ = write!(
        out,
        "Keep it concise, mission-focused, and actionable. \
         Use a warm but professional tone."
    );

    out
}

pub fn outreach_prompt(donor: &Donor, tone: Tone) -> String {
    let mut out = String::new();
    let last = donor
        .last_donation_date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "never".to_string());
    let tags = if donor.tags.is_empty() {
        "none".to_string()
    } else {
        donor.tags.join(", ")
    };

    let _ = writeln!(
        out,
        "Draft a {} outreach email to {}.",
        tone.as_str(),
        donor.full_name()
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Profile:");
    let _ = writeln!(
        out,
        "- Total Donated: ${}",
        format_currency(donor.total_donated)
    );
    let _ = writeln!(out, "- Last Donation: {last}");
    let _ = writeln!(out, "- Tags: {tags}");
    let _ = writeln!(out);
    let _ = writeln!(out, "Generate:");
    let _ = writeln!(out, "- Subject line (under 60 chars)");
    let _ = writeln!(out, "- 3-paragraph email that:");
    let _ = writeln!(out, "  1. Thanks them specifically");
    let _ = writeln!(out, "  2. Shares relevant update");
    let _ = writeln!(out, "  3. Subtle invitation (no hard ask)");
    let _ = writeln!(out);
    let _ = writeln!(out, "Format as JSON:");
    let _ = write!(out, "{{\"subject\": \"...\", \"body\": \"...\"}}");

    out
}
