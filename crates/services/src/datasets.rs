//! Concurrent read of the three fundraising collections.
//!
//! The reads run together, but each one degrades on its own: a failed
//! collection comes back empty and the others are still used.

use domains::{Campaign, Donation, Donor, FundraisingStore, StoreError};
use tracing::warn;

#[derive(Debug, Clone, Default)]
pub struct Datasets {
    pub donors: Vec<Donor>,
    pub donations: Vec<Donation>,
    pub campaigns: Vec<Campaign>,
}

pub async fn fetch_datasets(store: &dyn FundraisingStore) -> Datasets {
    let (donors, donations, campaigns) = tokio::join!(
        store.list_donors(),
        store.list_donations(),
        store.list_campaigns(),
    );

    Datasets {
        donors: or_empty("donors", donors),
        donations: or_empty("donations", donations),
        campaigns: or_empty("campaigns", campaigns),
    }
}

fn or_empty<T>(collection: &'static str, result: Result<Vec<T>, StoreError>) -> Vec<T> {
    result.unwrap_or_else(|err| {
        warn!(collection, error = %err, "read failed, continuing with an empty set");
        Vec::new()
    })
}
