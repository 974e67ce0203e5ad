//! Landing-screen data: recent borrowings, the overdue subset, and library
//! stats when the role is allowed to see them.

use chrono::{DateTime, Utc};

use crate::access::{self, View};
use crate::api::{ApiClient, ApiError};
use crate::models::{Borrowing, LibraryStats, Role};
use crate::utils::status::{classify, LoanState};

const RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone)]
pub struct DashboardData {
    pub recent_borrowings: Vec<Borrowing>,
    pub overdue: Vec<Borrowing>,
    pub stats: Option<LibraryStats>,
}

/// Overdue is recomputed here from the injected `now`, never read off the
/// records.
pub async fn load(
    api: &ApiClient,
    role: Role,
    now: DateTime<Utc>,
) -> Result<DashboardData, ApiError> {
    let mut recent_borrowings = api.my_borrowings().await?;
    recent_borrowings.truncate(RECENT_LIMIT);

    let overdue = recent_borrowings
        .iter()
        .filter(|b| classify(b, now) == LoanState::Overdue)
        .cloned()
        .collect();

    let stats = if access::can_access(role, View::AdminPanel) {
        Some(api.stats().await?)
    } else {
        None
    };

    Ok(DashboardData {
        recent_borrowings,
        overdue,
        stats,
    })
}
