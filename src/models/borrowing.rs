use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorrowStatus {
    Borrowed,
    Returned,
}

/// A borrowing record. Overdue is never stored here; it is derived from
/// `status` and `due_date` against an injected clock (see `util::status`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Borrowing {
    pub id: i64,
    #[serde(default)]
    pub book_id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub borrowed_at: Option<DateTime<Utc>>,
    pub due_date: DateTime<Utc>,
    pub status: BorrowStatus,
    #[serde(default)]
    pub returned_at: Option<DateTime<Utc>>,
}

/// A hit from the admin borrowing search (active loans only). The shape is
/// flattened server-side for the typeahead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorrowingHit {
    pub borrowing_id: i64,
    pub title: String,
    pub username: String,
}

impl BorrowingHit {
    /// Text echoed into the search box when this hit is selected.
    pub fn label(&self) -> String {
        format!("{} (by {})", self.title, self.username)
    }
}
