use serde::Deserialize;

/// Library-wide counters from `GET /library/admin/stats`. Computed
/// server-side; the client only renders them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LibraryStats {
    #[serde(rename = "totalBooks")]
    pub total_books: i64,
    #[serde(rename = "availableCopies")]
    pub available_copies: i64,
    #[serde(rename = "activeBorrowings")]
    pub active_borrowings: i64,
    #[serde(rename = "overdueBooks")]
    pub overdue_books: i64,
}
