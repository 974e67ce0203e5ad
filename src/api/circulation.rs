use serde::Serialize;

use super::{ApiClient, ApiError};
use crate::models::{Borrowing, BorrowingHit};

#[derive(Serialize)]
struct BorrowRequest {
    #[serde(rename = "bookId")]
    book_id: i64,
}

#[derive(Serialize)]
struct ReturnRequest {
    #[serde(rename = "borrowingId")]
    borrowing_id: i64,
}

#[derive(Serialize)]
struct IssueRequest {
    #[serde(rename = "userId")]
    user_id: i64,
    #[serde(rename = "bookId")]
    book_id: i64,
}

#[derive(Serialize)]
struct BorrowingSearchQuery<'a> {
    q: &'a str,
}

#[derive(Serialize)]
struct LimitQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u32>,
}

impl ApiClient {
    /// `POST /library/borrow` - member self-service. Due date and
    /// availability bookkeeping happen server-side.
    pub async fn borrow_book(&self, book_id: i64) -> Result<(), ApiError> {
        self.post("/library/borrow", &BorrowRequest { book_id }).await
    }

    /// `POST /library/return` - used by both the member screen and the
    /// admin circulation desk.
    pub async fn return_book(&self, borrowing_id: i64) -> Result<(), ApiError> {
        self.post("/library/return", &ReturnRequest { borrowing_id })
            .await
    }

    /// `GET /library/borrowings` - the signed-in member's history.
    pub async fn my_borrowings(&self) -> Result<Vec<Borrowing>, ApiError> {
        self.get_json("/library/borrowings").await
    }

    /// `GET /library/admin/borrowings?limit=` (admin only).
    pub async fn all_borrowings(&self, limit: Option<u32>) -> Result<Vec<Borrowing>, ApiError> {
        self.get_json_query("/library/admin/borrowings", &LimitQuery { limit })
            .await
    }

    /// `GET /library/admin/borrowings/search?q=` (admin only). Matches
    /// active loans by book title, ISBN or member name.
    pub async fn search_borrowings(&self, query: &str) -> Result<Vec<BorrowingHit>, ApiError> {
        self.get_json_query(
            "/library/admin/borrowings/search",
            &BorrowingSearchQuery { q: query },
        )
        .await
    }

    /// `POST /library/admin/issue` (admin only).
    pub async fn issue_book(&self, user_id: i64, book_id: i64) -> Result<(), ApiError> {
        self.post("/library/admin/issue", &IssueRequest { user_id, book_id })
            .await
    }

    /// `POST /library/admin/renew` (admin only). Independent of return;
    /// the server recomputes the due date.
    pub async fn renew_book(&self, borrowing_id: i64) -> Result<(), ApiError> {
        self.post("/library/admin/renew", &ReturnRequest { borrowing_id })
            .await
    }
}
