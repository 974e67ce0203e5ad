use super::{ApiClient, ApiError};
use crate::models::LibraryStats;

impl ApiClient {
    /// `GET /library/admin/stats` (librarian/admin only).
    pub async fn stats(&self) -> Result<LibraryStats, ApiError> {
        self.get_json("/library/admin/stats").await
    }
}
