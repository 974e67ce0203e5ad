use serde::Serialize;

use super::{ApiClient, ApiError};
use crate::models::{Book, BookDraft, BookPage, Genre};

/// Catalog list filters. Empty strings are sent as-is (the server treats
/// them as "no filter"), matching the original client.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BookQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl BookQuery {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
            ..Default::default()
        }
    }
}

impl ApiClient {
    /// `GET /library/books?search=&genre=&page=&limit=`.
    pub async fn list_books(&self, query: &BookQuery) -> Result<BookPage, ApiError> {
        self.get_json_query("/library/books", query).await
    }

    /// `GET /library/books/:id`.
    pub async fn get_book(&self, id: i64) -> Result<Book, ApiError> {
        self.get_json(&format!("/library/books/{}", id)).await
    }

    /// `POST /library/books` (admin only).
    pub async fn create_book(&self, draft: &BookDraft) -> Result<(), ApiError> {
        self.post("/library/books", draft).await
    }

    /// `PUT /library/books/:id` (admin only).
    pub async fn update_book(&self, id: i64, draft: &BookDraft) -> Result<(), ApiError> {
        self.put(&format!("/library/books/{}", id), draft).await
    }

    /// `DELETE /library/books/:id` (admin only).
    pub async fn delete_book(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/library/books/{}", id)).await
    }

    /// `GET /library/genres`.
    pub async fn genres(&self) -> Result<Vec<Genre>, ApiError> {
        self.get_json("/library/genres").await
    }
}
