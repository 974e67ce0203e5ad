use serde::{Deserialize, Serialize};

/// A catalog entry as reported by the server. Availability counts are
/// server-owned; the client only displays them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub isbn: String,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub published_year: Option<i32>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    pub total_copies: i32,
    pub available_copies: i32,
}

impl Book {
    pub fn is_available(&self) -> bool {
        self.available_copies > 0
    }
}

/// Payload for creating or updating a book. The server owns identity and
/// availability counts.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub isbn: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
    pub total_copies: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub total: i64,
    #[serde(rename = "totalPages", default)]
    pub total_pages: i64,
}

/// One page of catalog results.
#[derive(Debug, Clone, Deserialize)]
pub struct BookPage {
    #[serde(default)]
    pub books: Vec<Book>,
    #[serde(default)]
    pub pagination: Pagination,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}
