//! Catalog screens: the public browse list and the admin book manager.
//!
//! Both follow the same coordination shape: list state plus filters, a
//! `refresh` that re-fetches with the current filters, and mutations that
//! trigger exactly one refresh on success and leave state untouched on
//! failure. Interactive front ends feed `set_search` through
//! `utils::debounce`; the services themselves see only stabilized values.

use crate::api::books::BookQuery;
use crate::api::ApiClient;
use crate::models::{Book, BookDraft, Genre};
use crate::notify::NotificationBus;

/// Member-facing paginated browse (search + genre filter).
pub struct CatalogBrowser {
    api: ApiClient,
    bus: NotificationBus,
    pub search: String,
    pub genre: Option<String>,
    pub page: u32,
    pub limit: u32,
    pub books: Vec<Book>,
    pub total: i64,
    pub total_pages: i64,
    pub genres: Vec<Genre>,
}

impl CatalogBrowser {
    pub fn new(api: ApiClient, bus: NotificationBus) -> Self {
        Self {
            api,
            bus,
            search: String::new(),
            genre: None,
            page: 1,
            limit: 12,
            books: Vec::new(),
            total: 0,
            total_pages: 0,
            genres: Vec::new(),
        }
    }

    pub async fn load_genres(&mut self) {
        match self.api.genres().await {
            Ok(genres) => self.genres = genres,
            Err(e) => {
                tracing::debug!("genre fetch failed: {}", e);
                self.bus.error("Error fetching genres");
                self.genres.clear();
            }
        }
    }

    /// Fetch the current page with the current filters. A failure surfaces
    /// a notification and leaves the previous page on screen.
    pub async fn refresh(&mut self) {
        let query = BookQuery {
            search: Some(self.search.clone()),
            genre: self.genre.clone(),
            page: Some(self.page),
            limit: Some(self.limit),
        };
        match self.api.list_books(&query).await {
            Ok(page) => {
                self.books = page.books;
                self.total = page.pagination.total;
                self.total_pages = page.pagination.total_pages;
            }
            Err(e) => {
                tracing::debug!("book list fetch failed: {}", e);
                self.bus.error("Error fetching books");
            }
        }
    }

    /// Filter changes reset to the first page.
    pub async fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        self.page = 1;
        self.refresh().await;
    }

    pub async fn set_genre(&mut self, genre: Option<String>) {
        self.genre = genre;
        self.page = 1;
        self.refresh().await;
    }

    pub async fn goto_page(&mut self, page: u32) {
        self.page = page.max(1);
        self.refresh().await;
    }
}

/// Admin CRUD over the catalog. Deletion is a two-step flow: park the id,
/// then confirm.
pub struct BookManager {
    api: ApiClient,
    bus: NotificationBus,
    pub search: String,
    pub books: Vec<Book>,
    pub last_error: Option<String>,
    pending_delete: Option<i64>,
}

impl BookManager {
    pub fn new(api: ApiClient, bus: NotificationBus) -> Self {
        Self {
            api,
            bus,
            search: String::new(),
            books: Vec::new(),
            last_error: None,
            pending_delete: None,
        }
    }

    pub async fn refresh(&mut self) {
        self.last_error = None;
        match self.api.list_books(&BookQuery::search(self.search.clone())).await {
            Ok(page) => self.books = page.books,
            Err(e) => self.last_error = Some(e.message_or("Failed to fetch books")),
        }
    }

    pub async fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        self.refresh().await;
    }

    /// Presence-only validation, mirroring the original form's `required`
    /// attributes. Anything semantic belongs to the server.
    fn validate(draft: &BookDraft) -> Result<(), String> {
        if draft.title.trim().is_empty()
            || draft.author.trim().is_empty()
            || draft.isbn.trim().is_empty()
        {
            return Err("Title, author and ISBN are required".to_string());
        }
        if draft.total_copies < 1 {
            return Err("Total copies must be at least 1".to_string());
        }
        Ok(())
    }

    pub async fn create(&mut self, draft: BookDraft) -> bool {
        if let Err(message) = Self::validate(&draft) {
            self.fail(message);
            return false;
        }
        match self.api.create_book(&draft).await {
            Ok(()) => {
                self.bus.success("Book added successfully!");
                self.refresh().await;
                true
            }
            Err(e) => {
                self.fail(e.message_or("Failed to add book"));
                false
            }
        }
    }

    pub async fn update(&mut self, id: i64, draft: BookDraft) -> bool {
        if let Err(message) = Self::validate(&draft) {
            self.fail(message);
            return false;
        }
        match self.api.update_book(id, &draft).await {
            Ok(()) => {
                self.bus.success("Book updated successfully!");
                self.refresh().await;
                true
            }
            Err(e) => {
                self.fail(e.message_or("Failed to update book"));
                false
            }
        }
    }

    pub fn request_delete(&mut self, id: i64) {
        self.pending_delete = Some(id);
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    pub fn pending_delete(&self) -> Option<i64> {
        self.pending_delete
    }

    /// Second step of deletion; a no-op unless a delete was requested.
    pub async fn confirm_delete(&mut self) -> bool {
        let Some(id) = self.pending_delete.take() else {
            return false;
        };
        match self.api.delete_book(id).await {
            Ok(()) => {
                self.bus.success("Book deleted successfully!");
                self.refresh().await;
                true
            }
            Err(e) => {
                self.fail(e.message_or("Failed to delete book"));
                false
            }
        }
    }

    /// Inline text and the bus always carry the same message.
    fn fail(&mut self, message: String) {
        self.last_error = Some(message.clone());
        self.bus.error(message);
    }
}
