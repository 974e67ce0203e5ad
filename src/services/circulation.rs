//! Admin circulation desk: issue, return and renew.
//!
//! Three typeahead widgets feed the selections; the mutation handlers
//! validate those selections locally (no request goes out when one is
//! missing), issue exactly one request, report the outcome on the bus and
//! reset the form on success. Return and renew act on the same selected
//! borrowing but are independent requests.

use std::sync::Arc;
use std::time::Duration;

use crate::api::ApiClient;
use crate::models::{Book, BorrowingHit, User};
use crate::notify::NotificationBus;
use crate::services::search::{BookSearch, BorrowingSearch, SearchSelect, UserSearch};

pub struct CirculationDesk {
    api: ApiClient,
    bus: NotificationBus,
    pub books: SearchSelect<Book>,
    pub users: SearchSelect<User>,
    pub borrowings: SearchSelect<BorrowingHit>,
}

impl CirculationDesk {
    pub fn new(api: ApiClient, bus: NotificationBus, delay: Duration, limit: usize) -> Self {
        let books = SearchSelect::new(
            Arc::new(BookSearch::new(api.clone(), limit)),
            bus.clone(),
            delay,
            limit,
        );
        let users = SearchSelect::new(
            Arc::new(UserSearch::new(api.clone(), limit)),
            bus.clone(),
            delay,
            limit,
        );
        let borrowings = SearchSelect::new(
            Arc::new(BorrowingSearch::new(api.clone())),
            bus.clone(),
            delay,
            limit,
        );
        Self {
            api,
            bus,
            books,
            users,
            borrowings,
        }
    }

    /// Issue the selected book to the selected member. Returns whether the
    /// mutation went through.
    pub async fn issue(&self) -> bool {
        let (Some(book), Some(user)) = (self.books.selected(), self.users.selected()) else {
            self.bus.error("Please select a book and a student.");
            return false;
        };

        match self.api.issue_book(user.id, book.id).await {
            Ok(()) => {
                self.bus.success(format!(
                    "Book \"{}\" issued to {}.",
                    book.title, user.username
                ));
                self.books.reset();
                self.users.reset();
                true
            }
            Err(e) => {
                self.bus.error(e.message_or("Failed to issue book."));
                false
            }
        }
    }

    /// Return the selected borrowing.
    pub async fn return_selected(&self) -> bool {
        let Some(borrowing) = self.borrowings.selected() else {
            self.bus.error("Please select a borrowed book to return.");
            return false;
        };

        match self.api.return_book(borrowing.borrowing_id).await {
            Ok(()) => {
                self.bus
                    .success(format!("Book \"{}\" has been returned.", borrowing.title));
                self.borrowings.reset();
                true
            }
            Err(e) => {
                self.bus.error(e.message_or("Failed to return book."));
                false
            }
        }
    }

    /// Renew the selected borrowing; the server recomputes the due date.
    pub async fn renew_selected(&self) -> bool {
        let Some(borrowing) = self.borrowings.selected() else {
            self.bus.error("Please select a borrowed book to renew.");
            return false;
        };

        match self.api.renew_book(borrowing.borrowing_id).await {
            Ok(()) => {
                self.bus
                    .success(format!("Book \"{}\" has been renewed.", borrowing.title));
                self.borrowings.reset();
                true
            }
            Err(e) => {
                self.bus.error(e.message_or("Failed to renew book."));
                false
            }
        }
    }
}
