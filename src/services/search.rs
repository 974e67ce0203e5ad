//! Server-backed typeahead with single-selection collapse.
//!
//! `SearchSelect` turns free-text input into search requests: input is
//! debounced, an empty query clears the results without a request, and a
//! non-empty stabilized query issues exactly one. Every request carries a
//! sequence number and a response is applied only while its number is still
//! the latest issued, so a reply that arrives after the user has typed past
//! it is discarded instead of clobbering fresher results.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, watch};

use crate::api::books::BookQuery;
use crate::api::{ApiClient, ApiError};
use crate::models::{Book, BorrowingHit, User};
use crate::notify::NotificationBus;
use crate::utils::debounce;

/// A search backend for one entity kind.
#[async_trait]
pub trait SearchProvider<T>: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<T>, ApiError>;

    /// Text echoed into the input box when `item` is selected.
    fn label(&self, item: &T) -> String;

    /// Notification shown when a search request fails.
    fn failure_message(&self) -> &'static str;
}

#[derive(Debug, Clone)]
pub struct SearchState<T> {
    /// What the input box currently shows (user text or a selection echo).
    pub text: String,
    pub results: Vec<T>,
    pub selected: Option<T>,
    pub loading: bool,
    /// Bumped each time a stabilized query resolves (results applied, error,
    /// or empty-query clear). Lets callers await "the search I just caused".
    pub generation: u64,
}

impl<T> Default for SearchState<T> {
    fn default() -> Self {
        Self {
            text: String::new(),
            results: Vec::new(),
            selected: None,
            loading: false,
            generation: 0,
        }
    }
}

enum Cmd<T> {
    Input(String),
    Select(T),
    Reset,
}

pub struct SearchSelect<T> {
    cmd_tx: mpsc::UnboundedSender<Cmd<T>>,
    state_rx: watch::Receiver<SearchState<T>>,
}

impl<T> SearchSelect<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(
        provider: Arc<dyn SearchProvider<T>>,
        bus: NotificationBus,
        delay: Duration,
        limit: usize,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(SearchState::default());

        tokio::spawn(run(provider, bus, delay, limit, cmd_rx, state_tx));

        Self { cmd_tx, state_rx }
    }

    /// Feed a keystroke's worth of input. The search itself fires only once
    /// the text has been stable for the debounce delay.
    pub fn input(&self, text: impl Into<String>) {
        let _ = self.cmd_tx.send(Cmd::Input(text.into()));
    }

    /// Collapse to a single selected entity: echo its label, close the
    /// result list, and invalidate any search still in flight.
    pub fn select(&self, item: T) {
        let _ = self.cmd_tx.send(Cmd::Select(item));
    }

    pub fn reset(&self) {
        let _ = self.cmd_tx.send(Cmd::Reset);
    }

    pub fn state(&self) -> SearchState<T> {
        self.state_rx.borrow().clone()
    }

    pub fn selected(&self) -> Option<T> {
        self.state_rx.borrow().selected.clone()
    }

    pub fn watch(&self) -> watch::Receiver<SearchState<T>> {
        self.state_rx.clone()
    }

    /// Wait until the published state satisfies `pred` and return it.
    pub async fn wait_until<F>(&self, pred: F) -> SearchState<T>
    where
        F: Fn(&SearchState<T>) -> bool,
    {
        let mut rx = self.state_rx.clone();
        loop {
            {
                let state = rx.borrow_and_update();
                if pred(&state) {
                    return state.clone();
                }
            }
            if rx.changed().await.is_err() {
                return rx.borrow().clone();
            }
        }
    }
}

async fn run<T>(
    provider: Arc<dyn SearchProvider<T>>,
    bus: NotificationBus,
    delay: Duration,
    limit: usize,
    mut cmd_rx: mpsc::UnboundedReceiver<Cmd<T>>,
    state_tx: watch::Sender<SearchState<T>>,
) where
    T: Clone + Send + Sync + 'static,
{
    let (query_tx, mut query_rx) = debounce::channel::<String>(delay);
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<(u64, Result<Vec<T>, ApiError>)>();

    let mut state = SearchState::<T>::default();
    // Latest issued request number; bumped again on select/reset so that
    // in-flight replies become stale.
    let mut seq: u64 = 0;

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                let Some(cmd) = cmd else { break };
                match cmd {
                    Cmd::Input(text) => {
                        state.text = text.clone();
                        let _ = state_tx.send(state.clone());
                        query_tx.send(text);
                    }
                    Cmd::Select(item) => {
                        seq += 1;
                        query_tx.clear();
                        state.text = provider.label(&item);
                        state.selected = Some(item);
                        state.results.clear();
                        state.loading = false;
                        let _ = state_tx.send(state.clone());
                    }
                    Cmd::Reset => {
                        seq += 1;
                        query_tx.clear();
                        state = SearchState {
                            generation: state.generation,
                            ..SearchState::default()
                        };
                        let _ = state_tx.send(state.clone());
                    }
                }
            }
            Some(query) = query_rx.recv() => {
                if query.is_empty() {
                    // Cancel-by-omission: no request for an empty query.
                    seq += 1;
                    state.results.clear();
                    state.loading = false;
                    state.generation += 1;
                    let _ = state_tx.send(state.clone());
                } else {
                    seq += 1;
                    let this_seq = seq;
                    state.loading = true;
                    let _ = state_tx.send(state.clone());

                    let provider = provider.clone();
                    let done = done_tx.clone();
                    tokio::spawn(async move {
                        let result = provider.search(&query).await;
                        let _ = done.send((this_seq, result));
                    });
                }
            }
            Some((got_seq, result)) = done_rx.recv() => {
                if got_seq != seq {
                    // Superseded while in flight.
                    continue;
                }
                state.loading = false;
                state.generation += 1;
                match result {
                    Ok(mut items) => {
                        items.truncate(limit);
                        state.results = items;
                    }
                    Err(e) => {
                        tracing::debug!("typeahead search failed: {}", e);
                        bus.error(provider.failure_message());
                        state.results.clear();
                    }
                }
                let _ = state_tx.send(state.clone());
            }
        }
    }
}

/// Book typeahead over the catalog search endpoint.
pub struct BookSearch {
    api: ApiClient,
    limit: usize,
}

impl BookSearch {
    pub fn new(api: ApiClient, limit: usize) -> Self {
        Self { api, limit }
    }
}

#[async_trait]
impl SearchProvider<Book> for BookSearch {
    async fn search(&self, query: &str) -> Result<Vec<Book>, ApiError> {
        let page = self
            .api
            .list_books(&BookQuery {
                search: Some(query.to_string()),
                limit: Some(self.limit as u32),
                ..Default::default()
            })
            .await?;
        Ok(page.books)
    }

    fn label(&self, item: &Book) -> String {
        item.title.clone()
    }

    fn failure_message(&self) -> &'static str {
        "Failed to search for books"
    }
}

/// Member typeahead over the admin user listing.
pub struct UserSearch {
    api: ApiClient,
    limit: usize,
}

impl UserSearch {
    pub fn new(api: ApiClient, limit: usize) -> Self {
        Self { api, limit }
    }
}

#[async_trait]
impl SearchProvider<User> for UserSearch {
    async fn search(&self, query: &str) -> Result<Vec<User>, ApiError> {
        self.api.list_users(Some(query), Some(self.limit)).await
    }

    fn label(&self, item: &User) -> String {
        item.username.clone()
    }

    fn failure_message(&self) -> &'static str {
        "Failed to search for users"
    }
}

/// Active-loan typeahead for the return/renew desk.
pub struct BorrowingSearch {
    api: ApiClient,
}

impl BorrowingSearch {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl SearchProvider<BorrowingHit> for BorrowingSearch {
    async fn search(&self, query: &str) -> Result<Vec<BorrowingHit>, ApiError> {
        self.api.search_borrowings(query).await
    }

    fn label(&self, item: &BorrowingHit) -> String {
        item.label()
    }

    fn failure_message(&self) -> &'static str {
        "Failed to search for borrowings"
    }
}
