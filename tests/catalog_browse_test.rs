use std::time::Duration;

use chrono::Utc;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use libris::api::ApiClient;
use libris::models::Role;
use libris::notify::NotificationBus;
use libris::services::catalog::CatalogBrowser;
use libris::services::dashboard;
use libris::session::AuthSession;

fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(
        &server.uri(),
        Duration::from_secs(5),
        AuthSession::in_memory(),
    )
    .expect("client")
}

fn page_body(total: i64, total_pages: i64) -> serde_json::Value {
    json!({
        "books": [{
            "id": 1,
            "title": "Pale Fire",
            "author": "Vladimir Nabokov",
            "isbn": "9780679723424",
            "total_copies": 2,
            "available_copies": 2
        }],
        "pagination": { "total": total, "totalPages": total_pages }
    })
}

#[tokio::test]
async fn filter_changes_reset_to_the_first_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/library/books"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "12"))
        .and(query_param("search", "fire"))
        .and(query_param("genre", "Fiction"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(30, 3)))
        .expect(1)
        .mount(&server)
        .await;

    let mut browser = CatalogBrowser::new(client(&server), NotificationBus::new());
    browser.search = "fire".to_string();
    browser.page = 3;

    // Picking a genre jumps back to page 1 with both filters applied.
    browser.set_genre(Some("Fiction".to_string())).await;

    assert_eq!(browser.page, 1);
    assert_eq!(browser.books.len(), 1);
    assert_eq!(browser.total, 30);
    assert_eq!(browser.total_pages, 3);
}

#[tokio::test]
async fn paging_keeps_the_current_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/library/books"))
        .and(query_param("page", "2"))
        .and(query_param("search", "fire"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(30, 3)))
        .expect(1)
        .mount(&server)
        .await;

    let mut browser = CatalogBrowser::new(client(&server), NotificationBus::new());
    browser.search = "fire".to_string();
    browser.goto_page(2).await;
    assert_eq!(browser.page, 2);
}

#[tokio::test]
async fn fetch_failure_keeps_the_previous_page_and_notifies() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/library/books"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let bus = NotificationBus::new();
    let mut browser = CatalogBrowser::new(client(&server), bus.clone());
    browser.books = serde_json::from_value(page_body(1, 1)["books"].clone()).unwrap();

    browser.refresh().await;

    assert_eq!(browser.books.len(), 1, "stale list survives a failed fetch");
    assert!(bus.active().iter().any(|n| n.message == "Error fetching books"));
}

#[tokio::test]
async fn genres_populate_the_filter_dropdown() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/library/genres"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "name": "Fiction" },
            { "id": 2, "name": "Science" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let mut browser = CatalogBrowser::new(client(&server), NotificationBus::new());
    browser.load_genres().await;
    assert_eq!(browser.genres.len(), 2);
    assert_eq!(browser.genres[1].name, "Science");
}

#[tokio::test]
async fn dashboard_fetches_stats_only_for_staff_roles() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/library/borrowings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 1,
                "title": "Pale Fire",
                "due_date": "2020-01-01T00:00:00Z",
                "status": "borrowed"
            },
            {
                "id": 2,
                "title": "Ada",
                "due_date": "2999-01-01T00:00:00Z",
                "status": "borrowed"
            }
        ])))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/library/admin/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalBooks": 120,
            "availableCopies": 95,
            "activeBorrowings": 20,
            "overdueBooks": 4
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server);

    // Staff see the stats block…
    let data = dashboard::load(&api, Role::Librarian, Utc::now())
        .await
        .expect("dashboard");
    assert_eq!(data.recent_borrowings.len(), 2);
    assert_eq!(data.overdue.len(), 1, "only the long-overdue loan qualifies");
    assert_eq!(data.stats.as_ref().unwrap().total_books, 120);

    // …members do not trigger the stats request at all.
    let data = dashboard::load(&api, Role::Student, Utc::now())
        .await
        .expect("dashboard");
    assert!(data.stats.is_none());
}
