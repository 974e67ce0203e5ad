use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use libris::api::books::BookQuery;
use libris::api::{ApiClient, ApiError};
use libris::models::Role;
use libris::session::{AuthSession, SessionEvent};

fn client(server: &MockServer, session: AuthSession) -> ApiClient {
    ApiClient::new(&server.uri(), Duration::from_secs(5), session).expect("client")
}

fn user_json() -> serde_json::Value {
    json!({
        "id": 7,
        "username": "maria",
        "name": "Maria K",
        "email": "maria@example.edu",
        "role": "librarian"
    })
}

#[tokio::test]
async fn login_stores_token_and_user_on_the_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({"username": "maria", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "token": "tok-abc", "user": user_json() }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = AuthSession::in_memory();
    let api = client(&server, session.clone());

    let user = api.login("maria", "pw").await.expect("login");
    assert_eq!(user.role, Role::Librarian);
    assert_eq!(session.token().as_deref(), Some("tok-abc"));
    assert_eq!(session.current_user().unwrap().username, "maria");
    assert_eq!(*session.watch().borrow(), SessionEvent::SignedIn);
}

#[tokio::test]
async fn bearer_header_is_attached_when_a_token_is_held() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/library/books"))
        .and(header("Authorization", "Bearer tok-xyz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "books": [],
            "pagination": { "total": 0, "totalPages": 0 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = AuthSession::in_memory();
    session.store_login(
        "tok-xyz".to_string(),
        serde_json::from_value(user_json()).unwrap(),
    );

    let api = client(&server, session);
    api.list_books(&BookQuery::default()).await.expect("list");
}

#[tokio::test]
async fn requests_without_a_token_carry_no_auth_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/library/books"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "books": [],
            "pagination": { "total": 0, "totalPages": 0 }
        })))
        .mount(&server)
        .await;

    let api = client(&server, AuthSession::in_memory());
    api.list_books(&BookQuery::default()).await.expect("list");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(
        !requests[0].headers.contains_key("authorization"),
        "unauthenticated request must not send an Authorization header"
    );
}

#[tokio::test]
async fn any_401_evicts_the_token_and_signals_expiry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/library/borrowings"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "Token expired"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = AuthSession::in_memory();
    session.store_login(
        "stale".to_string(),
        serde_json::from_value(user_json()).unwrap(),
    );

    let api = client(&server, session.clone());
    let err = api.my_borrowings().await.expect_err("401 must error");
    assert!(matches!(err, ApiError::Unauthorized));
    assert!(session.token().is_none(), "token must be evicted");
    assert!(session.current_user().is_none());
    assert_eq!(
        *session.watch().borrow(),
        SessionEvent::SignedOut { expired: true }
    );
}

#[tokio::test]
async fn structured_server_errors_are_preferred_over_fallbacks() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/library/borrow"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "No copies available"
        })))
        .mount(&server)
        .await;

    let api = client(&server, AuthSession::in_memory());
    let err = api.borrow_book(3).await.expect_err("must fail");
    assert_eq!(err.message_or("Failed to borrow book"), "No copies available");
}

#[tokio::test]
async fn unstructured_errors_fall_back_to_the_action_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/library/borrow"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let api = client(&server, AuthSession::in_memory());
    let err = api.borrow_book(3).await.expect_err("must fail");
    assert_eq!(err.message_or("Failed to borrow book"), "Failed to borrow book");
}

#[tokio::test]
async fn book_pages_parse_the_pagination_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/library/books"))
        .and(query_param("search", "dune"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "books": [{
                "id": 1,
                "title": "Dune",
                "author": "Frank Herbert",
                "isbn": "9780441172719",
                "genre": "Science Fiction",
                "total_copies": 4,
                "available_copies": 0
            }],
            "pagination": { "total": 25, "totalPages": 3 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server, AuthSession::in_memory());
    let page = api
        .list_books(&BookQuery {
            search: Some("dune".to_string()),
            genre: None,
            page: Some(2),
            limit: Some(12),
        })
        .await
        .expect("page");

    assert_eq!(page.books.len(), 1);
    assert!(!page.books[0].is_available());
    assert_eq!(page.pagination.total, 25);
    assert_eq!(page.pagination.total_pages, 3);
}

#[tokio::test]
async fn reservations_unwrap_the_data_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/library/reservations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{
                "id": 11,
                "book_title": "The Dispossessed",
                "reserved_at": "2024-03-01T09:30:00Z",
                "status": "fulfilled"
            }]
        })))
        .mount(&server)
        .await;

    let api = client(&server, AuthSession::in_memory());
    let reservations = api.my_reservations().await.expect("reservations");
    assert_eq!(reservations.len(), 1);
    assert_eq!(reservations[0].status.display(), "Ready for Pickup");
}

#[tokio::test]
async fn profile_refreshes_the_cached_user() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/profile"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": user_json() })),
        )
        .mount(&server)
        .await;

    let session = AuthSession::in_memory();
    let api = client(&server, session.clone());
    let user = api.profile().await.expect("profile");
    assert_eq!(user.display_name(), "Maria K");
    assert_eq!(session.current_user().unwrap().id, 7);
}
