use std::sync::Arc;

use eventBooking::clients::api_client::ApiClient;
use eventBooking::errors::ApiError;
use eventBooking::models::auth::{LoginRequest, RegisterRequest};
use eventBooking::models::event::EventUpload;
use eventBooking::service::token_store::{TokenStore, LEGACY_TOKEN_KEY};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client_for(server: &MockServer, tokens: Arc<TokenStore>) -> ApiClient {
    ApiClient::new(&format!("{}/api", server.uri()), tokens)
}

#[tokio::test]
async fn lists_events_with_bearer_from_legacy_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/events"))
        .and(header("Authorization", "Bearer legacy-token"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "title": "Summer Fest", "date": "2026-07-01", "capacity": 10,
             "imagePath": "/uploads/events/1.png"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = Arc::new(TokenStore::in_memory());
    tokens.put(LEGACY_TOKEN_KEY, "legacy-token").unwrap();
    let client = client_for(&server, tokens).await;

    let events = client.get_events().await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].image_path.as_deref(), Some("/uploads/events/1.png"));
}

#[tokio::test]
async fn anonymous_requests_carry_no_authorization() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": true})))
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(TokenStore::in_memory())).await;
    let events = client.get_events().await.unwrap();
    assert!(events.is_empty());

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn arrays_served_as_plain_text_still_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/events"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/plain")
                .set_body_string(r#"[{"id":1,"title":"Summer Fest","capacity":10}]"#),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(TokenStore::in_memory())).await;
    let events = client.get_events().await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].capacity(), 10);
}

#[tokio::test]
async fn forbidden_bookings_are_auth_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/bookings"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Access Denied"))
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(TokenStore::in_memory())).await;
    let err = client.get_bookings().await.unwrap_err();

    assert!(err.is_auth());
    assert_eq!(err.status(), Some(403));
    assert_eq!(err.to_string(), "Auth error (403). Please login.");
    assert_eq!(err.body_text().as_deref(), Some("Access Denied"));
}

#[tokio::test]
async fn plain_text_errors_keep_raw_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/events/5"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database offline"))
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(TokenStore::in_memory())).await;
    let err = client.delete_event(5).await.unwrap_err();

    assert!(matches!(err, ApiError::Status { status: 500, .. }));
    assert_eq!(err.server_message(), None);
    assert_eq!(err.describe("Failed to delete"), "database offline");
    assert_eq!(
        err.to_string(),
        "Request failed: 500 Internal Server Error - database offline"
    );
}

#[tokio::test]
async fn json_errors_expose_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"username": "ana", "password": "nope"})))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Bad credentials"})))
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(TokenStore::in_memory())).await;
    let err = client
        .login(&LoginRequest {
            username: "ana".to_string(),
            password: "nope".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.server_message().as_deref(), Some("Bad credentials"));
}

#[tokio::test]
async fn login_returns_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "abc.def.ghi"})))
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(TokenStore::in_memory())).await;
    let response = client
        .login(&LoginRequest {
            username: "ana".to_string(),
            password: "pw".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(response.token.as_deref(), Some("abc.def.ghi"));
}

#[tokio::test]
async fn register_sends_blank_contacts_as_null() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .and(body_json(json!({
            "username": "kim", "password": "pw", "mobile": null, "email": "kim@example.test"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string("User registered"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(TokenStore::in_memory())).await;
    let response = client
        .register(&RegisterRequest {
            username: "kim".to_string(),
            password: "pw".to_string(),
            mobile: None,
            email: Some("kim@example.test".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(response.message.as_deref(), Some("User registered"));
}

#[tokio::test]
async fn book_and_cancel_hit_booking_routes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/bookings/book/3"))
        .and(header("Authorization", "Bearer t0k"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 21, "event": {"id": 3, "title": "Gala"}, "qrCodePath": "qrcodes/21.png"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/bookings/21"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = Arc::new(TokenStore::in_memory());
    tokens.set_token("t0k").unwrap();
    let client = client_for(&server, tokens).await;

    let booking = client.book_event(3).await.unwrap().unwrap();
    assert_eq!(booking.event_ref(), Some(3));
    client.cancel_booking(21).await.unwrap();
}

#[tokio::test]
async fn create_event_uploads_multipart_with_image() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/events"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 9, "title": "Lantern Night", "date": "2026-09-12", "capacity": 120,
            "imagePath": "/uploads/events/1-poster.png"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("poster.png");
    std::fs::write(&image, b"\x89PNG fake").unwrap();

    let client = client_for(&server, Arc::new(TokenStore::in_memory())).await;
    let created = client
        .create_event(&EventUpload {
            title: "Lantern Night".to_string(),
            description: "Lanterns by the lake".to_string(),
            date: "2026-09-12".to_string(),
            capacity: 120,
            image: Some(image),
        })
        .await
        .unwrap();
    assert_eq!(created.id, 9);

    let requests = server.received_requests().await.unwrap();
    let content_type = requests[0]
        .headers
        .get("content-type")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("multipart/form-data"));
    let body = String::from_utf8_lossy(&requests[0].body).to_string();
    assert!(body.contains("name=\"title\""));
    assert!(body.contains("Lantern Night"));
    assert!(body.contains("name=\"capacity\""));
    assert!(body.contains("filename=\"poster.png\""));
    assert!(body.to_lowercase().contains("content-type: image/png"));
}

#[tokio::test]
async fn admin_ping_reads_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "admin ok"})))
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(TokenStore::in_memory())).await;
    assert_eq!(client.admin_ping().await.unwrap(), "admin ok");
}
