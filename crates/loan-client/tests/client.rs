//! Backend client against a mocked REST backend

use std::time::Duration;

use loan_client::payload::ListQuery;
use loan_client::{BackendClient, ClientError, FetchState, ViewLoader};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn envelope(data: serde_json::Value) -> serde_json::Value {
    json!({ "success": true, "data": data, "error": null, "timestamp": "2024-01-01T00:00:00Z" })
}

async fn signed_in(server: &MockServer) -> BackendClient {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "admin@example.com", "password": "password" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "token": "tok-123",
            "expiresIn": 3600,
            "redirect": "/admin/dashboard",
            "user": { "id": "u1", "name": "Admin User", "email": "admin@example.com", "role": "admin" }
        }))))
        .mount(server)
        .await;

    let client = BackendClient::with_timeout(&format!("{}/api", server.uri()), Duration::from_secs(5)).unwrap();
    let login = client.login("admin@example.com", "password").await.unwrap();
    assert_eq!(login.redirect, "/admin/dashboard");
    client
}

#[tokio::test]
async fn test_requests_carry_bearer_token_and_filters() {
    let server = MockServer::start().await;
    let client = signed_in(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/loans"))
        .and(header("authorization", "Bearer tok-123"))
        .and(query_param("search", "john smith"))
        .and(query_param("perPage", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "items": [{ "id": "l1", "borrowerName": "John Smith", "amount": 50000, "status": "pending" }],
            "page": 1, "perPage": 5, "total": 1, "totalPages": 1
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let page = client
        .loans(&ListQuery {
            search: Some("john smith".into()),
            per_page: Some(5),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].borrower_name, "John Smith");
    assert_eq!(page.items[0].amount_paid, 0);
}

#[tokio::test]
async fn test_401_clears_token_and_redirects_to_login() {
    let server = MockServer::start().await;
    let client = signed_in(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/admin/dashboard"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "data": null,
            "error": { "code": "UNAUTHORIZED", "message": "Session expired", "redirect": "/login" }
        })))
        .mount(&server)
        .await;

    let error = client.admin_dashboard().await.unwrap_err();
    assert_eq!(error.redirect(), Some("/login"));
    assert!(!client.tokens().is_signed_in());
}

#[tokio::test]
async fn test_bad_credentials_are_an_error_not_a_redirect() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = BackendClient::with_timeout(&format!("{}/api", server.uri()), Duration::from_secs(5)).unwrap();
    match client.login("admin@example.com", "nope").await {
        Err(ClientError::Api { status, .. }) => assert_eq!(status, 401),
        other => panic!("unexpected {:?}", other),
    }
    assert!(!client.tokens().is_signed_in());
}

#[tokio::test]
async fn test_dashboard_tolerates_missing_aggregates() {
    let server = MockServer::start().await;
    let client = signed_in(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/admin/dashboard"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "stats": { "activeUsers": 3, "cashDisbursed": "n/a" },
            "recentLoans": []
        }))))
        .mount(&server)
        .await;

    let dashboard = client.admin_dashboard().await.unwrap();
    assert_eq!(dashboard.stats.active_users, 3);
    assert_eq!(dashboard.stats.cash_disbursed, 0);
    assert_eq!(dashboard.stats.cash_received, 0);
    assert_eq!(dashboard.recovery_rates.overall, 0.0);
}

#[tokio::test]
async fn test_error_envelope_is_surfaced() {
    let server = MockServer::start().await;
    let client = signed_in(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "success": false,
            "data": null,
            "error": { "code": "CONFLICT", "message": "Email already exists: ada@example.com" }
        })))
        .mount(&server)
        .await;

    match client.register("Ada", "ada@example.com", "long-enough").await {
        Err(ClientError::Api { status, code, .. }) => {
            assert_eq!(status, 409);
            assert_eq!(code, "CONFLICT");
        }
        other => panic!("unexpected {:?}", other),
    }
    assert!(client.tokens().is_signed_in());
}

#[tokio::test]
async fn test_slow_backend_times_out_into_error_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/profile"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(json!({ "id": "u1" })))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = BackendClient::with_timeout(&format!("{}/api", server.uri()), Duration::from_millis(200)).unwrap();
    let loader = ViewLoader::new();
    assert!(loader.load(client.profile()).await);
    assert_eq!(
        loader.state(),
        FetchState::Error { message: "Request timed out".to_string(), redirect: None }
    );
}

#[tokio::test]
async fn test_logout_drops_token() {
    let server = MockServer::start().await;
    let client = signed_in(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({ "loggedOut": true }))))
        .mount(&server)
        .await;

    client.logout().await.unwrap();
    assert!(!client.tokens().is_signed_in());
}
