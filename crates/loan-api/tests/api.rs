//! Router-level tests over the seeded in-memory store

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use loan_api::{build_router, AppState};
use loan_infrastructure::{seed_demo_data, Repositories};
use loan_shared::config::{AppConfig, AppSettings, BackendSettings, JwtSettings, LendingSettings, SeedSettings};
use loan_shared::utils::today;
use serde_json::{json, Value};
use tower::ServiceExt;

fn test_config() -> AppConfig {
    AppConfig {
        app: AppSettings {
            env: "test".into(),
            host: "127.0.0.1".into(),
            port: 0,
            name: "loan-server".into(),
        },
        jwt: JwtSettings {
            secret: "test-secret-that-is-long-enough-for-hs256".into(),
            access_token_expiry: 3600,
        },
        lending: LendingSettings {
            default_interest_rate: 15.0,
            min_loan_amount: 1000,
            max_term_months: 120,
        },
        backend: BackendSettings {
            base_url: "http://localhost:5000/api".into(),
            timeout_seconds: 15,
        },
        seed: SeedSettings {
            demo_data: true,
            demo_password: "password".into(),
        },
    }
}

async fn app() -> Router {
    let repos = Repositories::in_memory();
    seed_demo_data(&repos, "password").await.unwrap();
    build_router(AppState::new(test_config(), &repos))
}

async fn send(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn login(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": "password" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    body["data"]["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_login_returns_role_home() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "admin@example.com", "password": "password" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["redirect"], "/admin/dashboard");
    assert_eq!(body["data"]["user"]["role"], "admin");
}

#[tokio::test]
async fn test_bad_credentials_and_missing_token_are_401_with_login_redirect() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "admin@example.com", "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["redirect"], "/login");

    let (status, body) = send(&app, Method::GET, "/api/loans", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["redirect"], "/login");
}

#[tokio::test]
async fn test_logout_ends_the_session() {
    let app = app().await;
    let token = login(&app, "user@example.com").await;

    let (status, body) = send(&app, Method::GET, "/api/users/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "user@example.com");

    let (status, body) = send(&app, Method::POST, "/api/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["loggedOut"], true);

    let (status, _) = send(&app, Method::GET, "/api/users/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "name": "Ada Obi", "email": "ada@example.com", "password": "long-enough" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["role"], "user");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "name": "Ada Again", "email": "ada@example.com", "password": "long-enough" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_role_checks() {
    let app = app().await;
    let user = login(&app, "user@example.com").await;
    let verifier = login(&app, "verifier@example.com").await;

    let (status, body) = send(&app, Method::GET, "/api/admin/dashboard", Some(&user), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");
    assert_eq!(body["error"]["redirect"], "/dashboard");
    let (status, body) = send(&app, Method::GET, "/api/repayments", Some(&verifier), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["redirect"], "/verifier/dashboard");
    let (status, _) = send(&app, Method::GET, "/api/dashboard", Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_users_cannot_reach_other_borrowers_loans() {
    let app = app().await;
    let admin = login(&app, "admin@example.com").await;
    let user = login(&app, "user@example.com").await;

    let (_, body) = send(&app, Method::GET, "/api/loans?search=Emergency", Some(&admin), None).await;
    let foreign_id = body["data"]["items"][0]["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/loans/{}/status", foreign_id),
        Some(&user),
        Some(json!({ "status": "rejected" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, Method::GET, &format!("/api/loans/{}", foreign_id), Some(&admin), None).await;
    assert_eq!(body["data"]["status"], "pending");
}

#[tokio::test]
async fn test_borrower_search() {
    let app = app().await;
    let admin = login(&app, "admin@example.com").await;

    let (status, body) = send(&app, Method::GET, "/api/borrowers?search=john%40", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["items"][0]["name"], "John Smith");
    assert_eq!(body["data"]["items"][0]["loansCount"], 2);

    let (_, body) = send(&app, Method::GET, "/api/borrowers?search=JOHN", Some(&admin), None).await;
    let names: Vec<&str> = body["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|b| b["name"].as_str())
        .collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"John Smith"));
    assert!(names.contains(&"Sarah Johnson"));
}

#[tokio::test]
async fn test_loan_filters_and_pagination() {
    let app = app().await;
    let admin = login(&app, "admin@example.com").await;

    let (status, body) = send(&app, Method::GET, "/api/loans?page=2&perPage=5", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 7);
    assert_eq!(body["data"]["totalPages"], 2);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);

    let (_, body) = send(&app, Method::GET, "/api/loans?status=disbursed", Some(&admin), None).await;
    assert_eq!(body["data"]["total"], 1);

    let (status, body) = send(&app, Method::GET, "/api/loans?search=nothing-like-this", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 0);

    let (status, _) = send(&app, Method::GET, "/api/loans?status=lost", Some(&admin), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_navigation_guard() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/api/navigation/authorize?path=/admin/loans", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["decision"], "redirect_to_login");
    assert_eq!(body["data"]["return_to"], "/login?redirect=%2Fadmin%2Floans");

    let verifier = login(&app, "verifier@example.com").await;
    let (_, body) = send(
        &app,
        Method::GET,
        "/api/navigation/authorize?path=/admin/loans",
        Some(&verifier),
        None,
    )
    .await;
    assert_eq!(body["data"]["decision"], "redirect_to_home");
    assert_eq!(body["data"]["path"], "/verifier/dashboard");

    let user = login(&app, "user@example.com").await;
    let (_, body) = send(
        &app,
        Method::GET,
        "/api/navigation/authorize?path=/admin/settings",
        Some(&user),
        None,
    )
    .await;
    assert_eq!(body["data"]["decision"], "redirect_to_home");
    assert_eq!(body["data"]["path"], "/dashboard");
}

#[tokio::test]
async fn test_application_to_paid_installment() {
    let app = app().await;
    let user = login(&app, "user@example.com").await;
    let verifier = login(&app, "verifier@example.com").await;
    let admin = login(&app, "admin@example.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/loans/apply",
        Some(&user),
        Some(json!({
            "amount": 50000,
            "tenure": 12,
            "reason": "Shop inventory",
            "employmentStatus": "Self-employed"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["data"]["status"], "pending");
    let loan_id = body["data"]["id"].as_str().unwrap().to_string();
    let status_uri = format!("/api/loans/{}/status", loan_id);

    // Verifiers may not approve, and a refused move leaves the loan untouched
    let (status, _) = send(&app, Method::PUT, &status_uri, Some(&verifier), Some(json!({ "status": "approved" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = send(&app, Method::PUT, &status_uri, Some(&admin), Some(json!({ "status": "verified" }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    for (token, target) in [(&verifier, "verified"), (&admin, "approved"), (&admin, "disbursed")] {
        let (status, body) = send(&app, Method::PUT, &status_uri, Some(token), Some(json!({ "status": target }))).await;
        assert_eq!(status, StatusCode::OK, "{}: {}", target, body);
        assert_eq!(body["data"]["status"], target);
    }

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/repayments",
        Some(&admin),
        Some(json!({ "loanId": loan_id, "amount": 50000, "dueDate": today().to_string() })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let repayment_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/payments/{}", repayment_id),
        Some(&user),
        Some(json!({ "amount": 50000, "method": "Bank Transfer" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["status"], "paid");
    assert_eq!(body["data"]["paidDate"], today().to_string());
    assert!(body["data"]["transactionId"].as_str().unwrap().starts_with("TRX-"));

    let (_, body) = send(&app, Method::GET, &format!("/api/loans/{}", loan_id), Some(&user), None).await;
    assert_eq!(body["data"]["amountPaid"], 50000);
    assert_eq!(body["data"]["amount"], 50000);

    // A paid installment is terminal
    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/payments/{}", repayment_id),
        Some(&user),
        Some(json!({ "amount": 1, "method": "Cash Deposit" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_partial_payment_from_seeded_schedule() {
    let app = app().await;
    let user = login(&app, "user@example.com").await;

    let (status, body) = send(&app, Method::GET, "/api/payments?status=pending", Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 0);

    let admin = login(&app, "admin@example.com").await;
    let (_, body) = send(&app, Method::GET, "/api/repayments?status=pending", Some(&admin), None).await;
    let pending = &body["data"]["items"][0];
    assert_eq!(pending["amount"], 3750);
    let id = pending["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/repayments/{}/status", id),
        Some(&admin),
        Some(json!({ "status": "overdue" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["status"], "overdue");

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/payments/{}", id),
        Some(&admin),
        Some(json!({ "amount": 1875, "method": "Mobile Money" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["status"], "partial");
}

#[tokio::test]
async fn test_budget_round() {
    let app = app().await;
    let user = login(&app, "user@example.com").await;

    let (status, body) = send(&app, Method::GET, "/api/budget/summary", Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["balance"], 35000);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/budget",
        Some(&user),
        Some(json!({ "category": "Healthcare", "amount": 5000, "type": "expense", "description": "Checkup" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (_, body) = send(&app, Method::GET, "/api/budget/summary", Some(&user), None).await;
    assert_eq!(body["data"]["balance"], 30000);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/budget/{}", id), Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, Method::DELETE, &format!("/api/budget/{}", id), Some(&user), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_oversized_amounts_are_rejected() {
    let app = app().await;
    let user = login(&app, "user@example.com").await;

    for _ in 0..2 {
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/budget",
            Some(&user),
            Some(json!({ "category": "Salary", "amount": u64::MAX, "type": "income" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    let (status, body) = send(&app, Method::GET, "/api/budget/summary", Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["balance"], 35000);
}

#[tokio::test]
async fn test_health_counts_sessions() {
    let app = app().await;
    login(&app, "user@example.com").await;
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["activeSessions"], 1);
}
