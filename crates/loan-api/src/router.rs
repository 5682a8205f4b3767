// ============================================================================
// LoanDesk API - Router
// File: crates/loan-api/src/router.rs
// ============================================================================

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{
    auth, borrowers, budget, dashboard, health, loans, navigation, payments, repayments, users,
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/register", post(auth::register))
        .route("/api/navigation/authorize", get(navigation::authorize));

    let session_routes = Router::new()
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/users/profile", get(auth::profile))
        .route("/api/users", get(users::list).post(users::create))
        .route("/api/users/{id}", delete(users::delete))
        .route("/api/users/{id}/role", put(users::change_role))
        .route("/api/borrowers", get(borrowers::list).post(borrowers::create))
        .route("/api/borrowers/stats", get(borrowers::account_stats))
        .route("/api/borrowers/verification-stats", get(borrowers::verification_stats))
        .route("/api/borrowers/{id}", get(borrowers::get))
        .route("/api/borrowers/{id}/status", put(borrowers::set_status))
        .route("/api/borrowers/{id}/verification", put(borrowers::verify))
        .route("/api/loans", get(loans::list).post(loans::create))
        .route("/api/loans/apply", post(loans::apply))
        .route("/api/loans/stats", get(loans::stats))
        .route("/api/loans/{id}", get(loans::get))
        .route("/api/loans/{id}/status", put(loans::transition))
        .route("/api/loans/{id}/transitions", get(loans::transitions))
        .route("/api/repayments", get(repayments::list).post(repayments::create))
        .route("/api/repayments/stats", get(repayments::stats))
        .route("/api/repayments/{id}/status", put(repayments::update_status))
        .route("/api/payments", get(repayments::list))
        .route("/api/payments/stats", get(payments::stats))
        .route("/api/payments/{id}", post(payments::pay))
        .route("/api/budget", get(budget::list).post(budget::create))
        .route("/api/budget/summary", get(budget::summary))
        .route("/api/budget/{id}", delete(budget::delete))
        .route("/api/admin/dashboard", get(dashboard::admin))
        .route("/api/verifier/dashboard", get(dashboard::verifier))
        .route("/api/dashboard", get(dashboard::user));

    Router::new()
        .merge(public_routes)
        .merge(session_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
