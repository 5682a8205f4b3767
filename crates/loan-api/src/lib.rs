//! # LoanDesk API
//!
//! HTTP handlers, session extractor, DTOs, and the JSON response envelope.

pub mod handlers;
pub mod middleware;
pub mod dto;
pub mod error;
pub mod response;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
