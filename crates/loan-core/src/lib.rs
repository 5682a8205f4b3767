//! # LoanDesk Core
//!
//! Domain entities, lifecycle rules, aggregate statistics, services, and
//! repository traits for the loan-management service.

pub mod domain;
pub mod stats;
pub mod services;
pub mod repositories;
pub mod error;

// Re-export domain entities
pub use domain::*;
pub use error::DomainError;
