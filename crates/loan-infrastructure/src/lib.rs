//! # LoanDesk Infrastructure
//!
//! In-memory repository implementations (adapters) and demo data seeding.

pub mod memory;
pub mod seed;
pub mod error;

pub use memory::{
    InMemoryBorrowerRepository, InMemoryBudgetRepository, InMemoryLoanRepository,
    InMemoryRepaymentRepository, InMemoryUserRepository, Repositories,
};
pub use error::SeedError;
pub use seed::seed_demo_data;
