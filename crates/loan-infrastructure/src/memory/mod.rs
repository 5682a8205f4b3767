//! In-memory adapters for the repository ports

mod table;
mod users;
mod borrowers;
mod loans;
mod repayments;
mod budget;

use std::sync::Arc;

use loan_core::repositories::{
    BorrowerRepository, BudgetRepository, LoanRepository, RepaymentRepository, UserRepository,
};

pub use borrowers::InMemoryBorrowerRepository;
pub use budget::InMemoryBudgetRepository;
pub use loans::InMemoryLoanRepository;
pub use repayments::InMemoryRepaymentRepository;
pub use users::InMemoryUserRepository;

/// One shared instance of every repository
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub borrowers: Arc<dyn BorrowerRepository>,
    pub loans: Arc<dyn LoanRepository>,
    pub repayments: Arc<dyn RepaymentRepository>,
    pub budget: Arc<dyn BudgetRepository>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            borrowers: Arc::new(InMemoryBorrowerRepository::new()),
            loans: Arc::new(InMemoryLoanRepository::new()),
            repayments: Arc::new(InMemoryRepaymentRepository::new()),
            budget: Arc::new(InMemoryBudgetRepository::new()),
        }
    }
}
