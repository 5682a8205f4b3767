//! Repository traits (ports)

pub mod user_repository;
pub mod borrower_repository;
pub mod loan_repository;
pub mod repayment_repository;
pub mod budget_repository;

pub use user_repository::UserRepository;
pub use borrower_repository::BorrowerRepository;
pub use loan_repository::LoanRepository;
pub use repayment_repository::RepaymentRepository;
pub use budget_repository::BudgetRepository;

#[cfg(test)]
pub use user_repository::MockUserRepository;
#[cfg(test)]
pub use borrower_repository::MockBorrowerRepository;
#[cfg(test)]
pub use loan_repository::MockLoanRepository;
#[cfg(test)]
pub use repayment_repository::MockRepaymentRepository;
#[cfg(test)]
pub use budget_repository::MockBudgetRepository;
