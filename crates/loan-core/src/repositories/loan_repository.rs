//! Loan repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::Loan;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoanRepository: Send + Sync {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Loan>, DomainError>;
    /// Newest first
    async fn list(&self) -> Result<Vec<Loan>, DomainError>;
    async fn list_by_borrower(&self, borrower_id: &Uuid) -> Result<Vec<Loan>, DomainError>;
    async fn create(&self, loan: &Loan) -> Result<Loan, DomainError>;
    /// Fails with `StaleWrite` when the stored version differs from `loan.version`.
    /// The returned row carries the new version.
    async fn update(&self, loan: &Loan) -> Result<Loan, DomainError>;
}
