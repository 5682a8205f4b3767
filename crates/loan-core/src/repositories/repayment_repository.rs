//! Repayment repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::Repayment;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepaymentRepository: Send + Sync {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Repayment>, DomainError>;
    /// Ordered by due date
    async fn list(&self) -> Result<Vec<Repayment>, DomainError>;
    async fn list_by_loan(&self, loan_id: &Uuid) -> Result<Vec<Repayment>, DomainError>;
    async fn list_by_borrower(&self, borrower_id: &Uuid) -> Result<Vec<Repayment>, DomainError>;
    async fn create(&self, repayment: &Repayment) -> Result<Repayment, DomainError>;
    /// Same version check as `LoanRepository::update`
    async fn update(&self, repayment: &Repayment) -> Result<Repayment, DomainError>;
}
