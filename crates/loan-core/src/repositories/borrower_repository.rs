//! Borrower repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::Borrower;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BorrowerRepository: Send + Sync {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Borrower>, DomainError>;
    /// Borrower profile owned by a login account
    async fn find_by_user_id(&self, user_id: &Uuid) -> Result<Option<Borrower>, DomainError>;
    async fn list(&self) -> Result<Vec<Borrower>, DomainError>;
    async fn create(&self, borrower: &Borrower) -> Result<Borrower, DomainError>;
    async fn update(&self, borrower: &Borrower) -> Result<Borrower, DomainError>;
}
