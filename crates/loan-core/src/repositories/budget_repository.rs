//! Budget item repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::BudgetItem;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BudgetRepository: Send + Sync {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<BudgetItem>, DomainError>;
    async fn list_by_owner(&self, owner_id: &Uuid) -> Result<Vec<BudgetItem>, DomainError>;
    async fn create(&self, item: &BudgetItem) -> Result<BudgetItem, DomainError>;
    async fn delete(&self, id: &Uuid) -> Result<bool, DomainError>;
}
