//! In-memory budget items

use async_trait::async_trait;
use loan_core::repositories::BudgetRepository;
use loan_core::{BudgetItem, DomainError};
use uuid::Uuid;

use super::table::Table;

pub struct InMemoryBudgetRepository {
    table: Table<BudgetItem>,
}

impl Default for InMemoryBudgetRepository {
    fn default() -> Self {
        Self { table: Table::new("budget item") }
    }
}

impl InMemoryBudgetRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BudgetRepository for InMemoryBudgetRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<BudgetItem>, DomainError> {
        Ok(self.table.get(id))
    }

    async fn list_by_owner(&self, owner_id: &Uuid) -> Result<Vec<BudgetItem>, DomainError> {
        let mut items = self.table.filter(|i| i.owner_id == *owner_id);
        items.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.created_at.cmp(&b.created_at)));
        Ok(items)
    }

    async fn create(&self, item: &BudgetItem) -> Result<BudgetItem, DomainError> {
        self.table.insert(item)
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, DomainError> {
        Ok(self.table.remove(id))
    }
}
