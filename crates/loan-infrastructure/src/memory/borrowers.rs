//! In-memory borrowers

use async_trait::async_trait;
use loan_core::repositories::BorrowerRepository;
use loan_core::{Borrower, DomainError};
use uuid::Uuid;

use super::table::Table;

pub struct InMemoryBorrowerRepository {
    table: Table<Borrower>,
}

impl Default for InMemoryBorrowerRepository {
    fn default() -> Self {
        Self { table: Table::new("borrower") }
    }
}

impl InMemoryBorrowerRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BorrowerRepository for InMemoryBorrowerRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Borrower>, DomainError> {
        Ok(self.table.get(id))
    }

    async fn find_by_user_id(&self, user_id: &Uuid) -> Result<Option<Borrower>, DomainError> {
        Ok(self.table.find(|b| b.user_id.as_ref() == Some(user_id)))
    }

    async fn list(&self) -> Result<Vec<Borrower>, DomainError> {
        let mut borrowers = self.table.all();
        borrowers.sort_by(|a, b| a.date_applied.cmp(&b.date_applied).then_with(|| a.name.cmp(&b.name)));
        Ok(borrowers)
    }

    async fn create(&self, borrower: &Borrower) -> Result<Borrower, DomainError> {
        self.table.insert(borrower)
    }

    async fn update(&self, borrower: &Borrower) -> Result<Borrower, DomainError> {
        self.table.replace(borrower, DomainError::BorrowerNotFound)
    }
}
