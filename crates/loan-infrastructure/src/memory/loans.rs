//! In-memory loans

use async_trait::async_trait;
use loan_core::repositories::LoanRepository;
use loan_core::{DomainError, Loan};
use uuid::Uuid;

use super::table::Table;

pub struct InMemoryLoanRepository {
    table: Table<Loan>,
}

impl Default for InMemoryLoanRepository {
    fn default() -> Self {
        Self { table: Table::new("loan") }
    }
}

impl InMemoryLoanRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first(mut loans: Vec<Loan>) -> Vec<Loan> {
    loans.sort_by(|a, b| b.start_date.cmp(&a.start_date).then_with(|| b.created_at.cmp(&a.created_at)));
    loans
}

#[async_trait]
impl LoanRepository for InMemoryLoanRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Loan>, DomainError> {
        Ok(self.table.get(id))
    }

    async fn list(&self) -> Result<Vec<Loan>, DomainError> {
        Ok(newest_first(self.table.all()))
    }

    async fn list_by_borrower(&self, borrower_id: &Uuid) -> Result<Vec<Loan>, DomainError> {
        Ok(newest_first(self.table.filter(|l| l.borrower_id == *borrower_id)))
    }

    async fn create(&self, loan: &Loan) -> Result<Loan, DomainError> {
        self.table.insert(loan)
    }

    async fn update(&self, loan: &Loan) -> Result<Loan, DomainError> {
        self.table.replace_versioned(loan, DomainError::LoanNotFound)
    }
}
