//! In-memory repayments

use async_trait::async_trait;
use loan_core::repositories::RepaymentRepository;
use loan_core::{DomainError, Repayment};
use uuid::Uuid;

use super::table::Table;

pub struct InMemoryRepaymentRepository {
    table: Table<Repayment>,
}

impl Default for InMemoryRepaymentRepository {
    fn default() -> Self {
        Self { table: Table::new("repayment") }
    }
}

impl InMemoryRepaymentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn by_due_date(mut repayments: Vec<Repayment>) -> Vec<Repayment> {
    repayments.sort_by(|a, b| a.due_date.cmp(&b.due_date).then_with(|| a.created_at.cmp(&b.created_at)));
    repayments
}

#[async_trait]
impl RepaymentRepository for InMemoryRepaymentRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Repayment>, DomainError> {
        Ok(self.table.get(id))
    }

    async fn list(&self) -> Result<Vec<Repayment>, DomainError> {
        Ok(by_due_date(self.table.all()))
    }

    async fn list_by_loan(&self, loan_id: &Uuid) -> Result<Vec<Repayment>, DomainError> {
        Ok(by_due_date(self.table.filter(|r| r.loan_id == *loan_id)))
    }

    async fn list_by_borrower(&self, borrower_id: &Uuid) -> Result<Vec<Repayment>, DomainError> {
        Ok(by_due_date(self.table.filter(|r| r.borrower_id == *borrower_id)))
    }

    async fn create(&self, repayment: &Repayment) -> Result<Repayment, DomainError> {
        self.table.insert(repayment)
    }

    async fn update(&self, repayment: &Repayment) -> Result<Repayment, DomainError> {
        self.table.replace_versioned(repayment, DomainError::RepaymentNotFound)
    }
}
