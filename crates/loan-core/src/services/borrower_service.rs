//! Borrower listing, onboarding, account standing and verification

use std::collections::HashMap;
use std::sync::Arc;

use loan_shared::utils::today;
use loan_shared::{Amount, Paginated, Pagination, Role};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::require_role;
use crate::domain::{filter_by_search, AccountStatus, Borrower, Session, VerificationStatus};
use crate::error::DomainError;
use crate::repositories::{BorrowerRepository, LoanRepository};
use crate::stats::{BorrowerAccountStats, VerificationStats};

const STAFF: &[Role] = &[Role::Admin, Role::Verifier];

#[derive(Debug, Clone, Default)]
pub struct BorrowerQuery {
    pub search: Option<String>,
    pub status: Option<AccountStatus>,
    pub verification: Option<VerificationStatus>,
    pub pagination: Pagination,
}

/// Admin onboarding form
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewBorrower {
    #[validate(length(min = 2, max = 100, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 5, max = 20, message = "Phone is required"))]
    pub phone: String,
    pub address: Option<String>,
}

/// Borrower with loan totals, as shown in borrower tables
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowerView {
    #[serde(flatten)]
    pub borrower: Borrower,
    pub loans_count: usize,
    pub total_borrowed: Amount,
}

pub struct BorrowerService {
    borrower_repo: Arc<dyn BorrowerRepository>,
    loan_repo: Arc<dyn LoanRepository>,
}

impl BorrowerService {
    pub fn new(borrower_repo: Arc<dyn BorrowerRepository>, loan_repo: Arc<dyn LoanRepository>) -> Self {
        Self { borrower_repo, loan_repo }
    }

    pub async fn list(&self, session: &Session, query: &BorrowerQuery) -> Result<Paginated<BorrowerView>, DomainError> {
        require_role(session, STAFF, "list borrowers")?;

        let borrowers: Vec<Borrower> = filter_by_search(self.borrower_repo.list().await?, query.search.as_deref())
            .into_iter()
            .filter(|b| query.status.is_none_or(|s| b.status == s))
            .filter(|b| query.verification.is_none_or(|v| b.verification == v))
            .collect();

        let mut totals: HashMap<Uuid, (usize, Amount)> = HashMap::new();
        for loan in self.loan_repo.list().await? {
            let entry = totals.entry(loan.borrower_id).or_default();
            entry.0 += 1;
            entry.1 = entry.1.saturating_add(loan.amount);
        }

        Ok(Paginated::from_vec(borrowers, query.pagination).map(|borrower| {
            let (loans_count, total_borrowed) = totals.get(&borrower.id).copied().unwrap_or_default();
            BorrowerView { borrower, loans_count, total_borrowed }
        }))
    }

    pub async fn get(&self, session: &Session, id: &Uuid) -> Result<Borrower, DomainError> {
        require_role(session, STAFF, "view borrowers")?;
        self.find(id).await
    }

    pub async fn add(&self, session: &Session, form: NewBorrower) -> Result<Borrower, DomainError> {
        require_role(session, &[Role::Admin], "add borrowers")?;
        form.validate()?;

        let borrower = Borrower::new(form.name, form.email, form.phone, form.address, None, today())?;
        let created = self.borrower_repo.create(&borrower).await?;
        info!("Borrower {} added by {}", created.id, session.actor_id);
        Ok(created)
    }

    pub async fn set_status(&self, session: &Session, id: &Uuid, status: AccountStatus) -> Result<Borrower, DomainError> {
        let mut borrower = self.find(id).await?;
        borrower.set_status(status, session.role, session.actor_id)?;
        let updated = self.borrower_repo.update(&borrower).await?;
        info!("Borrower {} status set to {} by {}", id, status.as_str(), session.actor_id);
        Ok(updated)
    }

    pub async fn verify(&self, session: &Session, id: &Uuid, outcome: VerificationStatus) -> Result<Borrower, DomainError> {
        let mut borrower = self.find(id).await?;
        borrower.verify(outcome, session.role, session.actor_id)?;
        let updated = self.borrower_repo.update(&borrower).await?;
        info!("Borrower {} verification {} by {}", id, outcome.as_str(), session.actor_id);
        Ok(updated)
    }

    pub async fn account_stats(&self, session: &Session) -> Result<BorrowerAccountStats, DomainError> {
        require_role(session, STAFF, "view borrower statistics")?;
        Ok(BorrowerAccountStats::from_borrowers(&self.borrower_repo.list().await?))
    }

    pub async fn verification_stats(&self, session: &Session) -> Result<VerificationStats, DomainError> {
        require_role(session, STAFF, "view verification statistics")?;
        Ok(VerificationStats::from_borrowers(&self.borrower_repo.list().await?))
    }

    async fn find(&self, id: &Uuid) -> Result<Borrower, DomainError> {
        self.borrower_repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::BorrowerNotFound(*id))
    }
}
