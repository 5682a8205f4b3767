// ============================================================================
// LoanDesk Core - Loan Service
// File: crates/loan-core/src/services/loan_service.rs
// ============================================================================
//! Loan listing, creation, self-service applications, and lifecycle moves

use std::sync::Arc;

use chrono::NaiveDate;
use loan_shared::config::LendingSettings;
use loan_shared::constants::MAX_AMOUNT;
use loan_shared::utils::today;
use loan_shared::{Amount, Paginated, Pagination, Role};
use serde::Deserialize;
use tracing::{debug, info, warn};
use uuid::Uuid;
use validator::Validate;

use super::require_role;
use crate::domain::lifecycle;
use crate::domain::repayment::build_schedule;
use crate::domain::{
    filter_by_search, AccountStatus, Borrower, EmploymentDetails, Loan, LoanStatus, Session,
};
use crate::error::DomainError;
use crate::repositories::{BorrowerRepository, LoanRepository, RepaymentRepository, UserRepository};
use crate::stats::LoanPortfolioStats;

const STAFF: &[Role] = &[Role::Admin, Role::Verifier];

#[derive(Debug, Clone, Default)]
pub struct LoanQuery {
    pub search: Option<String>,
    pub status: Option<LoanStatus>,
    pub pagination: Pagination,
}

/// Loan recorded by an admin for an existing borrower
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewLoan {
    pub borrower_id: Uuid,
    #[validate(range(min = 1, max = MAX_AMOUNT, message = "Amount must be positive and within the maximum amount"))]
    pub amount: Amount,
    pub interest_rate: Option<f64>,
    #[validate(range(min = 1, message = "Term must be at least one month"))]
    pub term_months: u32,
    #[validate(length(min = 1, message = "Purpose is required"))]
    pub purpose: String,
    pub start_date: Option<NaiveDate>,
}

/// Self-service application form
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoanApplication {
    #[validate(range(max = MAX_AMOUNT, message = "Amount exceeds the maximum amount"))]
    pub amount: Amount,
    /// Months
    #[validate(range(min = 1, message = "Tenure must be at least one month"))]
    pub tenure: u32,
    #[validate(length(min = 1, max = 500, message = "Reason is required"))]
    pub reason: String,
    #[validate(length(min = 1, message = "Employment status is required"))]
    pub employment_status: String,
    pub employer_name: Option<String>,
    pub employer_address: Option<String>,
    /// Used for the borrower profile created by a first application
    pub phone: Option<String>,
}

pub struct LoanService {
    loan_repo: Arc<dyn LoanRepository>,
    borrower_repo: Arc<dyn BorrowerRepository>,
    repayment_repo: Arc<dyn RepaymentRepository>,
    user_repo: Arc<dyn UserRepository>,
    lending: LendingSettings,
}

impl LoanService {
    pub fn new(
        loan_repo: Arc<dyn LoanRepository>,
        borrower_repo: Arc<dyn BorrowerRepository>,
        repayment_repo: Arc<dyn RepaymentRepository>,
        user_repo: Arc<dyn UserRepository>,
        lending: LendingSettings,
    ) -> Self {
        Self {
            loan_repo,
            borrower_repo,
            repayment_repo,
            user_repo,
            lending,
        }
    }

    /// Staff see every loan; users see the loans of their own borrower profile
    pub async fn list(&self, session: &Session, query: &LoanQuery) -> Result<Paginated<Loan>, DomainError> {
        let loans = self.visible_loans(session).await?;
        let loans: Vec<Loan> = filter_by_search(loans, query.search.as_deref())
            .into_iter()
            .filter(|l| query.status.is_none_or(|s| l.status == s))
            .collect();
        Ok(Paginated::from_vec(loans, query.pagination))
    }

    pub async fn get(&self, session: &Session, id: &Uuid) -> Result<Loan, DomainError> {
        self.find_visible(session, id).await
    }

    pub async fn create(&self, session: &Session, form: NewLoan) -> Result<Loan, DomainError> {
        require_role(session, &[Role::Admin], "create loans")?;
        form.validate()?;
        self.check_limits(form.amount, form.term_months)?;

        let borrower = self
            .borrower_repo
            .find_by_id(&form.borrower_id)
            .await?
            .ok_or(DomainError::BorrowerNotFound(form.borrower_id))?;

        let loan = Loan::new(
            borrower.id,
            borrower.name.clone(),
            form.amount,
            form.interest_rate.unwrap_or(self.lending.default_interest_rate),
            form.term_months,
            form.purpose,
            form.start_date.unwrap_or_else(today),
            None,
        )?;
        let created = self.loan_repo.create(&loan).await?;
        info!("Loan {} of {} created for borrower {} by {}", created.id, created.amount, borrower.id, session.actor_id);
        Ok(created)
    }

    /// A user applies for a loan; their borrower profile is created on the
    /// first application.
    pub async fn apply(&self, session: &Session, form: LoanApplication) -> Result<Loan, DomainError> {
        require_role(session, &[Role::User], "apply for loans")?;
        form.validate()?;
        self.check_limits(form.amount, form.tenure)?;

        let borrower = self.profile_for(session, form.phone.as_deref()).await?;
        if borrower.status == AccountStatus::Blacklisted {
            warn!("Blacklisted borrower {} attempted to apply", borrower.id);
            return Err(DomainError::forbidden(session.role, "apply for loans while blacklisted"));
        }

        let employment = EmploymentDetails {
            employment_status: form.employment_status.trim().to_string(),
            employer_name: non_blank(form.employer_name),
            employer_address: non_blank(form.employer_address),
        };
        let loan = Loan::new(
            borrower.id,
            borrower.name.clone(),
            form.amount,
            self.lending.default_interest_rate,
            form.tenure,
            form.reason,
            today(),
            Some(employment),
        )?;
        let created = self.loan_repo.create(&loan).await?;
        info!("Loan application {} submitted by borrower {}", created.id, borrower.id);
        Ok(created)
    }

    /// Move a loan along its lifecycle. Disbursement generates the repayment
    /// schedule when the loan has none yet.
    pub async fn transition(&self, session: &Session, id: &Uuid, target: LoanStatus) -> Result<Loan, DomainError> {
        let mut loan = self.find_visible(session, id).await?;
        let previous = loan.transition(target, session.role, session.actor_id)?;
        let updated = self.loan_repo.update(&loan).await?;
        info!("Loan {} {} -> {} by {}", id, previous.as_str(), target.as_str(), session.actor_id);

        if target == LoanStatus::Disbursed && self.repayment_repo.list_by_loan(id).await?.is_empty() {
            let schedule = build_schedule(&updated, today())?;
            for installment in &schedule {
                self.repayment_repo.create(installment).await?;
            }
            debug!("Generated {} installments for loan {}", schedule.len(), id);
        }
        Ok(updated)
    }

    /// Targets the caller may move this loan to right now
    pub async fn available_transitions(&self, session: &Session, id: &Uuid) -> Result<Vec<LoanStatus>, DomainError> {
        let loan = self.find_visible(session, id).await?;
        Ok(lifecycle::available_transitions(loan.status, session.role))
    }

    pub async fn portfolio_stats(&self, session: &Session) -> Result<LoanPortfolioStats, DomainError> {
        require_role(session, STAFF, "view loan statistics")?;
        Ok(LoanPortfolioStats::from_loans(&self.loan_repo.list().await?))
    }

    pub(crate) async fn visible_loans(&self, session: &Session) -> Result<Vec<Loan>, DomainError> {
        match session.role {
            Role::Admin | Role::Verifier => self.loan_repo.list().await,
            Role::User => match self.borrower_repo.find_by_user_id(&session.actor_id).await? {
                Some(borrower) => self.loan_repo.list_by_borrower(&borrower.id).await,
                None => Ok(Vec::new()),
            },
        }
    }

    async fn owns(&self, session: &Session, loan: &Loan) -> Result<bool, DomainError> {
        Ok(self
            .borrower_repo
            .find_by_user_id(&session.actor_id)
            .await?
            .is_some_and(|b| b.id == loan.borrower_id))
    }

    async fn profile_for(&self, session: &Session, phone: Option<&str>) -> Result<Borrower, DomainError> {
        if let Some(existing) = self.borrower_repo.find_by_user_id(&session.actor_id).await? {
            return Ok(existing);
        }

        let user = self
            .user_repo
            .find_by_id(&session.actor_id)
            .await?
            .ok_or(DomainError::UserNotFound(session.actor_id))?;
        let borrower = Borrower::new(
            user.name,
            user.email,
            phone.unwrap_or_default().to_string(),
            None,
            Some(user.id),
            today(),
        )?;
        let created = self.borrower_repo.create(&borrower).await?;
        info!("Borrower profile {} created for user {}", created.id, session.actor_id);
        Ok(created)
    }

    fn check_limits(&self, amount: Amount, term_months: u32) -> Result<(), DomainError> {
        if amount < self.lending.min_loan_amount {
            return Err(DomainError::ValidationError(format!(
                "Loan amount must be at least {}",
                self.lending.min_loan_amount
            )));
        }
        if term_months > self.lending.max_term_months {
            return Err(DomainError::ValidationError(format!(
                "Term must be at most {} months",
                self.lending.max_term_months
            )));
        }
        Ok(())
    }

    /// Users only see the loans of their own borrower profile; other
    /// borrowers' loans read as missing.
    async fn find_visible(&self, session: &Session, id: &Uuid) -> Result<Loan, DomainError> {
        let loan = self.loan_repo.find_by_id(id).await?.ok_or(DomainError::LoanNotFound(*id))?;
        if session.role == Role::User && !self.owns(session, &loan).await? {
            return Err(DomainError::LoanNotFound(*id));
        }
        Ok(loan)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
