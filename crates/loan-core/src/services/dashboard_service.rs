// ============================================================================
// LoanDesk Core - Dashboard Service
// File: crates/loan-core/src/services/dashboard_service.rs
// ============================================================================
//! Role dashboards, derived on every request from the current collections

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use loan_shared::constants::RECENT_LOANS_LIMIT;
use loan_shared::utils::today;
use loan_shared::{Amount, Role};
use serde::Serialize;
use uuid::Uuid;

use super::require_role;
use crate::domain::{Loan, LoanStatus, Session};
use crate::error::DomainError;
use crate::repositories::{BorrowerRepository, LoanRepository, RepaymentRepository, UserRepository};
use crate::stats::{monthly_series, total, ChartPoint, RecoveryRates};

/// Row of the recent-loans table
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentLoan {
    pub id: Uuid,
    pub borrower_id: Uuid,
    pub borrower_name: String,
    pub amount: Amount,
    pub date: NaiveDate,
    pub status: LoanStatus,
    pub reason: String,
}

impl From<&Loan> for RecentLoan {
    fn from(loan: &Loan) -> Self {
        Self {
            id: loan.id,
            borrower_id: loan.borrower_id,
            borrower_name: loan.borrower_name.clone(),
            amount: loan.amount,
            date: loan.start_date,
            status: loan.status,
            reason: loan.purpose.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub active_users: usize,
    pub borrowers: usize,
    pub cash_disbursed: Amount,
    pub cash_received: Amount,
    pub repaid_loans: usize,
    pub loans: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardCharts {
    pub loans_released: Vec<ChartPoint>,
    pub outstanding_loans: Vec<ChartPoint>,
    pub repayments: Vec<ChartPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboard {
    pub stats: AdminStats,
    pub recovery_rates: RecoveryRates,
    pub recent_loans: Vec<RecentLoan>,
    pub charts: DashboardCharts,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifierStats {
    pub loans: usize,
    pub borrowers: usize,
    pub cash_disbursed: Amount,
    pub repaid_loans: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifierDashboard {
    pub stats: VerifierStats,
    /// Applications waiting for verification, newest first
    pub pending_loans: Vec<RecentLoan>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDashboard {
    /// Sum of the caller's loans currently in `disbursed`
    pub balance: Amount,
    pub loans: Vec<RecentLoan>,
}

pub struct DashboardService {
    user_repo: Arc<dyn UserRepository>,
    borrower_repo: Arc<dyn BorrowerRepository>,
    loan_repo: Arc<dyn LoanRepository>,
    repayment_repo: Arc<dyn RepaymentRepository>,
}

impl DashboardService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        borrower_repo: Arc<dyn BorrowerRepository>,
        loan_repo: Arc<dyn LoanRepository>,
        repayment_repo: Arc<dyn RepaymentRepository>,
    ) -> Self {
        Self {
            user_repo,
            borrower_repo,
            loan_repo,
            repayment_repo,
        }
    }

    pub async fn admin(&self, session: &Session) -> Result<AdminDashboard, DomainError> {
        require_role(session, &[Role::Admin], "view the admin dashboard")?;

        let loans = newest_first(self.loan_repo.list().await?);
        let repayments = self.repayment_repo.list().await?;
        let year = today().year();

        let stats = AdminStats {
            active_users: self.user_repo.list().await?.len(),
            borrowers: self.borrower_repo.list().await?.len(),
            cash_disbursed: cash_disbursed(&loans),
            cash_received: total(loans.iter().map(|l| l.amount_paid)),
            repaid_loans: count_status(&loans, LoanStatus::Completed),
            loans: loans.len(),
        };

        let charts = DashboardCharts {
            loans_released: monthly_series(&loans, year, |l| l.status.is_disbursed().then_some(l.start_date), |_| 1),
            outstanding_loans: monthly_series(
                &loans,
                year,
                |l| is_open(l).then_some(l.start_date),
                |l| l.outstanding(),
            ),
            repayments: monthly_series(
                &repayments,
                year,
                |r| r.status.is_settled().then_some(r.paid_date).flatten(),
                |_| 1,
            ),
        };

        Ok(AdminDashboard {
            stats,
            recovery_rates: RecoveryRates::from_loans(&loans),
            recent_loans: loans.iter().take(RECENT_LOANS_LIMIT).map(RecentLoan::from).collect(),
            charts,
        })
    }

    pub async fn verifier(&self, session: &Session) -> Result<VerifierDashboard, DomainError> {
        require_role(session, &[Role::Verifier], "view the verifier dashboard")?;

        let loans = newest_first(self.loan_repo.list().await?);
        let stats = VerifierStats {
            loans: loans.len(),
            borrowers: self.borrower_repo.list().await?.len(),
            cash_disbursed: cash_disbursed(&loans),
            repaid_loans: count_status(&loans, LoanStatus::Completed),
        };

        Ok(VerifierDashboard {
            stats,
            pending_loans: loans
                .iter()
                .filter(|l| l.status == LoanStatus::Pending)
                .take(RECENT_LOANS_LIMIT)
                .map(RecentLoan::from)
                .collect(),
        })
    }

    pub async fn user(&self, session: &Session) -> Result<UserDashboard, DomainError> {
        require_role(session, &[Role::User], "view the borrower dashboard")?;

        let loans = match self.borrower_repo.find_by_user_id(&session.actor_id).await? {
            Some(borrower) => newest_first(self.loan_repo.list_by_borrower(&borrower.id).await?),
            None => Vec::new(),
        };

        Ok(UserDashboard {
            balance: total(
                loans
                    .iter()
                    .filter(|l| l.status == LoanStatus::Disbursed)
                    .map(|l| l.amount),
            ),
            loans: loans.iter().map(RecentLoan::from).collect(),
        })
    }
}

fn newest_first(mut loans: Vec<Loan>) -> Vec<Loan> {
    loans.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    loans
}

fn cash_disbursed(loans: &[Loan]) -> Amount {
    total(loans.iter().filter(|l| l.status.is_disbursed()).map(|l| l.amount))
}

fn count_status(loans: &[Loan], status: LoanStatus) -> usize {
    loans.iter().filter(|l| l.status == status).count()
}

fn is_open(loan: &Loan) -> bool {
    matches!(loan.status, LoanStatus::Disbursed | LoanStatus::Repaying)
}
