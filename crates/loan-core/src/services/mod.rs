//! Domain services (business logic)
//!
//! Every operation takes the caller's `Session` explicitly; role checks
//! happen here, whatever the transport in front of it already checked.

pub mod auth_service;
pub mod user_service;
pub mod borrower_service;
pub mod loan_service;
pub mod repayment_service;
pub mod budget_service;
pub mod dashboard_service;

pub use auth_service::{AuthService, LoginResult, UserInfo};
pub use user_service::UserService;
pub use borrower_service::{BorrowerQuery, BorrowerService, BorrowerView, NewBorrower};
pub use loan_service::{LoanApplication, LoanQuery, LoanService, NewLoan};
pub use repayment_service::{NewRepayment, RepaymentQuery, RepaymentService};
pub use budget_service::{BudgetService, NewBudgetItem};
pub use dashboard_service::{AdminDashboard, DashboardService, RecentLoan, UserDashboard, VerifierDashboard};

use loan_shared::Role;

use crate::domain::Session;
use crate::error::DomainError;

/// Fail with `Forbidden` unless the session's role is one of `allowed`
pub(crate) fn require_role(session: &Session, allowed: &[Role], action: &str) -> Result<(), DomainError> {
    if allowed.contains(&session.role) {
        Ok(())
    } else {
        Err(DomainError::forbidden(session.role, action))
    }
}
