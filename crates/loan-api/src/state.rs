use std::sync::Arc;

use loan_core::services::{
    AuthService, BorrowerService, BudgetService, DashboardService, LoanService, RepaymentService, UserService,
};
use loan_infrastructure::Repositories;
use loan_security::{JwtService, SessionStore};
use loan_shared::config::AppConfig;

/// Services shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub sessions: Arc<SessionStore>,
    pub auth: Arc<AuthService>,
    pub users: Arc<UserService>,
    pub borrowers: Arc<BorrowerService>,
    pub loans: Arc<LoanService>,
    pub repayments: Arc<RepaymentService>,
    pub budget: Arc<BudgetService>,
    pub dashboards: Arc<DashboardService>,
}

impl AppState {
    pub fn new(config: AppConfig, repos: &Repositories) -> Self {
        let sessions = Arc::new(SessionStore::new());
        let jwt = Arc::new(JwtService::new(&config.jwt.secret, config.jwt.access_token_expiry));
        let auth = Arc::new(AuthService::new(repos.users.clone(), sessions.clone(), jwt));

        Self {
            users: Arc::new(UserService::new(repos.users.clone(), auth.clone())),
            borrowers: Arc::new(BorrowerService::new(repos.borrowers.clone(), repos.loans.clone())),
            loans: Arc::new(LoanService::new(
                repos.loans.clone(),
                repos.borrowers.clone(),
                repos.repayments.clone(),
                repos.users.clone(),
                config.lending.clone(),
            )),
            repayments: Arc::new(RepaymentService::new(
                repos.repayments.clone(),
                repos.loans.clone(),
                repos.borrowers.clone(),
            )),
            budget: Arc::new(BudgetService::new(repos.budget.clone())),
            dashboards: Arc::new(DashboardService::new(
                repos.users.clone(),
                repos.borrowers.clone(),
                repos.loans.clone(),
                repos.repayments.clone(),
            )),
            auth,
            sessions,
            config,
        }
    }
}
