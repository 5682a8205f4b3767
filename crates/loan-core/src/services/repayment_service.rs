// ============================================================================
// LoanDesk Core - Repayment Service
// File: crates/loan-core/src/services/repayment_service.rs
// ============================================================================
//! Installment administration and borrower payments

use std::sync::Arc;

use chrono::NaiveDate;
use loan_shared::constants::MAX_AMOUNT;
use loan_shared::utils::today;
use loan_shared::{Amount, Paginated, Pagination, Role};
use serde::Deserialize;
use tracing::{debug, info, warn};
use uuid::Uuid;
use validator::Validate;

use super::require_role;
use crate::domain::{
    filter_by_search, Loan, PaymentMethod, PaymentReceipt, Repayment, RepaymentStatus, Session,
};
use crate::error::DomainError;
use crate::repositories::{BorrowerRepository, LoanRepository, RepaymentRepository};
use crate::stats::{PaymentStats, RepaymentStats};

#[derive(Debug, Clone, Default)]
pub struct RepaymentQuery {
    pub search: Option<String>,
    pub status: Option<RepaymentStatus>,
    pub pagination: Pagination,
}

/// Installment added by an admin
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewRepayment {
    pub loan_id: Uuid,
    #[validate(range(min = 1, max = MAX_AMOUNT, message = "Amount must be positive and within the maximum amount"))]
    pub amount: Amount,
    pub due_date: NaiveDate,
    pub notes: Option<String>,
}

const MAX_CREDIT_ATTEMPTS: usize = 5;

pub struct RepaymentService {
    repayment_repo: Arc<dyn RepaymentRepository>,
    loan_repo: Arc<dyn LoanRepository>,
    borrower_repo: Arc<dyn BorrowerRepository>,
}

impl RepaymentService {
    pub fn new(
        repayment_repo: Arc<dyn RepaymentRepository>,
        loan_repo: Arc<dyn LoanRepository>,
        borrower_repo: Arc<dyn BorrowerRepository>,
    ) -> Self {
        Self {
            repayment_repo,
            loan_repo,
            borrower_repo,
        }
    }

    /// All installments (admin) or the caller's own (user)
    pub async fn list(&self, session: &Session, query: &RepaymentQuery) -> Result<Paginated<Repayment>, DomainError> {
        let repayments = self.visible(session).await?;
        let repayments: Vec<Repayment> = filter_by_search(repayments, query.search.as_deref())
            .into_iter()
            .filter(|r| query.status.is_none_or(|s| r.status == s))
            .collect();
        Ok(Paginated::from_vec(repayments, query.pagination))
    }

    pub async fn stats(&self, session: &Session) -> Result<RepaymentStats, DomainError> {
        require_role(session, &[Role::Admin], "view repayment statistics")?;
        Ok(RepaymentStats::from_repayments(&self.repayment_repo.list().await?))
    }

    pub async fn payment_stats(&self, session: &Session) -> Result<PaymentStats, DomainError> {
        require_role(session, &[Role::User], "view personal payment statistics")?;
        Ok(PaymentStats::from_repayments(&self.visible(session).await?))
    }

    pub async fn add(&self, session: &Session, form: NewRepayment) -> Result<Repayment, DomainError> {
        require_role(session, &[Role::Admin], "add repayments")?;
        form.validate()?;

        let loan = self
            .loan_repo
            .find_by_id(&form.loan_id)
            .await?
            .ok_or(DomainError::LoanNotFound(form.loan_id))?;
        if !loan.status.is_disbursed() || loan.status.is_terminal() {
            return Err(DomainError::ValidationError(format!(
                "Repayments cannot be added to a {} loan",
                loan.status.as_str()
            )));
        }

        let repayment = Repayment::new(&loan, form.amount, form.due_date, form.notes)?;
        let created = self.repayment_repo.create(&repayment).await?;
        info!("Repayment {} added to loan {} by {}", created.id, loan.id, session.actor_id);
        Ok(created)
    }

    /// Pay against an installment. Users may only pay their own. The loan is
    /// credited with the amount, never beyond its principal.
    pub async fn record_payment(
        &self,
        session: &Session,
        id: &Uuid,
        amount: Amount,
        method: PaymentMethod,
    ) -> Result<PaymentReceipt, DomainError> {
        require_role(session, &[Role::Admin, Role::User], "record payments")?;
        let mut repayment = self.find(id).await?;
        if session.role == Role::User && !self.owns(session, &repayment).await? {
            warn!("User {} attempted to pay repayment {} they do not own", session.actor_id, id);
            return Err(DomainError::RepaymentNotFound(*id));
        }

        let loan = self
            .loan_repo
            .find_by_id(&repayment.loan_id)
            .await?
            .ok_or(DomainError::LoanNotFound(repayment.loan_id))?;

        let receipt = repayment.record_payment(amount, method, today())?;
        // A concurrent payment on the same installment fails here with nothing written
        self.repayment_repo.update(&repayment).await?;
        let (loan, applied) = self.credit_loan(loan, amount).await?;

        info!(
            "Payment {} of {} on repayment {} ({}), {} credited to loan {}",
            receipt.transaction_id,
            amount,
            id,
            receipt.status.as_str(),
            applied,
            loan.id
        );
        Ok(receipt)
    }

    /// Admin status change from the repayments table
    pub async fn update_status(
        &self,
        session: &Session,
        id: &Uuid,
        status: RepaymentStatus,
        method: Option<PaymentMethod>,
    ) -> Result<Repayment, DomainError> {
        require_role(session, &[Role::Admin], "change repayment status")?;
        match status {
            RepaymentStatus::Paid => {
                let remaining = self.find(id).await?.remaining();
                self.record_payment(session, id, remaining, method.unwrap_or_default()).await?;
                self.find(id).await
            }
            RepaymentStatus::Overdue => {
                let mut repayment = self.find(id).await?;
                repayment.mark_overdue()?;
                let updated = self.repayment_repo.update(&repayment).await?;
                info!("Repayment {} marked overdue by {}", id, session.actor_id);
                Ok(updated)
            }
            RepaymentStatus::Partial => Err(DomainError::ValidationError(
                "A partial status needs a payment amount".to_string(),
            )),
            RepaymentStatus::Pending => {
                let current = self.find(id).await?;
                Err(DomainError::InvalidTransition {
                    entity: "repayment",
                    from: current.status.as_str().to_string(),
                    to: status.as_str().to_string(),
                })
            }
        }
    }

    /// Credit the loan, re-reading it when another payment got there first
    async fn credit_loan(&self, mut loan: Loan, amount: Amount) -> Result<(Loan, Amount), DomainError> {
        for _ in 1..MAX_CREDIT_ATTEMPTS {
            let applied = loan.credit(amount);
            match self.loan_repo.update(&loan).await {
                Ok(updated) => return Ok((updated, applied)),
                Err(DomainError::StaleWrite { .. }) => {
                    debug!("Loan {} changed during payment, retrying credit", loan.id);
                    loan = self
                        .loan_repo
                        .find_by_id(&loan.id)
                        .await?
                        .ok_or(DomainError::LoanNotFound(loan.id))?;
                }
                Err(e) => return Err(e),
            }
        }
        let applied = loan.credit(amount);
        Ok((self.loan_repo.update(&loan).await?, applied))
    }

    async fn visible(&self, session: &Session) -> Result<Vec<Repayment>, DomainError> {
        match session.role {
            Role::Admin => self.repayment_repo.list().await,
            Role::User => match self.borrower_repo.find_by_user_id(&session.actor_id).await? {
                Some(borrower) => self.repayment_repo.list_by_borrower(&borrower.id).await,
                None => Ok(Vec::new()),
            },
            Role::Verifier => Err(DomainError::forbidden(session.role, "list repayments")),
        }
    }

    async fn owns(&self, session: &Session, repayment: &Repayment) -> Result<bool, DomainError> {
        Ok(self
            .borrower_repo
            .find_by_user_id(&session.actor_id)
            .await?
            .is_some_and(|b| b.id == repayment.borrower_id))
    }

    async fn find(&self, id: &Uuid) -> Result<Repayment, DomainError> {
        self.repayment_repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::RepaymentNotFound(*id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Borrower, Loan, LoanStatus};
    use crate::repositories::{MockBorrowerRepository, MockLoanRepository, MockRepaymentRepository};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn disbursed_loan(borrower: &Borrower, amount: Amount) -> Loan {
        let mut loan = Loan::new(
            borrower.id,
            borrower.name.clone(),
            amount,
            15.0,
            12,
            "Business expansion".into(),
            date(2023, 1, 15),
            None,
        )
        .unwrap();
        loan.status = LoanStatus::Disbursed;
        loan
    }

    fn borrower_for(user_id: Uuid) -> Borrower {
        Borrower::new(
            "John Smith".into(),
            "john@example.com".into(),
            "+1234567890".into(),
            None,
            Some(user_id),
            date(2023, 1, 1),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_user_pays_full_installment() {
        let user = Session::new(Uuid::new_v4(), Role::User, 3600);
        let borrower = borrower_for(user.actor_id);
        let loan = disbursed_loan(&borrower, 50_000);
        let repayment = Repayment::new(&loan, 50_000, date(2023, 2, 15), None).unwrap();
        let id = repayment.id;

        let mut repayments = MockRepaymentRepository::new();
        repayments.expect_find_by_id().returning(move |_| Ok(Some(repayment.clone())));
        repayments
            .expect_update()
            .withf(|r| r.status == RepaymentStatus::Paid && r.paid_date == Some(today()) && r.is_consistent())
            .times(1)
            .returning(|r| Ok(r.clone()));
        let mut loans = MockLoanRepository::new();
        loans.expect_find_by_id().returning(move |_| Ok(Some(loan.clone())));
        loans
            .expect_update()
            .withf(|l| l.amount_paid == 50_000 && l.amount_paid <= l.amount)
            .times(1)
            .returning(|l| Ok(l.clone()));
        let mut borrowers = MockBorrowerRepository::new();
        borrowers.expect_find_by_user_id().returning(move |_| Ok(Some(borrower.clone())));

        let service = RepaymentService::new(Arc::new(repayments), Arc::new(loans), Arc::new(borrowers));
        let receipt = service
            .record_payment(&user, &id, 50_000, PaymentMethod::BankTransfer)
            .await
            .unwrap();

        assert_eq!(receipt.status, RepaymentStatus::Paid);
        assert_eq!(receipt.paid_date, today());
        assert!(receipt.transaction_id.starts_with("TRX-"));
    }

    #[tokio::test]
    async fn test_user_cannot_pay_someone_elses_installment() {
        let owner = borrower_for(Uuid::new_v4());
        let intruder = Session::new(Uuid::new_v4(), Role::User, 3600);
        let intruder_profile = borrower_for(intruder.actor_id);
        let loan = disbursed_loan(&owner, 10_000);
        let repayment = Repayment::new(&loan, 5_000, date(2023, 2, 15), None).unwrap();
        let id = repayment.id;

        let mut repayments = MockRepaymentRepository::new();
        repayments.expect_find_by_id().returning(move |_| Ok(Some(repayment.clone())));
        repayments.expect_update().never();
        let mut borrowers = MockBorrowerRepository::new();
        borrowers.expect_find_by_user_id().returning(move |_| Ok(Some(intruder_profile.clone())));

        let service = RepaymentService::new(
            Arc::new(repayments),
            Arc::new(MockLoanRepository::new()),
            Arc::new(borrowers),
        );
        assert!(matches!(
            service.record_payment(&intruder, &id, 5_000, PaymentMethod::CardPayment).await,
            Err(DomainError::RepaymentNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_overpayment_caps_loan_credit() {
        let admin = Session::new(Uuid::new_v4(), Role::Admin, 3600);
        let borrower = borrower_for(Uuid::new_v4());
        let mut loan = disbursed_loan(&borrower, 10_000);
        loan.amount_paid = 9_000;
        let repayment = Repayment::new(&loan, 3_750, date(2023, 3, 15), None).unwrap();
        let id = repayment.id;

        let mut repayments = MockRepaymentRepository::new();
        repayments.expect_find_by_id().returning(move |_| Ok(Some(repayment.clone())));
        repayments.expect_update().returning(|r| Ok(r.clone()));
        let mut loans = MockLoanRepository::new();
        loans.expect_find_by_id().returning(move |_| Ok(Some(loan.clone())));
        loans
            .expect_update()
            .withf(|l| l.amount_paid == l.amount)
            .times(1)
            .returning(|l| Ok(l.clone()));

        let service = RepaymentService::new(
            Arc::new(repayments),
            Arc::new(loans),
            Arc::new(MockBorrowerRepository::new()),
        );
        let receipt = service
            .record_payment(&admin, &id, 1_875, PaymentMethod::MobileMoney)
            .await
            .unwrap();
        assert_eq!(receipt.status, RepaymentStatus::Partial);
    }

    #[tokio::test]
    async fn test_credit_rereads_loan_after_concurrent_payment() {
        let admin = Session::new(Uuid::new_v4(), Role::Admin, 3600);
        let borrower = borrower_for(Uuid::new_v4());
        let loan = disbursed_loan(&borrower, 10_000);
        let repayment = Repayment::new(&loan, 3_750, date(2023, 3, 15), None).unwrap();
        let id = repayment.id;

        let mut repayments = MockRepaymentRepository::new();
        repayments.expect_find_by_id().returning(move |_| Ok(Some(repayment.clone())));
        repayments.expect_update().times(1).returning(|r| Ok(r.clone()));

        let mut loans = MockLoanRepository::new();
        let mut reads = 0;
        loans.expect_find_by_id().times(2).returning(move |_| {
            reads += 1;
            let mut current = loan.clone();
            if reads > 1 {
                current.amount_paid = 9_000;
                current.version = 1;
            }
            Ok(Some(current))
        });
        let mut writes = 0;
        loans.expect_update().times(2).returning(move |l| {
            writes += 1;
            if writes == 1 {
                return Err(DomainError::StaleWrite { entity: "loan", id: l.id });
            }
            assert_eq!(l.amount_paid, 10_000);
            Ok(l.clone())
        });

        let service = RepaymentService::new(
            Arc::new(repayments),
            Arc::new(loans),
            Arc::new(MockBorrowerRepository::new()),
        );
        let receipt = service
            .record_payment(&admin, &id, 3_750, PaymentMethod::BankTransfer)
            .await
            .unwrap();
        assert_eq!(receipt.status, RepaymentStatus::Paid);
    }

    #[tokio::test]
    async fn test_stale_installment_write_leaves_loan_untouched() {
        let admin = Session::new(Uuid::new_v4(), Role::Admin, 3600);
        let borrower = borrower_for(Uuid::new_v4());
        let loan = disbursed_loan(&borrower, 10_000);
        let repayment = Repayment::new(&loan, 3_750, date(2023, 3, 15), None).unwrap();
        let id = repayment.id;

        let mut repayments = MockRepaymentRepository::new();
        repayments.expect_find_by_id().returning(move |_| Ok(Some(repayment.clone())));
        repayments
            .expect_update()
            .returning(|r| Err(DomainError::StaleWrite { entity: "repayment", id: r.id }));
        let mut loans = MockLoanRepository::new();
        loans.expect_find_by_id().returning(move |_| Ok(Some(loan.clone())));
        loans.expect_update().never();

        let service = RepaymentService::new(
            Arc::new(repayments),
            Arc::new(loans),
            Arc::new(MockBorrowerRepository::new()),
        );
        assert!(matches!(
            service.record_payment(&admin, &id, 3_750, PaymentMethod::BankTransfer).await,
            Err(DomainError::StaleWrite { .. })
        ));
    }

    #[tokio::test]
    async fn test_add_requires_disbursed_loan() {
        let admin = Session::new(Uuid::new_v4(), Role::Admin, 3600);
        let borrower = borrower_for(Uuid::new_v4());
        let mut loan = disbursed_loan(&borrower, 10_000);
        loan.status = LoanStatus::Approved;
        let loan_id = loan.id;

        let mut loans = MockLoanRepository::new();
        loans.expect_find_by_id().returning(move |_| Ok(Some(loan.clone())));
        let mut repayments = MockRepaymentRepository::new();
        repayments.expect_create().never();

        let service = RepaymentService::new(
            Arc::new(repayments),
            Arc::new(loans),
            Arc::new(MockBorrowerRepository::new()),
        );
        let form = NewRepayment {
            loan_id,
            amount: 1_000,
            due_date: date(2023, 4, 1),
            notes: None,
        };
        assert!(matches!(
            service.add(&admin, form).await,
            Err(DomainError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_verifier_has_no_repayment_access() {
        let service = RepaymentService::new(
            Arc::new(MockRepaymentRepository::new()),
            Arc::new(MockLoanRepository::new()),
            Arc::new(MockBorrowerRepository::new()),
        );
        let verifier = Session::new(Uuid::new_v4(), Role::Verifier, 3600);
        assert!(matches!(
            service.list(&verifier, &RepaymentQuery::default()).await,
            Err(DomainError::Forbidden { .. })
        ));
    }
}
