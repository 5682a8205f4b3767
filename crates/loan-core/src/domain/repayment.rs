// ============================================================================
// LoanDesk Core - Repayment Entity
// File: crates/loan-core/src/domain/repayment.rs
// Description: Repayment installments, payment recording, schedule generation
// ============================================================================

use chrono::{DateTime, Months, NaiveDate, Utc};
use loan_shared::constants::{MAX_AMOUNT, TRANSACTION_ID_PREFIX};
use loan_shared::Amount;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::loan::Loan;
use super::search::Searchable;
use crate::error::DomainError;

/// Repayment status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepaymentStatus {
    Pending,
    Paid,
    Partial,
    Overdue,
}

impl RepaymentStatus {
    pub const ALL: [RepaymentStatus; 4] = [
        RepaymentStatus::Pending,
        RepaymentStatus::Paid,
        RepaymentStatus::Partial,
        RepaymentStatus::Overdue,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RepaymentStatus::Pending => "pending",
            RepaymentStatus::Paid => "paid",
            RepaymentStatus::Partial => "partial",
            RepaymentStatus::Overdue => "overdue",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(RepaymentStatus::Pending),
            "paid" => Some(RepaymentStatus::Paid),
            "partial" => Some(RepaymentStatus::Partial),
            "overdue" => Some(RepaymentStatus::Overdue),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RepaymentStatus::Paid)
    }

    /// Statuses that carry a paid date and payment method
    pub fn is_settled(&self) -> bool {
        matches!(self, RepaymentStatus::Paid | RepaymentStatus::Partial)
    }
}

impl Default for RepaymentStatus {
    fn default() -> Self {
        RepaymentStatus::Pending
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "Bank Transfer")]
    BankTransfer,
    #[serde(rename = "Mobile Money")]
    MobileMoney,
    #[serde(rename = "Card Payment")]
    CardPayment,
    #[serde(rename = "Cash Deposit")]
    CashDeposit,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::BankTransfer => "Bank Transfer",
            PaymentMethod::MobileMoney => "Mobile Money",
            PaymentMethod::CardPayment => "Card Payment",
            PaymentMethod::CashDeposit => "Cash Deposit",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "bank transfer" => Some(PaymentMethod::BankTransfer),
            "mobile money" => Some(PaymentMethod::MobileMoney),
            "card payment" => Some(PaymentMethod::CardPayment),
            "cash deposit" => Some(PaymentMethod::CashDeposit),
            _ => None,
        }
    }
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::BankTransfer
    }
}

/// Collision-resistant payment reference, e.g. `TRX-9F1C...`
pub fn new_transaction_id() -> String {
    format!("{}-{}", TRANSACTION_ID_PREFIX, Uuid::new_v4().simple()).to_uppercase()
}

/// Outcome of a successful `record_payment`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    pub repayment_id: Uuid,
    pub loan_id: Uuid,
    pub amount: Amount,
    pub status: RepaymentStatus,
    pub transaction_id: String,
    pub paid_date: NaiveDate,
}

/// Repayment installment entity
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Repayment {
    pub id: Uuid,
    pub loan_id: Uuid,
    pub borrower_id: Uuid,
    pub borrower_name: String,

    #[validate(range(min = 1, max = MAX_AMOUNT, message = "Amount must be positive and within the maximum amount"))]
    pub amount: Amount,

    /// Cumulative amount received for this installment
    pub amount_paid: Amount,

    pub due_date: NaiveDate,
    pub paid_date: Option<NaiveDate>,
    pub status: RepaymentStatus,
    pub payment_method: Option<PaymentMethod>,
    pub transaction_id: Option<String>,

    #[validate(length(max = 1000, message = "Notes too long"))]
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,

    /// Bumped by the store on every successful update
    #[serde(default)]
    pub version: u64,
}

impl Repayment {
    pub fn new(
        loan: &Loan,
        amount: Amount,
        due_date: NaiveDate,
        notes: Option<String>,
    ) -> Result<Self, validator::ValidationErrors> {
        let repayment = Self {
            id: Uuid::new_v4(),
            loan_id: loan.id,
            borrower_id: loan.borrower_id,
            borrower_name: loan.borrower_name.clone(),
            amount,
            amount_paid: 0,
            due_date,
            paid_date: None,
            status: RepaymentStatus::Pending,
            payment_method: None,
            transaction_id: None,
            notes: notes.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
            created_at: Utc::now(),
            modified_at: None,
            version: 0,
        };

        repayment.validate()?;
        Ok(repayment)
    }

    pub fn remaining(&self) -> Amount {
        self.amount.saturating_sub(self.amount_paid)
    }

    /// Apply a payment. Once the cumulative paid amount reaches the
    /// installment amount the status is `paid`, otherwise `partial`.
    pub fn record_payment(
        &mut self,
        amount: Amount,
        method: PaymentMethod,
        today: NaiveDate,
    ) -> Result<PaymentReceipt, DomainError> {
        if self.status.is_terminal() {
            return Err(DomainError::TerminalState {
                entity: "repayment",
                state: self.status.as_str().to_string(),
            });
        }
        if amount == 0 || amount > MAX_AMOUNT {
            return Err(DomainError::ValidationError(
                "Please enter a valid payment amount".to_string(),
            ));
        }

        self.amount_paid = self.amount_paid.saturating_add(amount);
        self.status = if self.amount_paid >= self.amount {
            RepaymentStatus::Paid
        } else {
            RepaymentStatus::Partial
        };
        let transaction_id = new_transaction_id();
        self.paid_date = Some(today);
        self.payment_method = Some(method);
        self.transaction_id = Some(transaction_id.clone());
        self.modified_at = Some(Utc::now());

        Ok(PaymentReceipt {
            repayment_id: self.id,
            loan_id: self.loan_id,
            amount,
            status: self.status,
            transaction_id,
            paid_date: today,
        })
    }

    /// Only an untouched installment can become overdue
    pub fn mark_overdue(&mut self) -> Result<(), DomainError> {
        if self.status != RepaymentStatus::Pending {
            if self.status.is_terminal() {
                return Err(DomainError::TerminalState {
                    entity: "repayment",
                    state: self.status.as_str().to_string(),
                });
            }
            return Err(DomainError::InvalidTransition {
                entity: "repayment",
                from: self.status.as_str().to_string(),
                to: RepaymentStatus::Overdue.as_str().to_string(),
            });
        }
        self.status = RepaymentStatus::Overdue;
        self.modified_at = Some(Utc::now());
        Ok(())
    }

    /// `paid_date` and `payment_method` are present exactly when settled
    pub fn is_consistent(&self) -> bool {
        let settled = self.status.is_settled();
        settled == self.paid_date.is_some() && settled == self.payment_method.is_some()
    }
}

impl Searchable for Repayment {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.borrower_name.as_str(), self.status.as_str()];
        if let Some(method) = &self.payment_method {
            fields.push(method.as_str());
        }
        fields
    }
}

/// Equal monthly installments of the loan's total repayable amount, the
/// first due one month after `disbursed_on`. The rounding remainder lands
/// on the last installment.
pub fn build_schedule(loan: &Loan, disbursed_on: NaiveDate) -> Result<Vec<Repayment>, DomainError> {
    let term = loan.term_months.max(1);
    let total = loan.total_repayable();
    let base = total / term as Amount;
    let remainder = total % term as Amount;

    (1..=term)
        .map(|n| {
            let due = disbursed_on
                .checked_add_months(Months::new(n))
                .ok_or_else(|| DomainError::ValidationError("Schedule exceeds the calendar".to_string()))?;
            let amount = if n == term { base + remainder } else { base };
            Ok(Repayment::new(loan, amount, due, None)?)
        })
        .collect()
}
