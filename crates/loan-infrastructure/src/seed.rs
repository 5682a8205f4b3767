// ============================================================================
// LoanDesk Infrastructure - Demo Data
// File: crates/loan-infrastructure/src/seed.rs
// ============================================================================
//! Demo accounts and a small portfolio so every dashboard has data.
//! Seeding is skipped when any user account already exists.

use chrono::NaiveDate;
use loan_core::domain::repayment::new_transaction_id;
use loan_core::{
    AccountStatus, Borrower, BudgetItem, BudgetType, DomainError, Loan, LoanStatus, PaymentMethod, Repayment,
    RepaymentStatus, UserAccount, VerificationStatus,
};
use loan_security::PasswordService;
use loan_shared::{Amount, Role};
use tracing::info;

use crate::error::SeedError;
use crate::memory::Repositories;

/// What `seed_demo_data` inserted
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub borrowers: usize,
    pub loans: usize,
    pub repayments: usize,
    pub budget_items: usize,
}

const USERS: &[(&str, &str, Role)] = &[
    ("Admin User", "admin@example.com", Role::Admin),
    ("Verifier User", "verifier@example.com", Role::Verifier),
    ("Regular User", "user@example.com", Role::User),
];

// name, email, phone, status, verification, last activity
const BORROWERS: &[(&str, &str, &str, AccountStatus, VerificationStatus, &str)] = &[
    ("John Smith", "john@example.com", "+1234567890", AccountStatus::Active, VerificationStatus::Verified, "2023-05-15"),
    ("Sarah Johnson", "sarah@example.com", "+1987654321", AccountStatus::Active, VerificationStatus::Verified, "2023-06-20"),
    ("Michael Brown", "michael@example.com", "+1122334455", AccountStatus::Inactive, VerificationStatus::Pending, "2023-04-10"),
    ("Emily Davis", "emily@example.com", "+1555666777", AccountStatus::Blacklisted, VerificationStatus::Rejected, "2023-03-05"),
    ("David Wilson", "david@example.com", "+1777888999", AccountStatus::Active, VerificationStatus::Pending, "2023-07-01"),
];

// borrower index, amount, rate, term, start, status, purpose, paid
const LOANS: &[(usize, Amount, f64, u32, &str, LoanStatus, &str, Amount)] = &[
    (0, 50_000, 15.0, 12, "2023-01-15", LoanStatus::Disbursed, "Business expansion", 15_000),
    (1, 75_000, 12.0, 24, "2023-02-20", LoanStatus::Repaying, "Education", 10_000),
    (4, 100_000, 10.0, 36, "2023-03-10", LoanStatus::Approved, "Home renovation", 0),
    (0, 25_000, 18.0, 6, "2022-11-05", LoanStatus::Completed, "Medical expenses", 25_000),
    (2, 150_000, 8.0, 48, "2023-04-15", LoanStatus::Verified, "Debt consolidation", 0),
    (3, 200_000, 9.0, 60, "2022-12-01", LoanStatus::Defaulted, "Business startup", 20_000),
    (1, 30_000, 20.0, 3, "2023-05-10", LoanStatus::Pending, "Emergency funds", 0),
];

// loan index, amount, due, paid on, status, method, paid amount, notes
type RepaymentRow = (
    usize,
    Amount,
    &'static str,
    Option<&'static str>,
    RepaymentStatus,
    Option<PaymentMethod>,
    Amount,
    Option<&'static str>,
);

const REPAYMENTS: &[RepaymentRow] = &[
    (0, 5_000, "2023-02-15", Some("2023-02-14"), RepaymentStatus::Paid, Some(PaymentMethod::BankTransfer), 5_000, None),
    (0, 5_000, "2023-03-15", Some("2023-03-16"), RepaymentStatus::Paid, Some(PaymentMethod::MobileMoney), 5_000, Some("Paid one day late")),
    (0, 5_000, "2023-04-15", Some("2023-04-10"), RepaymentStatus::Paid, Some(PaymentMethod::BankTransfer), 5_000, None),
    (1, 3_750, "2023-03-20", Some("2023-03-19"), RepaymentStatus::Paid, Some(PaymentMethod::MobileMoney), 3_750, None),
    (1, 3_750, "2023-04-20", Some("2023-04-20"), RepaymentStatus::Paid, Some(PaymentMethod::BankTransfer), 3_750, None),
    (1, 3_750, "2023-05-20", None, RepaymentStatus::Pending, None, 0, None),
    (5, 4_000, "2023-01-01", None, RepaymentStatus::Overdue, None, 0, Some("Borrower not responding to calls")),
    (5, 4_000, "2023-02-01", Some("2023-02-15"), RepaymentStatus::Paid, Some(PaymentMethod::BankTransfer), 4_000, Some("Paid late with penalty")),
    (5, 4_000, "2023-03-01", Some("2023-03-01"), RepaymentStatus::Partial, Some(PaymentMethod::MobileMoney), 2_000, Some("Paid only half the amount")),
];

const BUDGET: &[(&str, Amount, BudgetType, &str, &str)] = &[
    ("Salary", 50_000, BudgetType::Income, "2023-07-01", "Monthly salary"),
    ("Rent", 15_000, BudgetType::Expense, "2023-07-05", "Monthly rent"),
    ("Groceries", 5_000, BudgetType::Expense, "2023-07-10", "Weekly groceries"),
    ("Utilities", 3_000, BudgetType::Expense, "2023-07-15", "Electricity and water"),
    ("Transportation", 2_000, BudgetType::Expense, "2023-07-20", "Fuel and public transport"),
    ("Freelance", 10_000, BudgetType::Income, "2023-07-25", "Side project payment"),
];

fn date(s: &str) -> Result<NaiveDate, SeedError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| SeedError::InvalidDate(format!("{}: {}", s, e)))
}

fn invalid<E: Into<DomainError>>(record: &'static str) -> impl FnOnce(E) -> SeedError {
    move |e| SeedError::InvalidRecord {
        record,
        source: e.into(),
    }
}

/// Insert the demo data set. Every account gets `password`.
/// The `user` account owns the first borrower profile.
pub async fn seed_demo_data(repos: &Repositories, password: &str) -> Result<SeedSummary, SeedError> {
    if !repos.users.list().await.map_err(invalid("users"))?.is_empty() {
        info!("Accounts already present, skipping demo data");
        return Ok(SeedSummary::default());
    }

    let mut summary = SeedSummary::default();
    let password_hash = PasswordService::hash(password).map_err(invalid("users"))?;

    let mut regular_user = None;
    for (name, email, role) in USERS {
        let user = UserAccount::new(name.to_string(), email.to_string(), password_hash.clone(), *role)
            .map_err(invalid("users"))?;
        let user = repos.users.create(&user).await.map_err(invalid("users"))?;
        if *role == Role::User {
            regular_user = Some(user.id);
        }
        summary.users += 1;
    }

    let mut borrowers = Vec::with_capacity(BORROWERS.len());
    for (i, (name, email, phone, status, verification, last_activity)) in BORROWERS.iter().enumerate() {
        let owner = if i == 0 { regular_user } else { None };
        let mut borrower = Borrower::new(
            name.to_string(),
            email.to_string(),
            phone.to_string(),
            None,
            owner,
            date(last_activity)?,
        )
        .map_err(invalid("borrowers"))?;
        borrower.status = *status;
        borrower.verification = *verification;
        borrowers.push(repos.borrowers.create(&borrower).await.map_err(invalid("borrowers"))?);
        summary.borrowers += 1;
    }

    let mut loans = Vec::with_capacity(LOANS.len());
    for (borrower_idx, amount, rate, term, start, status, purpose, paid) in LOANS {
        let borrower = &borrowers[*borrower_idx];
        let mut loan = Loan::new(
            borrower.id,
            borrower.name.clone(),
            *amount,
            *rate,
            *term,
            purpose.to_string(),
            date(start)?,
            None,
        )
        .map_err(invalid("loans"))?;
        loan.status = *status;
        loan.amount_paid = (*paid).min(*amount);
        loans.push(repos.loans.create(&loan).await.map_err(invalid("loans"))?);
        summary.loans += 1;
    }

    for (loan_idx, amount, due, paid_on, status, method, paid, notes) in REPAYMENTS {
        let mut repayment = Repayment::new(&loans[*loan_idx], *amount, date(due)?, notes.map(str::to_string))
            .map_err(invalid("repayments"))?;
        repayment.status = *status;
        repayment.amount_paid = *paid;
        repayment.payment_method = *method;
        repayment.paid_date = paid_on.map(date).transpose()?;
        if status.is_settled() {
            repayment.transaction_id = Some(new_transaction_id());
        }
        repos.repayments.create(&repayment).await.map_err(invalid("repayments"))?;
        summary.repayments += 1;
    }

    if let Some(owner) = regular_user {
        for (category, amount, item_type, on, description) in BUDGET {
            let item = BudgetItem::new(
                owner,
                category.to_string(),
                *amount,
                *item_type,
                date(on)?,
                description.to_string(),
            )
            .map_err(invalid("budget"))?;
            repos.budget.create(&item).await.map_err(invalid("budget"))?;
            summary.budget_items += 1;
        }
    }

    info!(
        "Seeded demo data: {} users, {} borrowers, {} loans, {} repayments, {} budget items",
        summary.users, summary.borrowers, summary.loans, summary.repayments, summary.budget_items
    );
    Ok(summary)
}
