// ============================================================================
// LoanDesk Core - Aggregate Statistics
// File: crates/loan-core/src/stats.rs
// Description: Counts, sums and zero-guarded percentages over entity lists
// ============================================================================
//! Pure aggregation over slices. Nothing here touches a repository, so every
//! figure is re-derived from whatever collection the caller currently holds.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use loan_shared::Amount;
use serde::Serialize;

use crate::domain::{
    AccountStatus, BudgetItem, BudgetType, Borrower, Loan, LoanStatus, Repayment, RepaymentStatus,
    VerificationStatus,
};

/// `part` as a percentage of `total`, rounded to one decimal.
/// A zero total yields `0.0`.
pub fn percent_of(part: Amount, total: Amount) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 * 1000.0 / total as f64).round() / 10.0
}

/// Saturating total, so oversized collections clamp instead of overflowing
pub fn total(values: impl IntoIterator<Item = Amount>) -> Amount {
    values.into_iter().fold(0, Amount::saturating_add)
}

pub fn count_by<T, K: Ord>(items: &[T], key: impl Fn(&T) -> K) -> BTreeMap<K, usize> {
    let mut counts = BTreeMap::new();
    for item in items {
        *counts.entry(key(item)).or_insert(0) += 1;
    }
    counts
}

pub fn sum_by<T, K: Ord>(items: &[T], key: impl Fn(&T) -> K, value: impl Fn(&T) -> Amount) -> BTreeMap<K, Amount> {
    let mut sums = BTreeMap::new();
    for item in items {
        let sum = sums.entry(key(item)).or_insert(0);
        *sum = Amount::saturating_add(*sum, value(item));
    }
    sums
}

fn sum_where<T>(items: &[T], keep: impl Fn(&T) -> bool, value: impl Fn(&T) -> Amount) -> Amount {
    total(items.iter().filter(|i| keep(i)).map(value))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanPortfolioStats {
    pub total_loans: usize,
    pub total_amount: Amount,
    pub total_disbursed: Amount,
    pub total_repaid: Amount,
    pub disbursed_percent: f64,
    pub repaid_percent: f64,
}

impl LoanPortfolioStats {
    pub fn from_loans(loans: &[Loan]) -> Self {
        let total_amount = total(loans.iter().map(|l| l.amount));
        let total_disbursed = sum_where(loans, |l| l.status.is_disbursed(), |l| l.amount);
        let total_repaid = total(loans.iter().map(|l| l.amount_paid));

        Self {
            total_loans: loans.len(),
            total_amount,
            total_disbursed,
            total_repaid,
            disbursed_percent: percent_of(total_disbursed, total_amount),
            repaid_percent: percent_of(total_repaid, total_disbursed),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepaymentStats {
    pub total_repayments: usize,
    pub total_amount: Amount,
    pub total_paid: Amount,
    pub total_pending: Amount,
    pub total_overdue: Amount,
    pub paid_percent: f64,
    pub overdue_percent: f64,
}

impl RepaymentStats {
    pub fn from_repayments(repayments: &[Repayment]) -> Self {
        let total_amount = total(repayments.iter().map(|r| r.amount));
        let by_status = sum_by(repayments, |r| r.status, |r| r.amount);
        let of_status = |status: RepaymentStatus| by_status.get(&status).copied().unwrap_or(0);
        let total_paid = of_status(RepaymentStatus::Paid);
        let total_overdue = of_status(RepaymentStatus::Overdue);

        Self {
            total_repayments: repayments.len(),
            total_amount,
            total_paid,
            total_pending: of_status(RepaymentStatus::Pending),
            total_overdue,
            paid_percent: percent_of(total_paid, total_amount),
            overdue_percent: percent_of(total_overdue, total_amount),
        }
    }
}

/// A borrower's view of their own installments
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStats {
    /// Pending and overdue installments
    pub total_due: Amount,
    pub total_paid: Amount,
    pub overdue_count: usize,
}

impl PaymentStats {
    pub fn from_repayments(payments: &[Repayment]) -> Self {
        Self {
            total_due: sum_where(
                payments,
                |p| matches!(p.status, RepaymentStatus::Pending | RepaymentStatus::Overdue),
                |p| p.amount,
            ),
            total_paid: sum_where(payments, |p| p.status == RepaymentStatus::Paid, |p| p.amount),
            overdue_count: payments.iter().filter(|p| p.status == RepaymentStatus::Overdue).count(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationStats {
    pub total: usize,
    pub pending: usize,
    pub verified: usize,
    pub rejected: usize,
    pub pending_percent: f64,
    pub verified_percent: f64,
    pub rejected_percent: f64,
}

impl VerificationStats {
    pub fn from_borrowers(borrowers: &[Borrower]) -> Self {
        let counts = count_by(borrowers, |b| b.verification);
        let count = |status: VerificationStatus| counts.get(&status).copied().unwrap_or(0);
        let total = borrowers.len();
        let pct = |n: usize| percent_of(n as Amount, total as Amount);
        let (pending, verified, rejected) = (
            count(VerificationStatus::Pending),
            count(VerificationStatus::Verified),
            count(VerificationStatus::Rejected),
        );

        Self {
            total,
            pending,
            verified,
            rejected,
            pending_percent: pct(pending),
            verified_percent: pct(verified),
            rejected_percent: pct(rejected),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowerAccountStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub blacklisted: usize,
    pub active_percent: f64,
    pub inactive_percent: f64,
    pub blacklisted_percent: f64,
}

impl BorrowerAccountStats {
    pub fn from_borrowers(borrowers: &[Borrower]) -> Self {
        let counts = count_by(borrowers, |b| b.status);
        let count = |status: AccountStatus| counts.get(&status).copied().unwrap_or(0);
        let total = borrowers.len();
        let pct = |n: usize| percent_of(n as Amount, total as Amount);
        let (active, inactive, blacklisted) = (
            count(AccountStatus::Active),
            count(AccountStatus::Inactive),
            count(AccountStatus::Blacklisted),
        );

        Self {
            total,
            active,
            inactive,
            blacklisted,
            active_percent: pct(active),
            inactive_percent: pct(inactive),
            blacklisted_percent: pct(blacklisted),
        }
    }
}

/// One slice of a category breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub name: String,
    pub value: Amount,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSummary {
    pub total_income: Amount,
    pub total_expenses: Amount,
    /// Income minus expenses; negative when overspent
    pub balance: i64,
    pub income_by_category: Vec<CategoryTotal>,
    pub expenses_by_category: Vec<CategoryTotal>,
}

impl BudgetSummary {
    pub fn from_items(items: &[BudgetItem]) -> Self {
        let total_income = sum_where(items, |i| i.item_type == BudgetType::Income, |i| i.amount);
        let total_expenses = sum_where(items, |i| i.item_type == BudgetType::Expense, |i| i.amount);

        Self {
            total_income,
            total_expenses,
            balance: signed_difference(total_income, total_expenses),
            income_by_category: by_category(items, BudgetType::Income),
            expenses_by_category: by_category(items, BudgetType::Expense),
        }
    }
}

fn signed_difference(a: Amount, b: Amount) -> i64 {
    let difference = i128::from(a) - i128::from(b);
    i64::try_from(difference).unwrap_or(if difference < 0 { i64::MIN } else { i64::MAX })
}

/// Category sums in the fixed category order, zero categories omitted
pub fn by_category(items: &[BudgetItem], item_type: BudgetType) -> Vec<CategoryTotal> {
    item_type
        .categories()
        .iter()
        .map(|category| CategoryTotal {
            name: category.to_string(),
            value: sum_where(items, |i| i.item_type == item_type && i.category == *category, |i| i.amount),
        })
        .filter(|c| c.value > 0)
        .collect()
}

/// Share of the money owed that has come back
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryRates {
    /// Over open, fully paid and defaulted loans
    pub overall: f64,
    /// Over loans still being repaid
    pub open_loans: f64,
}

impl RecoveryRates {
    pub fn from_loans(loans: &[Loan]) -> Self {
        let rate = |keep: &dyn Fn(&Loan) -> bool| {
            percent_of(
                sum_where(loans, |l| keep(l), |l| l.amount_paid),
                sum_where(loans, |l| keep(l), |l| l.amount),
            )
        };

        Self {
            overall: rate(&|l: &Loan| l.status.is_disbursed()),
            open_loans: rate(&|l: &Loan| matches!(l.status, LoanStatus::Disbursed | LoanStatus::Repaying)),
        }
    }
}

/// One point of a monthly chart; `name` is the month number
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    pub name: String,
    pub value: u64,
}

/// Twelve points, one per calendar month of `year`
pub fn monthly_series<T>(items: &[T], year: i32, date: impl Fn(&T) -> Option<NaiveDate>, value: impl Fn(&T) -> u64) -> Vec<ChartPoint> {
    let mut buckets = [0u64; 12];
    for item in items {
        if let Some(d) = date(item).filter(|d| d.year() == year) {
            let bucket = &mut buckets[d.month0() as usize];
            *bucket = bucket.saturating_add(value(item));
        }
    }
    buckets
        .iter()
        .enumerate()
        .map(|(i, v)| ChartPoint {
            name: (i + 1).to_string(),
            value: *v,
        })
        .collect()
}
