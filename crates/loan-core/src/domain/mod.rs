//! # LoanDesk Core - Domain Module
//!
//! Domain entities and their state machines.

pub mod access;
pub mod user;
pub mod borrower;
pub mod loan;
pub mod lifecycle;
pub mod repayment;
pub mod budget;
pub mod search;

// Re-export all entities and enums
pub use access::{authorize, AccessDecision, Page};
pub use user::UserAccount;
pub use borrower::{AccountStatus, Borrower, VerificationStatus};
pub use loan::{EmploymentDetails, Loan, LoanStatus};
pub use repayment::{PaymentMethod, PaymentReceipt, Repayment, RepaymentStatus};
pub use budget::{BudgetItem, BudgetType};
pub use search::{filter_by_search, Searchable};

pub use loan_shared::Role;
pub use loan_security::Session;
