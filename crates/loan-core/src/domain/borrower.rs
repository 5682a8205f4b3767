// ============================================================================
// LoanDesk Core - Borrower Entity
// File: crates/loan-core/src/domain/borrower.rs
// Description: Borrower with account status (admin) and verification (verifier)
// ============================================================================

use chrono::{DateTime, NaiveDate, Utc};
use loan_shared::Role;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::search::Searchable;
use crate::error::DomainError;

/// Account standing managed by admins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Inactive,
    Blacklisted,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Inactive => "inactive",
            AccountStatus::Blacklisted => "blacklisted",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(AccountStatus::Active),
            "inactive" => Some(AccountStatus::Inactive),
            "blacklisted" => Some(AccountStatus::Blacklisted),
            _ => None,
        }
    }
}

impl Default for AccountStatus {
    fn default() -> Self {
        AccountStatus::Active
    }
}

/// Identity verification outcome managed by verifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Pending,
    Verified,
    Rejected,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Pending => "pending",
            VerificationStatus::Verified => "verified",
            VerificationStatus::Rejected => "rejected",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(VerificationStatus::Pending),
            "verified" => Some(VerificationStatus::Verified),
            "rejected" => Some(VerificationStatus::Rejected),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, VerificationStatus::Pending)
    }
}

impl Default for VerificationStatus {
    fn default() -> Self {
        VerificationStatus::Pending
    }
}

/// Borrower entity
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Borrower {
    pub id: Uuid,

    /// Login account owning this borrower profile, if any
    pub user_id: Option<Uuid>,

    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    /// May be blank for profiles created by a first loan application
    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    pub phone: String,

    #[validate(length(max = 500, message = "Address too long"))]
    pub address: Option<String>,

    pub status: AccountStatus,
    pub verification: VerificationStatus,
    pub documents: Vec<String>,
    pub date_applied: NaiveDate,
    pub last_activity: NaiveDate,

    // Audit fields
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
    pub modified_by: Option<Uuid>,
}

impl Borrower {
    pub fn new(
        name: String,
        email: String,
        phone: String,
        address: Option<String>,
        user_id: Option<Uuid>,
        today: NaiveDate,
    ) -> Result<Self, validator::ValidationErrors> {
        let borrower = Self {
            id: Uuid::new_v4(),
            user_id,
            name: name.trim().to_string(),
            email: email.trim().to_lowercase(),
            phone: phone.trim().to_string(),
            address: address.map(|a| a.trim().to_string()).filter(|a| !a.is_empty()),
            status: AccountStatus::Active,
            verification: VerificationStatus::Pending,
            documents: Vec::new(),
            date_applied: today,
            last_activity: today,
            created_at: Utc::now(),
            modified_at: None,
            modified_by: None,
        };

        borrower.validate()?;
        Ok(borrower)
    }

    /// Admin moves the account to any other standing
    pub fn set_status(&mut self, status: AccountStatus, role: Role, actor: Uuid) -> Result<(), DomainError> {
        if role != Role::Admin {
            return Err(DomainError::forbidden(role, "change borrower account status"));
        }
        if self.status == status {
            return Err(DomainError::InvalidTransition {
                entity: "borrower",
                from: self.status.as_str().to_string(),
                to: status.as_str().to_string(),
            });
        }
        self.status = status;
        self.touch(actor);
        Ok(())
    }

    /// Verifier settles a pending verification
    pub fn verify(&mut self, outcome: VerificationStatus, role: Role, actor: Uuid) -> Result<(), DomainError> {
        if role != Role::Verifier {
            return Err(DomainError::forbidden(role, "verify borrowers"));
        }
        if self.verification.is_terminal() {
            return Err(DomainError::TerminalState {
                entity: "borrower verification",
                state: self.verification.as_str().to_string(),
            });
        }
        if outcome == VerificationStatus::Pending {
            return Err(DomainError::InvalidTransition {
                entity: "borrower verification",
                from: self.verification.as_str().to_string(),
                to: outcome.as_str().to_string(),
            });
        }
        self.verification = outcome;
        self.touch(actor);
        Ok(())
    }

    fn touch(&mut self, actor: Uuid) {
        let now = Utc::now();
        self.last_activity = now.date_naive();
        self.modified_at = Some(now);
        self.modified_by = Some(actor);
    }
}

impl Searchable for Borrower {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.email.as_str(), self.phone.as_str()]
    }
}
