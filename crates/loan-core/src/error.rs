//! Domain errors

use loan_shared::Role;
use thiserror::Error;
use uuid::Uuid;

/// Broad category used by the HTTP layer to pick a status code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Unauthenticated,
    Forbidden,
    NotFound,
    Conflict,
    Internal,
}

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Not authenticated: {0}")]
    Unauthenticated(String),

    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("Borrower not found: {0}")]
    BorrowerNotFound(Uuid),

    #[error("Loan not found: {0}")]
    LoanNotFound(Uuid),

    #[error("Repayment not found: {0}")]
    RepaymentNotFound(Uuid),

    #[error("Budget item not found: {0}")]
    BudgetItemNotFound(Uuid),

    #[error("{entity} is in terminal state '{state}'")]
    TerminalState { entity: &'static str, state: String },

    #[error("Invalid {entity} transition: {from} -> {to}")]
    InvalidTransition {
        entity: &'static str,
        from: String,
        to: String,
    },

    #[error("{entity} {id} was changed by another request")]
    StaleWrite { entity: &'static str, id: Uuid },

    #[error("Role '{role}' may not {action}")]
    Forbidden { role: Role, action: String },

    #[error("Password too short")]
    PasswordTooShort,

    #[error("Password too long")]
    PasswordTooLong,

    #[error("Password hash error: {0}")]
    PasswordHashError(String),

    #[error("Token generation error: {0}")]
    TokenGenerationError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    pub fn forbidden(role: Role, action: impl Into<String>) -> Self {
        DomainError::Forbidden {
            role,
            action: action.into(),
        }
    }

    /// Home page of the denied role, sent along with a 403
    pub fn home_redirect(&self) -> Option<&'static str> {
        match self {
            DomainError::Forbidden { role, .. } => Some(role.home_path()),
            _ => None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::InvalidCredentials | DomainError::Unauthenticated(_) => ErrorKind::Unauthenticated,
            DomainError::Forbidden { .. } => ErrorKind::Forbidden,
            DomainError::UserNotFound(_)
            | DomainError::BorrowerNotFound(_)
            | DomainError::LoanNotFound(_)
            | DomainError::RepaymentNotFound(_)
            | DomainError::BudgetItemNotFound(_) => ErrorKind::NotFound,
            DomainError::EmailAlreadyExists(_)
            | DomainError::StaleWrite { .. }
            | DomainError::TerminalState { .. }
            | DomainError::InvalidTransition { .. } => ErrorKind::Conflict,
            DomainError::PasswordTooShort
            | DomainError::PasswordTooLong
            | DomainError::ValidationError(_) => ErrorKind::Validation,
            DomainError::PasswordHashError(_)
            | DomainError::TokenGenerationError(_)
            | DomainError::InternalError(_) => ErrorKind::Internal,
        }
    }
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        DomainError::ValidationError(errors.to_string())
    }
}

impl From<loan_security::password::PasswordError> for DomainError {
    fn from(error: loan_security::password::PasswordError) -> Self {
        use loan_security::password::PasswordError;
        match error {
            PasswordError::TooShort => DomainError::PasswordTooShort,
            PasswordError::TooLong => DomainError::PasswordTooLong,
            PasswordError::HashError(e) => DomainError::PasswordHashError(e),
        }
    }
}
