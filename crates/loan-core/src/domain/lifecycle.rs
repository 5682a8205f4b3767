// ============================================================================
// LoanDesk Core - Loan Lifecycle
// File: crates/loan-core/src/domain/lifecycle.rs
// Description: Transition graph and role permission table for loans
// ============================================================================
//! Every legal loan edge is listed once with the roles allowed to take it.
//! Anything not in the table is unreachable.

use loan_shared::Role;

use super::loan::LoanStatus;
use crate::error::DomainError;

/// One legal edge of the loan lifecycle graph
#[derive(Debug, Clone, Copy)]
pub struct Edge {
    pub from: LoanStatus,
    pub to: LoanStatus,
    pub roles: &'static [Role],
}

const VERIFIER: &[Role] = &[Role::Verifier];
const ADMIN: &[Role] = &[Role::Admin];
const VERIFIER_OR_ADMIN: &[Role] = &[Role::Verifier, Role::Admin];

pub const LOAN_EDGES: &[Edge] = &[
    Edge { from: LoanStatus::Pending, to: LoanStatus::Verified, roles: VERIFIER },
    Edge { from: LoanStatus::Pending, to: LoanStatus::Rejected, roles: VERIFIER_OR_ADMIN },
    Edge { from: LoanStatus::Verified, to: LoanStatus::Approved, roles: ADMIN },
    Edge { from: LoanStatus::Verified, to: LoanStatus::Rejected, roles: ADMIN },
    Edge { from: LoanStatus::Approved, to: LoanStatus::Disbursed, roles: ADMIN },
    Edge { from: LoanStatus::Approved, to: LoanStatus::Rejected, roles: ADMIN },
    Edge { from: LoanStatus::Disbursed, to: LoanStatus::Repaying, roles: ADMIN },
    Edge { from: LoanStatus::Disbursed, to: LoanStatus::Defaulted, roles: ADMIN },
    Edge { from: LoanStatus::Repaying, to: LoanStatus::Completed, roles: ADMIN },
    Edge { from: LoanStatus::Repaying, to: LoanStatus::Defaulted, roles: ADMIN },
];

/// Result of looking a (from, to, role) triple up in the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Allowed,
    /// Edge exists but the role may not take it
    Denied,
    /// No such edge
    Unreachable,
}

pub fn permission(from: LoanStatus, to: LoanStatus, role: Role) -> Permission {
    match LOAN_EDGES.iter().find(|e| e.from == from && e.to == to) {
        None => Permission::Unreachable,
        Some(edge) if edge.roles.contains(&role) => Permission::Allowed,
        Some(_) => Permission::Denied,
    }
}

/// Targets reachable from `from` by `role`
pub fn available_transitions(from: LoanStatus, role: Role) -> Vec<LoanStatus> {
    LOAN_EDGES
        .iter()
        .filter(|e| e.from == from && e.roles.contains(&role))
        .map(|e| e.to)
        .collect()
}

/// Validate a transition without applying it
pub fn check_transition(from: LoanStatus, to: LoanStatus, role: Role) -> Result<(), DomainError> {
    if from.is_terminal() {
        return Err(DomainError::TerminalState {
            entity: "loan",
            state: from.as_str().to_string(),
        });
    }
    match permission(from, to, role) {
        Permission::Allowed => Ok(()),
        Permission::Denied => Err(DomainError::forbidden(
            role,
            format!("move a loan from {} to {}", from.as_str(), to.as_str()),
        )),
        Permission::Unreachable => Err(DomainError::InvalidTransition {
            entity: "loan",
            from: from.as_str().to_string(),
            to: to.as_str().to_string(),
        }),
    }
}
