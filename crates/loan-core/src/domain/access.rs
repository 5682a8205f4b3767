// ============================================================================
// LoanDesk Core - Role Guard
// File: crates/loan-core/src/domain/access.rs
// Description: Page access decision based on the session role
// ============================================================================

use loan_security::Session;
use loan_shared::constants::LOGIN_PATH;
use loan_shared::Role;
use serde::Serialize;
use url::form_urlencoded;

/// Outcome of a navigation or request check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum AccessDecision {
    Allow,
    /// No session. `return_to` is the login URL carrying the requested path.
    RedirectToLogin { return_to: String },
    /// Authenticated but the role may not view the page
    RedirectToHome { path: String },
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allow)
    }
}

/// Decide access for `session` to a resource restricted to `allowed` roles.
pub fn authorize(session: Option<&Session>, allowed: &[Role], requested_path: &str) -> AccessDecision {
    match session {
        None => AccessDecision::RedirectToLogin {
            return_to: login_url(requested_path),
        },
        Some(s) if !allowed.contains(&s.role) => AccessDecision::RedirectToHome {
            path: s.role.home_path().to_string(),
        },
        Some(_) => AccessDecision::Allow,
    }
}

/// Login page URL with the requested path as its percent-encoded `redirect` parameter
pub fn login_url(requested_path: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("redirect", requested_path)
        .finish();
    format!("{}?{}", LOGIN_PATH, query)
}

/// Known pages and who may view them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    AdminDashboard,
    AdminBorrowers,
    AdminLoans,
    AdminRepayments,
    AdminManageUsers,
    VerifierDashboard,
    VerifierBorrowers,
    VerifierLoans,
    UserDashboard,
    Payments,
    Budget,
    ApplyLoan,
}

impl Page {
    pub fn path(&self) -> &'static str {
        match self {
            Page::AdminDashboard => "/admin/dashboard",
            Page::AdminBorrowers => "/admin/borrowers",
            Page::AdminLoans => "/admin/loans",
            Page::AdminRepayments => "/admin/repayments",
            Page::AdminManageUsers => "/admin/manage-users",
            Page::VerifierDashboard => "/verifier/dashboard",
            Page::VerifierBorrowers => "/verifier/borrowers",
            Page::VerifierLoans => "/verifier/loans",
            Page::UserDashboard => "/dashboard",
            Page::Payments => "/payments",
            Page::Budget => "/budget",
            Page::ApplyLoan => "/apply-loan",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        match normalize(path) {
            "/admin/dashboard" => Some(Page::AdminDashboard),
            "/admin/borrowers" => Some(Page::AdminBorrowers),
            "/admin/loans" => Some(Page::AdminLoans),
            "/admin/repayments" => Some(Page::AdminRepayments),
            "/admin/manage-users" => Some(Page::AdminManageUsers),
            "/verifier/dashboard" => Some(Page::VerifierDashboard),
            "/verifier/borrowers" => Some(Page::VerifierBorrowers),
            "/verifier/loans" => Some(Page::VerifierLoans),
            "/dashboard" => Some(Page::UserDashboard),
            "/payments" => Some(Page::Payments),
            "/budget" => Some(Page::Budget),
            "/apply-loan" => Some(Page::ApplyLoan),
            _ => None,
        }
    }

    pub fn allowed_roles(&self) -> &'static [Role] {
        match self {
            Page::AdminDashboard
            | Page::AdminBorrowers
            | Page::AdminLoans
            | Page::AdminRepayments
            | Page::AdminManageUsers => &[Role::Admin],
            Page::VerifierDashboard | Page::VerifierBorrowers | Page::VerifierLoans => &[Role::Verifier],
            Page::UserDashboard | Page::Payments | Page::Budget | Page::ApplyLoan => &[Role::User],
        }
    }
}

fn normalize(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    if path.len() > 1 {
        path.trim_end_matches('/')
    } else {
        path
    }
}

/// Roles allowed on `path`. Unlisted pages under `/admin` or `/verifier`
/// keep their section's role; anything else only requires a session.
pub fn allowed_roles_for(path: &str) -> &'static [Role] {
    if let Some(page) = Page::from_path(path) {
        return page.allowed_roles();
    }
    let path = normalize(path);
    let in_section = |section: &str| {
        path.strip_prefix(section)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    };
    if in_section("/admin") {
        &[Role::Admin]
    } else if in_section("/verifier") {
        &[Role::Verifier]
    } else {
        &Role::ALL
    }
}

/// Guard for a navigation target
pub fn authorize_path(session: Option<&Session>, path: &str) -> AccessDecision {
    authorize(session, allowed_roles_for(path), path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn session(role: Role) -> Session {
        Session::new(Uuid::new_v4(), role, 60)
    }

    #[test]
    fn test_absent_session_redirects_to_login_with_path() {
        let decision = authorize(None, &[Role::Admin], "/admin/loans");
        assert_eq!(
            decision,
            AccessDecision::RedirectToLogin { return_to: "/login?redirect=%2Fadmin%2Floans".to_string() }
        );
    }

    #[test]
    fn test_login_url_encodes_query_of_requested_path() {
        assert_eq!(login_url("/budget?tab=income"), "/login?redirect=%2Fbudget%3Ftab%3Dincome");
        assert_eq!(login_url("/a&b=c d"), "/login?redirect=%2Fa%26b%3Dc+d");
    }

    #[test]
    fn test_unlisted_section_pages_keep_their_role() {
        let user = session(Role::User);
        assert_eq!(
            authorize_path(Some(&user), "/admin/settings"),
            AccessDecision::RedirectToHome { path: "/dashboard".to_string() }
        );
        assert!(!authorize_path(Some(&user), "/verifier/reports/2023").is_allowed());
        assert!(!authorize_path(Some(&user), "/admin").is_allowed());

        let verifier = session(Role::Verifier);
        assert!(authorize_path(Some(&verifier), "/verifier/reports?page=2").is_allowed());
        assert!(!authorize_path(Some(&verifier), "/admin/settings/").is_allowed());

        let admin = session(Role::Admin);
        assert!(authorize_path(Some(&admin), "/admin/settings").is_allowed());
        assert_eq!(allowed_roles_for("/administrators"), &Role::ALL);
    }

    #[test]
    fn test_wrong_role_redirects_home() {
        let verifier = session(Role::Verifier);
        assert_eq!(
            authorize(Some(&verifier), &[Role::Admin], "/admin/loans"),
            AccessDecision::RedirectToHome { path: "/verifier/dashboard".to_string() }
        );

        let user = session(Role::User);
        assert_eq!(
            authorize_path(Some(&user), "/admin/dashboard"),
            AccessDecision::RedirectToHome { path: "/dashboard".to_string() }
        );
    }

    #[test]
    fn test_allowed_role() {
        let admin = session(Role::Admin);
        assert!(authorize(Some(&admin), &[Role::Admin, Role::Verifier], "/x").is_allowed());
        assert!(authorize_path(Some(&admin), "/admin/repayments/").is_allowed());
    }

    #[test]
    fn test_page_table() {
        assert_eq!(Page::from_path("/budget?tab=income"), Some(Page::Budget));
        assert_eq!(Page::from_path("/nowhere"), None);
        for page in [Page::AdminLoans, Page::VerifierLoans, Page::ApplyLoan] {
            assert_eq!(Page::from_path(page.path()), Some(page));
        }
        let user = session(Role::User);
        assert!(authorize_path(Some(&user), "/profile").is_allowed());
        assert!(!authorize_path(None, "/profile").is_allowed());
    }
}
