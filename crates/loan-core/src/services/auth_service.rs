// ============================================================================
// LoanDesk Core - Authentication Service
// File: crates/loan-core/src/services/auth_service.rs
// ============================================================================
//! Login, registration, logout, and bearer-token authentication

use std::sync::Arc;

use loan_security::{JwtService, PasswordService, SessionStore};
use loan_shared::Role;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::{Session, UserAccount};
use crate::error::DomainError;
use crate::repositories::UserRepository;

/// Authentication service owning the session lifecycle
pub struct AuthService {
    user_repo: Arc<dyn UserRepository>,
    sessions: Arc<SessionStore>,
    jwt: Arc<JwtService>,
}

impl AuthService {
    pub fn new(user_repo: Arc<dyn UserRepository>, sessions: Arc<SessionStore>, jwt: Arc<JwtService>) -> Self {
        Self { user_repo, sessions, jwt }
    }

    /// Login with email and password
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResult, DomainError> {
        info!("Login attempt for email: {}", loan_shared::utils::mask_email(email));

        let user = self
            .user_repo
            .find_by_email(&email.trim().to_lowercase())
            .await?
            .ok_or_else(|| {
                warn!("Login failed: email not found");
                DomainError::InvalidCredentials
            })?;

        let password_valid =
            PasswordService::verify(password, &user.password_hash).map_err(|_| DomainError::InvalidCredentials)?;
        if !password_valid {
            warn!("Login failed: invalid password for user {}", user.id);
            return Err(DomainError::InvalidCredentials);
        }

        let session = self.sessions.begin(user.id, user.role, self.jwt.access_token_expiry());
        let token = self.jwt.generate_access_token(&session).map_err(|e| {
            self.sessions.end(&session.id);
            DomainError::TokenGenerationError(e.to_string())
        })?;

        info!("Login successful for user {} ({})", user.id, user.role);

        Ok(LoginResult {
            token,
            expires_in: self.jwt.access_token_expiry(),
            redirect: user.role.home_path().to_string(),
            user: UserInfo::from(&user),
        })
    }

    /// Register a new borrower-side (`user` role) account
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<UserInfo, DomainError> {
        info!("Registration attempt for email: {}", loan_shared::utils::mask_email(email));
        let user = self.create_account(name, email, password, Role::User).await?;
        info!("Registration successful for user {}", user.id);
        Ok(UserInfo::from(&user))
    }

    /// Shared by registration and admin account creation
    pub(crate) async fn create_account(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<UserAccount, DomainError> {
        let email = email.trim().to_lowercase();
        if self.user_repo.find_by_email(&email).await?.is_some() {
            warn!("Account creation failed: email already exists");
            return Err(DomainError::EmailAlreadyExists(email));
        }

        PasswordService::check_policy(password)?;
        let password_hash = PasswordService::hash(password)?;
        let user = UserAccount::new(name.to_string(), email, password_hash, role)?;

        self.user_repo.create(&user).await
    }

    /// Resolve a bearer token to its live session
    pub fn authenticate(&self, token: &str) -> Result<Session, DomainError> {
        let claims = self
            .jwt
            .validate_token(token)
            .map_err(|e| DomainError::Unauthenticated(e.to_string()))?;
        let session_id = claims
            .session_id()
            .map_err(|e| DomainError::Unauthenticated(e.to_string()))?;

        let session = self
            .sessions
            .get(&session_id)
            .ok_or_else(|| DomainError::Unauthenticated("Session has ended".to_string()))?;

        if session.actor_id.to_string() != claims.sub || session.role != claims.role {
            warn!("Token claims do not match session {}", session_id);
            return Err(DomainError::Unauthenticated("Token does not match session".to_string()));
        }
        Ok(session)
    }

    pub fn logout(&self, session: &Session) -> bool {
        let ended = self.sessions.end(&session.id);
        debug!("Logout for actor {} (session ended: {})", session.actor_id, ended);
        ended
    }

    pub async fn profile(&self, session: &Session) -> Result<UserInfo, DomainError> {
        let user = self
            .user_repo
            .find_by_id(&session.actor_id)
            .await?
            .ok_or(DomainError::UserNotFound(session.actor_id))?;
        Ok(UserInfo::from(&user))
    }

    /// Drop every session of an account whose role or existence changed
    pub(crate) fn revoke_sessions(&self, user_id: &Uuid) -> usize {
        self.sessions.end_all_for(user_id)
    }
}

/// Result of successful login
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
    pub token: String,
    pub expires_in: i64,
    /// Home page of the user's role
    pub redirect: String,
    pub user: UserInfo,
}

/// User info returned in auth responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: String,
}

impl From<&UserAccount> for UserInfo {
    fn from(user: &UserAccount) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            created_at: user.created_at.date_naive().to_string(),
        }
    }
}
