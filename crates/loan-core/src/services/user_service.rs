//! Admin user management

use std::sync::Arc;

use loan_shared::{Paginated, Pagination, Role};
use tracing::info;
use uuid::Uuid;

use super::auth_service::{AuthService, UserInfo};
use super::require_role;
use crate::domain::{filter_by_search, Session};
use crate::error::DomainError;
use crate::repositories::UserRepository;

pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
    auth: Arc<AuthService>,
}

impl UserService {
    pub fn new(user_repo: Arc<dyn UserRepository>, auth: Arc<AuthService>) -> Self {
        Self { user_repo, auth }
    }

    pub async fn list(
        &self,
        session: &Session,
        search: Option<&str>,
        pagination: Pagination,
    ) -> Result<Paginated<UserInfo>, DomainError> {
        require_role(session, &[Role::Admin], "list users")?;
        let users = filter_by_search(self.user_repo.list().await?, search);
        Ok(Paginated::from_vec(users, pagination).map(|u| UserInfo::from(&u)))
    }

    pub async fn create(
        &self,
        session: &Session,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<UserInfo, DomainError> {
        require_role(session, &[Role::Admin], "create users")?;
        let user = self.auth.create_account(name, email, password, role).await?;
        info!("User {} created with role {} by {}", user.id, role, session.actor_id);
        Ok(UserInfo::from(&user))
    }

    pub async fn delete(&self, session: &Session, user_id: &Uuid) -> Result<(), DomainError> {
        require_role(session, &[Role::Admin], "delete users")?;
        if *user_id == session.actor_id {
            return Err(DomainError::ValidationError("You cannot delete your own account".to_string()));
        }
        if !self.user_repo.delete(user_id).await? {
            return Err(DomainError::UserNotFound(*user_id));
        }
        let revoked = self.auth.revoke_sessions(user_id);
        info!("User {} deleted by {} ({} sessions revoked)", user_id, session.actor_id, revoked);
        Ok(())
    }

    /// Change a user's role. Their live sessions end so the next request
    /// carries the new role.
    pub async fn change_role(&self, session: &Session, user_id: &Uuid, role: Role) -> Result<UserInfo, DomainError> {
        require_role(session, &[Role::Admin], "change user roles")?;
        let mut user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::UserNotFound(*user_id))?;

        if user.role != role {
            user.change_role(role, session.actor_id);
            user = self.user_repo.update(&user).await?;
            self.auth.revoke_sessions(user_id);
            info!("User {} role changed to {} by {}", user_id, role, session.actor_id);
        }
        Ok(UserInfo::from(&user))
    }
}
