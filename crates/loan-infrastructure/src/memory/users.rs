//! In-memory user accounts

use async_trait::async_trait;
use loan_core::repositories::UserRepository;
use loan_core::{DomainError, UserAccount};
use parking_lot::Mutex;
use uuid::Uuid;

use super::table::Table;

pub struct InMemoryUserRepository {
    table: Table<UserAccount>,
    /// Serialises the email uniqueness check with the insert
    write_lock: Mutex<()>,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self {
            table: Table::new("user"),
            write_lock: Mutex::new(()),
        }
    }
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<UserAccount>, DomainError> {
        Ok(self.table.get(id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, DomainError> {
        Ok(self.table.find(|u| u.email.eq_ignore_ascii_case(email)))
    }

    async fn list(&self) -> Result<Vec<UserAccount>, DomainError> {
        let mut users = self.table.all();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(users)
    }

    async fn create(&self, user: &UserAccount) -> Result<UserAccount, DomainError> {
        let _guard = self.write_lock.lock();
        if self.table.find(|u| u.email.eq_ignore_ascii_case(&user.email)).is_some() {
            return Err(DomainError::EmailAlreadyExists(user.email.clone()));
        }
        self.table.insert(user)
    }

    async fn update(&self, user: &UserAccount) -> Result<UserAccount, DomainError> {
        self.table.replace(user, DomainError::UserNotFound)
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, DomainError> {
        Ok(self.table.remove(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loan_shared::Role;

    fn account(email: &str) -> UserAccount {
        UserAccount::new("Some One".into(), email.into(), "hash".into(), Role::User).unwrap()
    }

    #[tokio::test]
    async fn test_email_is_unique() {
        let repo = InMemoryUserRepository::new();
        repo.create(&account("a@example.com")).await.unwrap();
        assert!(matches!(
            repo.create(&account("A@example.com")).await,
            Err(DomainError::EmailAlreadyExists(_))
        ));
        assert!(repo.find_by_email("A@EXAMPLE.COM").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let repo = InMemoryUserRepository::new();
        assert!(matches!(
            repo.update(&account("b@example.com")).await,
            Err(DomainError::UserNotFound(_))
        ));
    }
}
