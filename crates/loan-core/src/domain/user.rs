//! User account domain entity

use chrono::{DateTime, Utc};
use loan_shared::Role;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::search::Searchable;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub id: Uuid,

    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[serde(skip_serializing)]
    pub password_hash: String,

    pub role: Role,

    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
    pub modified_by: Option<Uuid>,
}

impl UserAccount {
    pub fn new(
        name: String,
        email: String,
        password_hash: String,
        role: Role,
    ) -> Result<Self, validator::ValidationErrors> {
        let user = Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            email: email.trim().to_lowercase(),
            password_hash,
            role,
            created_at: Utc::now(),
            modified_at: None,
            modified_by: None,
        };

        user.validate()?;
        Ok(user)
    }

    pub fn change_role(&mut self, role: Role, changed_by: Uuid) {
        self.role = role;
        self.modified_at = Some(Utc::now());
        self.modified_by = Some(changed_by);
    }
}

impl Searchable for UserAccount {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.email.as_str(), self.role.as_str()]
    }
}
