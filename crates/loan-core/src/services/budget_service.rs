//! Personal budget tracker for borrowers

use std::sync::Arc;

use chrono::NaiveDate;
use loan_shared::utils::today;
use loan_shared::{Amount, Paginated, Pagination, Role};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::require_role;
use crate::domain::{filter_by_search, BudgetItem, BudgetType, Session};
use crate::error::DomainError;
use crate::repositories::BudgetRepository;
use crate::stats::BudgetSummary;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBudgetItem {
    pub category: String,
    pub amount: Amount,
    #[serde(rename = "type")]
    pub item_type: BudgetType,
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub description: String,
}

pub struct BudgetService {
    budget_repo: Arc<dyn BudgetRepository>,
}

impl BudgetService {
    pub fn new(budget_repo: Arc<dyn BudgetRepository>) -> Self {
        Self { budget_repo }
    }

    pub async fn list(
        &self,
        session: &Session,
        search: Option<&str>,
        pagination: Pagination,
    ) -> Result<Paginated<BudgetItem>, DomainError> {
        require_role(session, &[Role::User], "keep a budget")?;
        let items = self.budget_repo.list_by_owner(&session.actor_id).await?;
        Ok(Paginated::from_vec(filter_by_search(items, search), pagination))
    }

    pub async fn add(&self, session: &Session, form: NewBudgetItem) -> Result<BudgetItem, DomainError> {
        require_role(session, &[Role::User], "keep a budget")?;
        let item = BudgetItem::new(
            session.actor_id,
            form.category,
            form.amount,
            form.item_type,
            form.date.unwrap_or_else(today),
            form.description,
        )?;
        let created = self.budget_repo.create(&item).await?;
        info!("Budget {} item {} added by {}", created.item_type.as_str(), created.id, session.actor_id);
        Ok(created)
    }

    pub async fn delete(&self, session: &Session, id: &Uuid) -> Result<(), DomainError> {
        require_role(session, &[Role::User], "keep a budget")?;
        let owned = self
            .budget_repo
            .find_by_id(id)
            .await?
            .is_some_and(|item| item.owner_id == session.actor_id);
        if !owned || !self.budget_repo.delete(id).await? {
            return Err(DomainError::BudgetItemNotFound(*id));
        }
        info!("Budget item {} deleted by {}", id, session.actor_id);
        Ok(())
    }

    /// Totals and category breakdowns over every item the caller owns
    pub async fn summary(&self, session: &Session) -> Result<BudgetSummary, DomainError> {
        require_role(session, &[Role::User], "keep a budget")?;
        let items = self.budget_repo.list_by_owner(&session.actor_id).await?;
        Ok(BudgetSummary::from_items(&items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MockBudgetRepository;

    fn item(owner: Uuid, category: &str, amount: Amount, item_type: BudgetType) -> BudgetItem {
        BudgetItem::new(
            owner,
            category.into(),
            amount,
            item_type,
            NaiveDate::from_ymd_opt(2023, 7, 1).unwrap(),
            "".into(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_summary_over_own_items() {
        let user = Session::new(Uuid::new_v4(), Role::User, 3600);
        let owner = user.actor_id;
        let mut repo = MockBudgetRepository::new();
        repo.expect_list_by_owner()
            .withf(move |id| *id == owner)
            .returning(move |_| {
                Ok(vec![
                    item(owner, "Salary", 50_000, BudgetType::Income),
                    item(owner, "Rent", 15_000, BudgetType::Expense),
                ])
            });

        let summary = BudgetService::new(Arc::new(repo)).summary(&user).await.unwrap();
        assert_eq!(summary.balance, 35_000);
        assert_eq!(summary.income_by_category.len(), 1);
    }

    #[tokio::test]
    async fn test_cannot_delete_foreign_item() {
        let user = Session::new(Uuid::new_v4(), Role::User, 3600);
        let foreign = item(Uuid::new_v4(), "Rent", 100, BudgetType::Expense);
        let id = foreign.id;
        let mut repo = MockBudgetRepository::new();
        repo.expect_find_by_id().returning(move |_| Ok(Some(foreign.clone())));
        repo.expect_delete().never();

        assert!(matches!(
            BudgetService::new(Arc::new(repo)).delete(&user, &id).await,
            Err(DomainError::BudgetItemNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_add_rejects_unknown_category() {
        let user = Session::new(Uuid::new_v4(), Role::User, 3600);
        let mut repo = MockBudgetRepository::new();
        repo.expect_create().never();

        let form = NewBudgetItem {
            category: "Salary".into(),
            amount: 100,
            item_type: BudgetType::Expense,
            date: None,
            description: "".into(),
        };
        assert!(matches!(
            BudgetService::new(Arc::new(repo)).add(&user, form).await,
            Err(DomainError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_staff_have_no_budget() {
        let admin = Session::new(Uuid::new_v4(), Role::Admin, 3600);
        let service = BudgetService::new(Arc::new(MockBudgetRepository::new()));
        assert!(service.summary(&admin).await.is_err());
    }
}
