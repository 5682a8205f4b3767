// ============================================================================
// LoanDesk Core - Budget Entity
// File: crates/loan-core/src/domain/budget.rs
// Description: Personal income/expense items kept by borrowers
// ============================================================================

use chrono::{DateTime, NaiveDate, Utc};
use loan_shared::constants::MAX_AMOUNT;
use loan_shared::Amount;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::search::Searchable;

pub const INCOME_CATEGORIES: &[&str] = &["Salary", "Freelance", "Investments", "Gifts", "Other Income"];

pub const EXPENSE_CATEGORIES: &[&str] = &[
    "Rent",
    "Groceries",
    "Utilities",
    "Transportation",
    "Entertainment",
    "Healthcare",
    "Education",
    "Loan Repayment",
    "Other Expenses",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetType {
    Income,
    Expense,
}

impl BudgetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetType::Income => "income",
            BudgetType::Expense => "expense",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "income" => Some(BudgetType::Income),
            "expense" => Some(BudgetType::Expense),
            _ => None,
        }
    }

    /// Categories offered for this type, in display order
    pub fn categories(&self) -> &'static [&'static str] {
        match self {
            BudgetType::Income => INCOME_CATEGORIES,
            BudgetType::Expense => EXPENSE_CATEGORIES,
        }
    }
}

impl Default for BudgetType {
    fn default() -> Self {
        BudgetType::Expense
    }
}

/// Budget item entity
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_category"))]
pub struct BudgetItem {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub category: String,

    #[validate(range(min = 1, max = MAX_AMOUNT, message = "Amount must be positive and within the maximum amount"))]
    pub amount: Amount,

    #[serde(rename = "type")]
    pub item_type: BudgetType,

    pub date: NaiveDate,

    #[validate(length(max = 500, message = "Description too long"))]
    pub description: String,

    pub created_at: DateTime<Utc>,
}

fn validate_category(item: &BudgetItem) -> Result<(), ValidationError> {
    if item.item_type.categories().contains(&item.category.as_str()) {
        Ok(())
    } else {
        let mut error = ValidationError::new("category");
        error.message = Some(format!("Unknown {} category '{}'", item.item_type.as_str(), item.category).into());
        Err(error)
    }
}

impl BudgetItem {
    pub fn new(
        owner_id: Uuid,
        category: String,
        amount: Amount,
        item_type: BudgetType,
        date: NaiveDate,
        description: String,
    ) -> Result<Self, validator::ValidationErrors> {
        let item = Self {
            id: Uuid::new_v4(),
            owner_id,
            category: category.trim().to_string(),
            amount,
            item_type,
            date,
            description: description.trim().to_string(),
            created_at: Utc::now(),
        };

        item.validate()?;
        Ok(item)
    }
}

impl Searchable for BudgetItem {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.category.as_str(), self.description.as_str(), self.item_type.as_str()]
    }
}
