//! Common types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

pub type EntityId = Uuid;

/// Money in currency minor units
pub type Amount = u64;

pub fn new_id() -> EntityId {
    Uuid::new_v4()
}

/// Actor role attached to every session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Verifier,
    User,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Verifier, Role::User];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Verifier => "verifier",
            Role::User => "user",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "verifier" => Some(Role::Verifier),
            "user" => Some(Role::User),
            _ => None,
        }
    }

    /// Landing page after login, and redirect target when a page is off-limits
    pub fn home_path(&self) -> &'static str {
        match self {
            Role::Admin => "/admin/dashboard",
            Role::Verifier => "/verifier/dashboard",
            Role::User => "/dashboard",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: 1, per_page: DEFAULT_PAGE_SIZE }
    }
}

impl Pagination {
    pub fn new(page: Option<u32>, per_page: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize) * self.per_page as usize
    }
}

/// One page of a filtered collection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total: usize,
    pub total_pages: u32,
}

impl<T> Paginated<T> {
    pub fn from_vec(all: Vec<T>, pagination: Pagination) -> Self {
        let total = all.len();
        let total_pages = total.div_ceil(pagination.per_page as usize) as u32;
        let items = all
            .into_iter()
            .skip(pagination.offset())
            .take(pagination.per_page as usize)
            .collect();
        Self {
            items,
            page: pagination.page,
            per_page: pagination.per_page,
            total,
            total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total: self.total,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip_and_home() {
        for role in Role::ALL {
            assert_eq!(Role::from_str(role.as_str()), Some(role));
        }
        assert_eq!(Role::from_str("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::from_str("owner"), None);
        assert_eq!(Role::Verifier.home_path(), "/verifier/dashboard");
    }

    #[test]
    fn test_pagination_clamps() {
        let p = Pagination::new(Some(0), Some(1000));
        assert_eq!(p.page, 1);
        assert_eq!(p.per_page, MAX_PAGE_SIZE);
        assert_eq!(Pagination::default().per_page, 5);
    }

    #[test]
    fn test_paginated_slices_last_page() {
        let page = Paginated::from_vec((1..=12).collect::<Vec<_>>(), Pagination::new(Some(3), Some(5)));
        assert_eq!(page.items, vec![11, 12]);
        assert_eq!(page.total, 12);
        assert_eq!(page.total_pages, 3);

        let empty = Paginated::from_vec(Vec::<u8>::new(), Pagination::default());
        assert!(empty.items.is_empty());
        assert_eq!(empty.total_pages, 0);
    }
}
