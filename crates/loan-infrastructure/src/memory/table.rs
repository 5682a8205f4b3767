//! Keyed row storage shared by the in-memory repositories

use dashmap::DashMap;
use loan_core::DomainError;
use uuid::Uuid;

/// Rows addressable by id
pub trait Record: Clone + Send + Sync + 'static {
    fn id(&self) -> Uuid;
}

macro_rules! impl_record {
    ($($ty:ty),+ $(,)?) => {
        $(impl Record for $ty {
            fn id(&self) -> Uuid {
                self.id
            }
        })+
    };
}

impl_record!(
    loan_core::UserAccount,
    loan_core::Borrower,
    loan_core::Loan,
    loan_core::Repayment,
    loan_core::BudgetItem,
);

/// Rows written with an optimistic version check
pub trait Versioned: Record {
    fn version(&self) -> u64;
    fn set_version(&mut self, version: u64);
}

macro_rules! impl_versioned {
    ($($ty:ty),+ $(,)?) => {
        $(impl Versioned for $ty {
            fn version(&self) -> u64 {
                self.version
            }

            fn set_version(&mut self, version: u64) {
                self.version = version;
            }
        })+
    };
}

impl_versioned!(loan_core::Loan, loan_core::Repayment);

pub struct Table<T: Record> {
    rows: DashMap<Uuid, T>,
    name: &'static str,
}

impl<T: Record> Table<T> {
    pub fn new(name: &'static str) -> Self {
        Self { rows: DashMap::new(), name }
    }

    pub fn get(&self, id: &Uuid) -> Option<T> {
        self.rows.get(id).map(|row| row.value().clone())
    }

    pub fn find(&self, pred: impl Fn(&T) -> bool) -> Option<T> {
        self.rows.iter().find(|row| pred(row.value())).map(|row| row.value().clone())
    }

    pub fn filter(&self, pred: impl Fn(&T) -> bool) -> Vec<T> {
        self.rows
            .iter()
            .filter(|row| pred(row.value()))
            .map(|row| row.value().clone())
            .collect()
    }

    pub fn all(&self) -> Vec<T> {
        self.filter(|_| true)
    }

    pub fn insert(&self, row: &T) -> Result<T, DomainError> {
        use dashmap::mapref::entry::Entry;
        match self.rows.entry(row.id()) {
            Entry::Occupied(_) => Err(DomainError::InternalError(format!(
                "duplicate {} id {}",
                self.name,
                row.id()
            ))),
            Entry::Vacant(slot) => {
                slot.insert(row.clone());
                Ok(row.clone())
            }
        }
    }

    /// Replace an existing row; `missing` builds the not-found error
    pub fn replace(&self, row: &T, missing: impl FnOnce(Uuid) -> DomainError) -> Result<T, DomainError> {
        match self.rows.get_mut(&row.id()) {
            Some(mut slot) => {
                *slot = row.clone();
                Ok(row.clone())
            }
            None => Err(missing(row.id())),
        }
    }

    pub fn remove(&self, id: &Uuid) -> bool {
        self.rows.remove(id).is_some()
    }
}

impl<T: Versioned> Table<T> {
    /// Replace a row only if it still holds the version `row` was read at.
    /// The check and the write happen under the same shard lock.
    pub fn replace_versioned(&self, row: &T, missing: impl FnOnce(Uuid) -> DomainError) -> Result<T, DomainError> {
        let Some(mut slot) = self.rows.get_mut(&row.id()) else {
            return Err(missing(row.id()));
        };
        if slot.version() != row.version() {
            return Err(DomainError::StaleWrite {
                entity: self.name,
                id: row.id(),
            });
        }
        let mut next = row.clone();
        next.set_version(row.version() + 1);
        *slot = next.clone();
        Ok(next)
    }
}
