//! Infrastructure errors

use loan_core::DomainError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("Invalid seed record '{record}': {source}")]
    InvalidRecord {
        record: &'static str,
        #[source]
        source: DomainError,
    },

    #[error("Seed date out of range: {0}")]
    InvalidDate(String),
}
