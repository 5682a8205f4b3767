//! # LoanDesk Client
//!
//! Typed access to the LoanDesk REST backend for front-end views:
//! bearer-token handling, defensive payload mapping, and cancellable
//! view loads.

pub mod client;
pub mod error;
pub mod fetch;
pub mod payload;
pub mod token;

pub use client::BackendClient;
pub use error::ClientError;
pub use fetch::{FetchState, ViewLoader};
pub use token::TokenStore;
