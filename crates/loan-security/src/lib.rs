//! # LoanDesk Security
//!
//! Security utilities: JWT access tokens, password hashing, sessions.

pub mod jwt;
pub mod password;
pub mod session;

pub use jwt::{Claims, JwtService};
pub use password::PasswordService;
pub use session::{Session, SessionStore};
