//! Application-wide constants

pub const DEFAULT_PAGE_SIZE: u32 = 5;
pub const MAX_PAGE_SIZE: u32 = 100;
pub const TOKEN_TYPE_ACCESS: &str = "access";
pub const DEFAULT_ACCESS_TOKEN_EXPIRY: i64 = 3600;
pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 128;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;
/// Upper bound for any single amount, in minor units
pub const MAX_AMOUNT: u64 = 1_000_000_000_000_000;
pub const TRANSACTION_ID_PREFIX: &str = "TRX";
pub const LOGIN_PATH: &str = "/login";
pub const RECENT_LOANS_LIMIT: usize = 7;
pub const CHART_MONTHS: u32 = 12;
