//! Client errors

use loan_shared::constants::LOGIN_PATH;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// The backend refused the token. The stored token has been cleared.
    #[error("Session expired, please sign in again")]
    Unauthorized { redirect: String },

    #[error("Request timed out")]
    Timeout,

    #[error("Backend error ({status}): {message}")]
    Api { status: u16, code: String, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    pub(crate) fn unauthorized() -> Self {
        ClientError::Unauthorized {
            redirect: LOGIN_PATH.to_string(),
        }
    }

    /// Where the view should navigate instead of rendering the error
    pub fn redirect(&self) -> Option<&str> {
        match self {
            ClientError::Unauthorized { redirect } => Some(redirect),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Timeout
        } else if e.is_decode() {
            ClientError::Decode(e.to_string())
        } else {
            ClientError::Network(e.to_string())
        }
    }
}
