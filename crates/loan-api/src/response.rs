//! API Response wrapper

use chrono::Utc;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ErrorBody>,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    /// Where the client should navigate next, set on 401
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    pub fn error(code: &str, message: &str) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorBody {
                code: code.to_string(),
                message: message.to_string(),
                redirect: None,
            }),
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    pub fn with_redirect(mut self, path: &str) -> Self {
        if let Some(error) = self.error.as_mut() {
            error.redirect = Some(path.to_string());
        }
        self
    }
}
