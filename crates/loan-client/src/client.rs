// ============================================================================
// LoanDesk Client - Backend Client
// File: crates/loan-client/src/client.rs
// ============================================================================
//! REST client for the LoanDesk backend. Every request carries the stored
//! bearer token; a 401 clears it and surfaces a redirect to the login page.

use std::sync::Arc;
use std::time::Duration;

use loan_shared::config::BackendSettings;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ClientError;
use crate::payload::{
    AdminDashboardView, Envelope, ListQuery, LoanApplicationRequest, LoanRow, LoginPayload, NewLoanRequest, Page,
    UserProfile,
};
use crate::token::TokenStore;

#[derive(Clone)]
pub struct BackendClient {
    http: Client,
    base_url: String,
    tokens: Arc<TokenStore>,
}

impl BackendClient {
    pub fn new(settings: &BackendSettings) -> Result<Self, ClientError> {
        Self::with_timeout(&settings.base_url, Duration::from_secs(settings.timeout_seconds))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens: Arc::new(TokenStore::new()),
        })
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginPayload, ClientError> {
        let body = serde_json::json!({ "email": email, "password": password });
        let payload: LoginPayload = self
            .send(self.request(Method::POST, "/auth/login").json(&body))
            .await
            .map_err(|e| match e {
                ClientError::Unauthorized { .. } => ClientError::Api {
                    status: StatusCode::UNAUTHORIZED.as_u16(),
                    code: "INVALID_CREDENTIALS".to_string(),
                    message: "Invalid email or password".to_string(),
                },
                other => other,
            })?;
        self.tokens.set(payload.token.clone());
        debug!("Signed in as {}", payload.user.role);
        Ok(payload)
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<UserProfile, ClientError> {
        let body = serde_json::json!({ "name": name, "email": email, "password": password });
        self.send(self.request(Method::POST, "/auth/register").json(&body)).await
    }

    /// Ends the backend session. The local token is dropped even when the
    /// backend cannot be reached.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let result = self.send::<Value>(self.request(Method::POST, "/auth/logout")).await;
        self.tokens.clear();
        match result {
            Ok(_) | Err(ClientError::Unauthorized { .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }

    pub async fn profile(&self) -> Result<UserProfile, ClientError> {
        self.send(self.request(Method::GET, "/users/profile")).await
    }

    pub async fn loans(&self, query: &ListQuery) -> Result<Page<LoanRow>, ClientError> {
        let url = Url::parse_with_params(&self.url("/loans"), query.pairs())
            .map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        self.send(self.authorized(self.http.get(url))).await
    }

    pub async fn create_loan(&self, form: &NewLoanRequest) -> Result<LoanRow, ClientError> {
        self.post("/loans", form).await
    }

    pub async fn apply_for_loan(&self, form: &LoanApplicationRequest) -> Result<LoanRow, ClientError> {
        self.post("/loans/apply", form).await
    }

    pub async fn admin_dashboard(&self) -> Result<AdminDashboardView, ClientError> {
        self.send(self.request(Method::GET, "/admin/dashboard")).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ClientError> {
        self.send(self.request(Method::POST, path).json(body)).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.authorized(self.http.request(method, self.url(path)))
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.tokens.get() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let response = builder.send().await?;
        self.read(response).await
    }

    async fn read<T: DeserializeOwned>(&self, response: Response) -> Result<T, ClientError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            if self.tokens.clear() {
                warn!("Backend rejected the session token, signing out");
            }
            return Err(ClientError::unauthorized());
        }

        let bytes = response.bytes().await?;
        if !status.is_success() {
            let (code, message) = serde_json::from_slice::<Envelope<Value>>(&bytes)
                .ok()
                .and_then(|envelope| envelope.error)
                .map(|error| (error.code, error.message))
                .unwrap_or_else(|| {
                    (
                        "HTTP_ERROR".to_string(),
                        status.canonical_reason().unwrap_or("Request failed").to_string(),
                    )
                });
            return Err(ClientError::Api {
                status: status.as_u16(),
                code,
                message,
            });
        }

        let envelope: Envelope<T> =
            serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))?;
        envelope
            .data
            .ok_or_else(|| ClientError::Decode("Response carried no data".to_string()))
    }
}
