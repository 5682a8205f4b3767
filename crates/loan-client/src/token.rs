//! Bearer token held between requests

use parking_lot::RwLock;

#[derive(Debug, Default)]
pub struct TokenStore {
    token: RwLock<Option<String>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<String> {
        self.token.read().clone()
    }

    pub fn set(&self, token: impl Into<String>) {
        *self.token.write() = Some(token.into());
    }

    /// Returns true when a token was present
    pub fn clear(&self) -> bool {
        self.token.write().take().is_some()
    }

    pub fn is_signed_in(&self) -> bool {
        self.token.read().is_some()
    }
}
