//! Per-view fetch state with cancellation.
//!
//! Each `load` takes a new generation number. A result is applied only if no
//! later `load` or `cancel` happened while it was in flight; otherwise it is
//! dropped, so a view that was navigated away from never gets updated.

use std::future::Future;

use parking_lot::Mutex;
use tracing::debug;

use crate::error::ClientError;

#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    Loading,
    Ready(T),
    Error {
        message: String,
        /// Set when the view should navigate instead, e.g. to the login page
        redirect: Option<String>,
    },
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }
}

impl<T> From<ClientError> for FetchState<T> {
    fn from(error: ClientError) -> Self {
        FetchState::Error {
            redirect: error.redirect().map(str::to_string),
            message: error.to_string(),
        }
    }
}

struct Slot<T> {
    generation: u64,
    state: FetchState<T>,
}

pub struct ViewLoader<T> {
    slot: Mutex<Slot<T>>,
}

impl<T: Clone> Default for ViewLoader<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> ViewLoader<T> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(Slot {
                generation: 0,
                state: FetchState::Loading,
            }),
        }
    }

    pub fn state(&self) -> FetchState<T> {
        self.slot.lock().state.clone()
    }

    /// Drop whatever is in flight
    pub fn cancel(&self) {
        self.slot.lock().generation += 1;
    }

    /// Run `fetch` and store its outcome. Returns false when the result was
    /// discarded because a newer load or a cancel superseded it.
    pub async fn load<F>(&self, fetch: F) -> bool
    where
        F: Future<Output = Result<T, ClientError>>,
    {
        let generation = {
            let mut slot = self.slot.lock();
            slot.generation += 1;
            slot.state = FetchState::Loading;
            slot.generation
        };

        let result = fetch.await;

        let mut slot = self.slot.lock();
        if slot.generation != generation {
            debug!("Discarding stale fetch result (generation {} < {})", generation, slot.generation);
            return false;
        }
        slot.state = match result {
            Ok(data) => FetchState::Ready(data),
            Err(e) => e.into(),
        };
        true
    }
}
