//! The state container.
//!
//! A [`Store`] is a cheaply-clonable handle constructed once and passed
//! explicitly to every consumer — there is no global singleton. Dispatch is
//! synchronous: the root reducer runs under an internal lock, the new state
//! is published on a `watch` channel, and the action is then forwarded to a
//! `broadcast` channel for the effect layer. The lock makes the reducer call
//! the single serialization point for all slice mutation.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{broadcast, watch};
use tracing::debug;

use crate::action::Action;
use crate::state::{self, AppState};

/// Buffered actions the effect layer may fall behind by before it starts
/// missing intents.
const ACTION_BUFFER: usize = 256;

/// Process-wide state container with a dispatch/subscribe contract.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    /// Serializes reduce-and-publish so observers always see state updates
    /// and action notifications in dispatch order.
    dispatch: Mutex<()>,
    state: watch::Sender<AppState>,
    actions: broadcast::Sender<Action>,
}

impl Store {
    /// A store with both slices empty and idle.
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(AppState::default());
        let (actions, _) = broadcast::channel(ACTION_BUFFER);
        Self {
            inner: Arc::new(StoreInner {
                dispatch: Mutex::new(()),
                state,
                actions,
            }),
        }
    }

    /// Apply `action` to the state and notify subscribers.
    ///
    /// Synchronous and non-blocking; actions dispatched from one caller are
    /// applied in the order dispatched.
    pub fn dispatch(&self, action: impl Into<Action>) {
        let action = action.into();
        let _guard = self
            .inner
            .dispatch
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        debug!(action = action.label(), "dispatch");

        self.inner.state.send_modify(|current| {
            let next = state::reduce(current, &action);
            *current = next;
        });

        // No effect layer attached yet is fine — intents simply go
        // unresolved until one subscribes.
        let _ = self.inner.actions.send(action);
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> AppState {
        self.inner.state.borrow().clone()
    }

    /// Subscribe to state updates.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<AppState> {
        self.inner.state.subscribe()
    }

    /// Subscribe to the action stream (used by the effect layer).
    #[must_use]
    pub fn actions(&self) -> broadcast::Receiver<Action> {
        self.inner.actions.subscribe()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}
