//! # Completes
//!
//! A single-assignment completion handle. The caller of an asynchronous call gets a
//! `Completes<T>` immediately; whoever finishes the work fulfils it exactly once with
//! [`Completes::with`]. Continuations registered through
//! [`Completes::and_finally_consume`] run in registration order on the fulfilling side.
//!
//! A handle that is never fulfilled stays pending forever. The runtime imposes no
//! timeout; use [`Completes::await_outcome_timeout`] where a caller needs one.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::Notify;

type Continuation<T> = Box<dyn FnOnce(&T) + Send>;

struct State<T> {
    outcome: Option<Arc<T>>,
    continuations: Vec<Continuation<T>>,
    // Set while the fulfilling side drains `continuations`.
    delivering: bool,
}

struct Shared<T> {
    state: Mutex<State<T>>,
    notify: Notify,
}

/// Eventual outcome of an asynchronous call. Clones share the same slot.
pub struct Completes<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for Completes<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> Default for Completes<T> {
    fn default() -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(State {
                    outcome: None,
                    continuations: Vec::new(),
                    delivering: false,
                }),
                notify: Notify::new(),
            }),
        }
    }
}

impl<T> Completes<T> {
    /// A pending handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle that is already fulfilled.
    pub fn with_success(outcome: T) -> Self {
        let completes = Self::new();
        completes.with(outcome);
        completes
    }

    fn state(&self) -> MutexGuard<'_, State<T>> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Fulfils the handle. Returns `false` (and drops `outcome`) if it was already fulfilled.
    ///
    /// Continuations registered while earlier ones are still running are queued behind
    /// them and run by this call.
    pub fn with(&self, outcome: T) -> bool {
        let outcome = {
            let mut state = self.state();
            if state.outcome.is_some() {
                return false;
            }
            let outcome = Arc::new(outcome);
            state.outcome = Some(Arc::clone(&outcome));
            state.delivering = true;
            outcome
        };

        loop {
            let continuations = {
                let mut state = self.state();
                if state.continuations.is_empty() {
                    state.delivering = false;
                    break;
                }
                std::mem::take(&mut state.continuations)
            };
            for continuation in continuations {
                continuation(&*outcome);
            }
        }
        self.shared.notify.notify_waiters();
        true
    }

    /// Registers a callback for the outcome. Runs immediately if already fulfilled and
    /// no earlier callback is still pending.
    pub fn and_finally_consume<F>(&self, consumer: F) -> &Self
    where
        F: FnOnce(&T) + Send + 'static,
    {
        let ready = {
            let mut state = self.state();
            match state.outcome.clone() {
                Some(outcome) if !state.delivering => outcome,
                _ => {
                    state.continuations.push(Box::new(consumer));
                    return self;
                }
            }
        };
        consumer(&*ready);
        self
    }

    pub fn is_completed(&self) -> bool {
        self.state().outcome.is_some()
    }

    /// A new handle fulfilled with `function(outcome)` once this one is fulfilled.
    pub fn map<U, F>(&self, function: F) -> Completes<U>
    where
        U: Send + Sync + 'static,
        F: FnOnce(&T) -> U + Send + 'static,
    {
        let mapped = Completes::new();
        let target = mapped.clone();
        self.and_finally_consume(move |outcome| {
            target.with(function(outcome));
        });
        mapped
    }
}

impl<T: Clone> Completes<T> {
    /// Non-blocking read of the outcome, `None` while pending.
    pub fn outcome(&self) -> Option<T> {
        self.state().outcome.as_deref().cloned()
    }

    /// Waits until the handle is fulfilled.
    pub async fn await_outcome(&self) -> T {
        loop {
            // Registered before the check so a concurrent `with` cannot be missed.
            let notified = self.shared.notify.notified();
            if let Some(outcome) = self.outcome() {
                return outcome;
            }
            notified.await;
        }
    }

    /// Waits at most `timeout`; `None` if the handle is still pending.
    pub async fn await_outcome_timeout(&self, timeout: Duration) -> Option<T> {
        tokio::time::timeout(timeout, self.await_outcome()).await.ok()
    }
}

impl<T: fmt::Debug> fmt::Debug for Completes<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("Completes")
            .field("outcome", &state.outcome)
            .field("continuations", &state.continuations.len())
            .finish()
    }
}
