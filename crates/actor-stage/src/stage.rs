//! # Stage
//!
//! The stage is the runtime that owns every actor it creates. It hands out addresses,
//! builds each actor's mailbox, spawns the run loop onto Tokio and keeps the join
//! handles so [`Stage::shutdown`] can stop everything and wait for it.
//!
//! ```rust,no_run
//! use actor_stage::{Actor, Stage};
//! use async_trait::async_trait;
//!
//! #[derive(Default)]
//! struct Counter {
//!     count: u64,
//! }
//!
//! #[async_trait]
//! impl Actor for Counter {}
//!
//! #[tokio::main]
//! async fn main() {
//!     let stage = Stage::new("counters");
//!     let counter = stage.actor_for("counter", Counter::default());
//!
//!     counter.tell("increment()", |c| c.count += 1);
//!     let count = counter.ask("count()", |c| c.count).await_outcome().await;
//!     assert_eq!(count, 1);
//!
//!     stage.shutdown().await.unwrap();
//! }
//! ```

use crate::actor::{Actor, ActorCell, Address};
use crate::dead_letters::DeadLetters;
use crate::error::StageError;
use crate::mailbox::{mailbox, MailboxKind};
use crate::proxy::ActorRef;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::JoinHandle;
use tracing::{info, warn};

type Stopper = Box<dyn Fn() + Send>;

/// Owner of a group of actors sharing one dead-letter collector.
pub struct Stage {
    name: String,
    mailbox_kind: MailboxKind,
    dead_letters: DeadLetters,
    next_id: AtomicU64,
    handles: Mutex<Vec<JoinHandle<()>>>,
    stoppers: Mutex<Vec<Stopper>>,
}

impl Stage {
    /// A stage with unbounded mailboxes and the default dead-letter capacity.
    pub fn new(name: &str) -> Self {
        Self::with_options(name, MailboxKind::default(), DeadLetters::default())
    }

    pub fn with_options(name: &str, mailbox_kind: MailboxKind, dead_letters: DeadLetters) -> Self {
        Self {
            name: name.to_string(),
            mailbox_kind,
            dead_letters,
            next_id: AtomicU64::new(1),
            handles: Mutex::new(Vec::new()),
            stoppers: Mutex::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mailbox_kind(&self) -> MailboxKind {
        self.mailbox_kind
    }

    pub fn dead_letters(&self) -> &DeadLetters {
        &self.dead_letters
    }

    /// Number of actors started on this stage so far.
    pub fn actor_count(&self) -> usize {
        self.handles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Starts `actor` with the stage's default mailbox kind.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn actor_for<A: Actor>(&self, name: &str, actor: A) -> ActorRef<A> {
        self.actor_with_mailbox(name, actor, self.mailbox_kind)
    }

    /// Starts `actor` with an explicit mailbox kind.
    pub fn actor_with_mailbox<A: Actor>(
        &self,
        name: &str,
        actor: A,
        kind: MailboxKind,
    ) -> ActorRef<A> {
        let address = Address::new(self.next_id.fetch_add(1, Ordering::SeqCst), name);
        let (sender, receiver) = mailbox(kind);
        let stopped = Arc::new(AtomicBool::new(false));

        let actor_ref = ActorRef::new(
            address.clone(),
            sender,
            Arc::clone(&stopped),
            self.dead_letters.clone(),
        );
        let cell = ActorCell::new(address, actor, receiver, stopped, self.dead_letters.clone());
        let handle = tokio::spawn(cell.run());

        let stopper = actor_ref.clone();
        self.stoppers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Box::new(move || {
                stopper.stop();
            }));
        self.handles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(handle);

        actor_ref
    }

    /// Stops every actor and waits for their loops to finish.
    ///
    /// Every task is awaited; the first failure is returned.
    pub async fn shutdown(&self) -> Result<(), StageError> {
        let stoppers = std::mem::take(
            &mut *self
                .stoppers
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        for stop in &stoppers {
            stop();
        }

        let handles = std::mem::take(
            &mut *self.handles.lock().unwrap_or_else(PoisonError::into_inner),
        );
        let actors = handles.len();
        let mut result = Ok(());
        for handle in handles {
            if let Err(e) = handle.await {
                warn!(stage = %self.name, error = %e, "Actor task failed");
                if result.is_ok() {
                    result = Err(StageError::TaskFailed(e.to_string()));
                }
            }
        }

        info!(
            stage = %self.name,
            actors,
            dead_letters = self.dead_letters.len(),
            "Stage shut down"
        );
        result
    }
}
