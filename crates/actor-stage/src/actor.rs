//! # Actor Run Loop
//!
//! This module defines the [`Actor`] trait and the loop that drives one actor instance.
//! Each actor owns its state and the receiving half of its mailbox, and processes
//! messages strictly one at a time in its own Tokio task. No locks are needed around
//! the actor's state: the task has exclusive ownership of it.
//!
//! ## Failure Isolation
//!
//! Every message runs under `catch_unwind`. A panicking message is logged and the loop
//! resumes with the next message, so one faulty call cannot take down the actor or any
//! of its peers.
//!
//! ## Stopping
//!
//! An actor stops when it receives [`Envelope::Stop`] or when every sender is gone.
//! Messages enqueued before the stop are processed first; anything still queued behind
//! the stop is handed to [`DeadLetters`].

use crate::dead_letters::{DeadLetter, DeadLetters};
use crate::error::StageError;
use crate::mailbox::MailboxReceiver;
use crate::message::Envelope;
use async_trait::async_trait;
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Identity of a running actor: a stage-unique id plus a readable name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    id: u64,
    name: Arc<str>,
}

impl Address {
    pub fn new(id: u64, name: &str) -> Self {
        Self {
            id,
            name: Arc::from(name),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.id)
    }
}

/// State owned by one actor task.
///
/// Protocol methods are ordinary inherent methods on the implementing type. Callers
/// reach them through [`ActorRef::tell`](crate::ActorRef::tell) and
/// [`ActorRef::ask`](crate::ActorRef::ask), which queue a closure that the run loop
/// applies to `&mut self`.
#[async_trait]
pub trait Actor: Send + 'static {
    /// Called once, before the first message.
    async fn started(&mut self, _address: &Address) {}

    /// Called once, after the last message.
    async fn stopped(&mut self, _address: &Address) {}
}

/// Short type name used in log fields, e.g. `"ResourceRequestHandlerActor"`.
pub(crate) fn actor_type<A>() -> &'static str {
    let full = std::any::type_name::<A>();
    let base = full.split('<').next().unwrap_or(full);
    base.split("::").last().unwrap_or("Unknown")
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// The server half of an actor: its state, its mailbox and its stop flag.
pub(crate) struct ActorCell<A: Actor> {
    address: Address,
    actor: A,
    receiver: MailboxReceiver<A>,
    stopped: Arc<AtomicBool>,
    dead_letters: DeadLetters,
}

impl<A: Actor> ActorCell<A> {
    pub(crate) fn new(
        address: Address,
        actor: A,
        receiver: MailboxReceiver<A>,
        stopped: Arc<AtomicBool>,
        dead_letters: DeadLetters,
    ) -> Self {
        Self {
            address,
            actor,
            receiver,
            stopped,
            dead_letters,
        }
    }

    /// Processes messages until stopped.
    pub(crate) async fn run(mut self) {
        let actor_type = actor_type::<A>();
        let address = self.address.clone();
        info!(actor_type, actor = %address, "Actor started");
        self.actor.started(&address).await;

        let mut processed: u64 = 0;
        while let Some(envelope) = self.receiver.recv().await {
            match envelope {
                Envelope::Deliver(message) => {
                    let method = message.representation();
                    debug!(actor_type, actor = %address, method, "Deliver");
                    let actor = &mut self.actor;
                    if let Err(payload) =
                        panic::catch_unwind(AssertUnwindSafe(|| message.deliver(actor)))
                    {
                        error!(
                            actor_type,
                            actor = %address,
                            method,
                            panic = %panic_message(payload.as_ref()),
                            "Message panicked"
                        );
                    }
                    processed += 1;
                }
                Envelope::Stop => {
                    debug!(actor_type, actor = %address, "Stop received");
                    break;
                }
            }
        }

        self.stopped.store(true, Ordering::SeqCst);
        self.receiver.close();
        let mut undelivered = 0usize;
        while let Some(envelope) = self.receiver.try_recv() {
            if let Envelope::Deliver(message) = envelope {
                undelivered += 1;
                self.dead_letters.failed_delivery(DeadLetter::new(
                    address.clone(),
                    message.representation(),
                    StageError::ActorStopped,
                ));
            }
        }

        self.actor.stopped(&address).await;
        info!(actor_type, actor = %address, processed, undelivered, "Actor stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sample;

    #[test]
    fn test_actor_type_strips_module_path() {
        assert_eq!(actor_type::<Sample>(), "Sample");
        assert_eq!(actor_type::<Vec<String>>(), "Vec");
    }

    #[test]
    fn test_address_display() {
        assert_eq!(Address::new(7, "worker").to_string(), "worker#7");
    }

    #[test]
    fn test_panic_message_reads_common_payloads() {
        let boxed: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_message(boxed.as_ref()), "static");
        let boxed: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(boxed.as_ref()), "owned");
        let boxed: Box<dyn Any + Send> = Box::new(42u8);
        assert_eq!(panic_message(boxed.as_ref()), "unknown panic");
    }
}
