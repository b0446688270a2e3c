//! # Actor References
//!
//! [`ActorRef`] is the only way to talk to an actor. It is the "client" half: cheap to
//! clone, safe to share across tasks, and it never calls into the actor directly.
//!
//! Every call goes through the same steps:
//!
//! 1. If the actor has stopped, the message becomes a dead letter.
//! 2. Otherwise the message is enqueued into the actor's mailbox.
//! 3. If enqueueing fails (mailbox closed or full), the message becomes a dead letter.
//!
//! No call ever raises to the caller. A call with an answer returns a
//! [`Completes`] immediately; when the message is dead-lettered that handle stays
//! pending forever.

use crate::actor::Address;
use crate::completes::Completes;
use crate::dead_letters::{DeadLetter, DeadLetters};
use crate::error::StageError;
use crate::mailbox::Mailbox;
use crate::message::{Envelope, Message};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Typed handle to a running actor of type `A`.
pub struct ActorRef<A> {
    address: Address,
    mailbox: Mailbox<A>,
    stopped: Arc<AtomicBool>,
    dead_letters: DeadLetters,
}

impl<A> Clone for ActorRef<A> {
    fn clone(&self) -> Self {
        Self {
            address: self.address.clone(),
            mailbox: self.mailbox.clone(),
            stopped: Arc::clone(&self.stopped),
            dead_letters: self.dead_letters.clone(),
        }
    }
}

impl<A> fmt::Debug for ActorRef<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActorRef")
            .field("address", &self.address)
            .field("stopped", &self.is_stopped())
            .finish()
    }
}

impl<A> ActorRef<A> {
    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

impl<A: Send + 'static> ActorRef<A> {
    pub(crate) fn new(
        address: Address,
        mailbox: Mailbox<A>,
        stopped: Arc<AtomicBool>,
        dead_letters: DeadLetters,
    ) -> Self {
        Self {
            address,
            mailbox,
            stopped,
            dead_letters,
        }
    }

    /// Fire-and-forget call. Returns `false` if the message was dead-lettered.
    pub fn tell<F>(&self, representation: &'static str, consumer: F) -> bool
    where
        F: FnOnce(&mut A) + Send + 'static,
    {
        self.deliver(Message::new(representation, consumer))
    }

    /// Call with an answer computed synchronously by the actor.
    pub fn ask<R, F>(&self, representation: &'static str, function: F) -> Completes<R>
    where
        R: Send + Sync + 'static,
        F: FnOnce(&mut A) -> R + Send + 'static,
    {
        self.ask_with(representation, move |actor, completes| {
            completes.with(function(actor));
        })
    }

    /// Call whose answer the actor fulfils itself, possibly later and from elsewhere.
    ///
    /// The actor receives its own clone of the returned handle.
    pub fn ask_with<R, F>(&self, representation: &'static str, consumer: F) -> Completes<R>
    where
        R: Send + Sync + 'static,
        F: FnOnce(&mut A, Completes<R>) + Send + 'static,
    {
        let completes = Completes::new();
        let answer = completes.clone();
        self.deliver(Message::new(representation, move |actor: &mut A| {
            consumer(actor, answer)
        }));
        completes
    }

    /// Requests a stop. Messages already queued are processed first.
    ///
    /// Returns `false` if the actor was already stopping.
    pub fn stop(&self) -> bool {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return false;
        }
        match self.mailbox.send(Envelope::Stop) {
            Err(StageError::MailboxFull) => {
                let mailbox = self.mailbox.clone();
                if let Ok(runtime) = tokio::runtime::Handle::try_current() {
                    runtime.spawn(async move { mailbox.send_when_ready(Envelope::Stop).await });
                }
            }
            // A closed mailbox means the loop already ended.
            _ => {}
        }
        true
    }

    fn deliver(&self, message: Message<A>) -> bool {
        let representation = message.representation();
        let outcome = if self.is_stopped() {
            Err(StageError::ActorStopped)
        } else {
            self.mailbox.send(Envelope::Deliver(message))
        };
        match outcome {
            Ok(()) => true,
            Err(reason) => {
                self.dead_letters.failed_delivery(DeadLetter::new(
                    self.address.clone(),
                    representation,
                    reason,
                ));
                false
            }
        }
    }
}
