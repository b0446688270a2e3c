//! # Probes for Testing
//!
//! A probe is a real [`ActorRef`] whose mailbox is read by the test instead of by a
//! run loop. Code under test talks to the probe exactly as it would talk to a live
//! actor; the test then inspects each queued message and decides what to do with it.
//!
//! | Feature | Probe | Real Actor |
//! |---------|-------|------------|
//! | **Speed** | Instant (no task spawned) | Fast (but involves tokio spawn) |
//! | **Determinism** | The test chooses when each message runs | Subject to scheduler |
//! | **State** | Whatever the test hands to `deliver_next` | Owned by the actor task |
//! | **Use Case** | Asserting *which* calls a component makes | Testing the actor itself or full system |
//!
//! ```rust
//! use actor_stage::mock::probe_for;
//!
//! struct Greeter {
//!     greeted: Vec<String>,
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (greeter, mut probe) = probe_for::<Greeter>("greeter");
//!
//!     // Code under test
//!     greeter.tell("greet(String)", |g| g.greeted.push("Alice".into()));
//!
//!     // Inspect and run the call against a test double
//!     let mut double = Greeter { greeted: Vec::new() };
//!     let method = probe.deliver_next(&mut double).await;
//!     assert_eq!(method, Some("greet(String)"));
//!     assert_eq!(double.greeted, vec!["Alice".to_string()]);
//! }
//! ```

use crate::actor::Address;
use crate::dead_letters::DeadLetters;
use crate::mailbox::{mailbox, MailboxKind, MailboxReceiver};
use crate::message::{Envelope, Message};
use crate::proxy::ActorRef;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

static PROBE_IDS: AtomicU64 = AtomicU64::new(u64::MAX / 2);

/// Receiving side of a probed actor reference.
pub struct Probe<A> {
    receiver: MailboxReceiver<A>,
    dead_letters: DeadLetters,
}

/// Creates an actor reference backed by a probe instead of a run loop.
pub fn probe_for<A: Send + 'static>(name: &str) -> (ActorRef<A>, Probe<A>) {
    let address = Address::new(PROBE_IDS.fetch_add(1, Ordering::Relaxed), name);
    let (sender, receiver) = mailbox(MailboxKind::Unbounded);
    let dead_letters = DeadLetters::default();
    let actor_ref = ActorRef::new(
        address,
        sender,
        Arc::new(AtomicBool::new(false)),
        dead_letters.clone(),
    );
    (
        actor_ref,
        Probe {
            receiver,
            dead_letters,
        },
    )
}

impl<A> Probe<A> {
    /// Waits for the next call. `None` if a stop arrives or every reference is dropped.
    pub async fn expect_message(&mut self) -> Option<Message<A>> {
        match self.receiver.recv().await {
            Some(Envelope::Deliver(message)) => Some(message),
            _ => None,
        }
    }

    /// The next call if one is already queued.
    pub fn try_next(&mut self) -> Option<Message<A>> {
        match self.receiver.try_recv() {
            Some(Envelope::Deliver(message)) => Some(message),
            _ => None,
        }
    }

    /// Runs the next call against `actor` and returns its representation.
    pub async fn deliver_next(&mut self, actor: &mut A) -> Option<&'static str> {
        let message = self.expect_message().await?;
        let representation = message.representation();
        message.deliver(actor);
        Some(representation)
    }

    /// Waits for a stop request.
    pub async fn expect_stop(&mut self) -> bool {
        matches!(self.receiver.recv().await, Some(Envelope::Stop))
    }

    /// Dead letters recorded by the probed reference.
    pub fn dead_letters(&self) -> &DeadLetters {
        &self.dead_letters
    }
}
