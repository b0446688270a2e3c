//! # Actor Stage
//!
//! A small actor runtime on top of Tokio. Each actor owns its state and a FIFO mailbox,
//! and processes messages one at a time in its own task. Callers never touch an actor
//! directly: they hold an [`ActorRef`] and send it closures that the actor applies to
//! itself.
//!
//! ## Architecture Overview
//!
//! 1. **State Layer** ([`Actor`]) - your type, plus optional start and stop hooks
//! 2. **Runtime Layer** ([`Stage`]) - spawns run loops, owns join handles, shuts down
//! 3. **Interface Layer** ([`ActorRef`]) - liveness check, enqueue, or dead letter
//!
//! Answers come back through [`Completes`], a single-assignment handle that supports
//! continuations and async waiting.
//!
//! ## Delivery Guarantees
//!
//! - Messages from one sender to one actor are processed in send order.
//! - Messages to a stopped actor are recorded in [`DeadLetters`] and never raise.
//! - A panic inside one message is logged and does not stop the actor.
//!
//! ## Mailboxes
//!
//! Two interchangeable delivery paths exist (see [`MailboxKind`]): a preallocated
//! bounded ring and an unbounded queue that allocates an envelope per message. The
//! choice affects allocation only, never ordering.
//!
//! ## Testing
//!
//! The [`mock`] module builds probed references whose mailbox the test reads directly,
//! so components can be tested without spawning any actors.

pub mod actor;
pub mod completes;
pub mod dead_letters;
pub mod error;
pub mod mailbox;
pub mod message;
pub mod mock;
pub mod proxy;
pub mod stage;
pub mod tracing;

// Re-export core types for convenience
pub use actor::{Actor, Address};
pub use completes::Completes;
pub use dead_letters::{DeadLetter, DeadLetters, DEFAULT_DEAD_LETTER_CAPACITY};
pub use error::StageError;
pub use mailbox::{MailboxKind, DEFAULT_MAILBOX_CAPACITY};
pub use message::{Envelope, Message};
pub use proxy::ActorRef;
pub use stage::Stage;
