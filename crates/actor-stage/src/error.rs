//! # Stage Errors
//!
//! Errors raised by the runtime itself while delivering messages or tearing down
//! actors. Business failures never travel through this type; they are carried by
//! whatever the message's own completion resolves to.

/// Errors that can occur within the actor stage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StageError {
    /// The target was already stopped when the message was sent.
    #[error("Actor stopped")]
    ActorStopped,
    /// A preallocated mailbox had no free slot.
    #[error("Mailbox full")]
    MailboxFull,
    /// The receiving half of the mailbox is gone.
    #[error("Mailbox closed")]
    MailboxClosed,
    /// An actor task ended abnormally during shutdown.
    #[error("Actor task failed: {0}")]
    TaskFailed(String),
}
