//! # Mailboxes
//!
//! Every actor owns exactly one mailbox, a single-consumer FIFO queue drained by the
//! actor's own task. Two flavours exist and they are functionally equivalent:
//!
//! - **Preallocated**: a bounded channel. A slot is reserved first and the message is
//!   written straight into it. Sending never waits; a full mailbox is reported as
//!   [`StageError::MailboxFull`].
//! - **Unbounded**: every message is wrapped in a freshly allocated channel node.
//!
//! Both preserve per-target FIFO order.

use crate::error::StageError;
use crate::message::Envelope;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Default capacity for preallocated mailboxes.
pub const DEFAULT_MAILBOX_CAPACITY: usize = 1024;

/// Which delivery path an actor's mailbox uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailboxKind {
    Preallocated { capacity: usize },
    Unbounded,
}

impl MailboxKind {
    /// Parses `"preallocated"` or `"unbounded"` (case-insensitive).
    pub fn parse(name: &str, capacity: usize) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "preallocated" => Some(Self::Preallocated {
                capacity: capacity.max(1),
            }),
            "unbounded" => Some(Self::Unbounded),
            _ => None,
        }
    }
}

impl Default for MailboxKind {
    fn default() -> Self {
        Self::Unbounded
    }
}

enum Outbound<A> {
    Preallocated(mpsc::Sender<Envelope<A>>),
    Unbounded(mpsc::UnboundedSender<Envelope<A>>),
}

/// Sending half of an actor's mailbox. Cheap to clone.
pub struct Mailbox<A> {
    outbound: Outbound<A>,
}

impl<A> Clone for Mailbox<A> {
    fn clone(&self) -> Self {
        let outbound = match &self.outbound {
            Outbound::Preallocated(sender) => Outbound::Preallocated(sender.clone()),
            Outbound::Unbounded(sender) => Outbound::Unbounded(sender.clone()),
        };
        Self { outbound }
    }
}

impl<A> Mailbox<A> {
    pub fn is_preallocated(&self) -> bool {
        matches!(self.outbound, Outbound::Preallocated(_))
    }

    pub fn is_closed(&self) -> bool {
        match &self.outbound {
            Outbound::Preallocated(sender) => sender.is_closed(),
            Outbound::Unbounded(sender) => sender.is_closed(),
        }
    }

    /// Enqueues without waiting.
    pub fn send(&self, envelope: Envelope<A>) -> Result<(), StageError> {
        match &self.outbound {
            Outbound::Preallocated(sender) => match sender.try_reserve() {
                Ok(permit) => {
                    permit.send(envelope);
                    Ok(())
                }
                Err(TrySendError::Full(())) => Err(StageError::MailboxFull),
                Err(TrySendError::Closed(())) => Err(StageError::MailboxClosed),
            },
            Outbound::Unbounded(sender) => sender
                .send(envelope)
                .map_err(|_| StageError::MailboxClosed),
        }
    }

    /// Enqueues, waiting for a free slot if a preallocated mailbox is full.
    pub async fn send_when_ready(&self, envelope: Envelope<A>) -> Result<(), StageError> {
        match &self.outbound {
            Outbound::Preallocated(sender) => sender
                .send(envelope)
                .await
                .map_err(|_| StageError::MailboxClosed),
            Outbound::Unbounded(sender) => sender
                .send(envelope)
                .map_err(|_| StageError::MailboxClosed),
        }
    }
}

enum Inbound<A> {
    Preallocated(mpsc::Receiver<Envelope<A>>),
    Unbounded(mpsc::UnboundedReceiver<Envelope<A>>),
}

/// Receiving half, owned by the actor's task.
pub struct MailboxReceiver<A> {
    inbound: Inbound<A>,
}

impl<A> MailboxReceiver<A> {
    pub async fn recv(&mut self) -> Option<Envelope<A>> {
        match &mut self.inbound {
            Inbound::Preallocated(receiver) => receiver.recv().await,
            Inbound::Unbounded(receiver) => receiver.recv().await,
        }
    }

    pub fn try_recv(&mut self) -> Option<Envelope<A>> {
        match &mut self.inbound {
            Inbound::Preallocated(receiver) => receiver.try_recv().ok(),
            Inbound::Unbounded(receiver) => receiver.try_recv().ok(),
        }
    }

    /// Refuses further sends; envelopes already queued can still be received.
    pub fn close(&mut self) {
        match &mut self.inbound {
            Inbound::Preallocated(receiver) => receiver.close(),
            Inbound::Unbounded(receiver) => receiver.close(),
        }
    }
}

/// Creates both halves of a mailbox of the given kind.
pub fn mailbox<A>(kind: MailboxKind) -> (Mailbox<A>, MailboxReceiver<A>) {
    match kind {
        MailboxKind::Preallocated { capacity } => {
            let (sender, receiver) = mpsc::channel(capacity.max(1));
            (
                Mailbox {
                    outbound: Outbound::Preallocated(sender),
                },
                MailboxReceiver {
                    inbound: Inbound::Preallocated(receiver),
                },
            )
        }
        MailboxKind::Unbounded => {
            let (sender, receiver) = mpsc::unbounded_channel();
            (
                Mailbox {
                    outbound: Outbound::Unbounded(sender),
                },
                MailboxReceiver {
                    inbound: Inbound::Unbounded(receiver),
                },
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Message;

    fn record(tag: &'static str) -> Envelope<Vec<&'static str>> {
        Envelope::Deliver(Message::new(tag, move |log: &mut Vec<&'static str>| {
            log.push(tag)
        }))
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!(
            MailboxKind::parse("Preallocated", 8),
            Some(MailboxKind::Preallocated { capacity: 8 })
        );
        assert_eq!(MailboxKind::parse("unbounded", 8), Some(MailboxKind::Unbounded));
        assert_eq!(MailboxKind::parse("ring", 8), None);
    }

    #[tokio::test]
    async fn test_both_paths_preserve_fifo_order() {
        for kind in [MailboxKind::Preallocated { capacity: 4 }, MailboxKind::Unbounded] {
            let (sender, mut receiver) = mailbox::<Vec<&'static str>>(kind);
            for tag in ["a", "b", "c"] {
                sender.send(record(tag)).unwrap();
            }

            let mut log = Vec::new();
            for _ in 0..3 {
                match receiver.recv().await {
                    Some(Envelope::Deliver(message)) => message.deliver(&mut log),
                    other => panic!("unexpected envelope: {:?}", other),
                }
            }
            assert_eq!(log, vec!["a", "b", "c"]);
        }
    }

    #[test]
    fn test_preallocated_mailbox_reports_full() {
        let (sender, _receiver) = mailbox::<Vec<&'static str>>(MailboxKind::Preallocated {
            capacity: 1,
        });
        assert!(sender.is_preallocated());
        sender.send(record("first")).unwrap();
        assert_eq!(sender.send(record("second")), Err(StageError::MailboxFull));
    }

    #[test]
    fn test_closed_mailbox_rejects_sends() {
        let (sender, mut receiver) = mailbox::<Vec<&'static str>>(MailboxKind::Unbounded);
        receiver.close();
        assert!(sender.is_closed());
        assert_eq!(sender.send(record("late")), Err(StageError::MailboxClosed));
    }
}
