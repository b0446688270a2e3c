//! # Dead Letters
//!
//! Messages that could not be delivered (the target had stopped, or its mailbox was
//! closed or full) are recorded here instead of being dropped silently or raised to
//! the sender. The collector keeps the most recent entries up to a fixed size and
//! forwards every entry to any subscribed listener.

use crate::actor::Address;
use crate::error::StageError;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use tracing::warn;

/// Default number of dead letters retained.
pub const DEFAULT_DEAD_LETTER_CAPACITY: usize = 1000;

/// One undeliverable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadLetter {
    /// The intended receiver.
    pub address: Address,
    /// Representation of the method that was called.
    pub representation: &'static str,
    /// Why delivery failed.
    pub reason: StageError,
}

impl DeadLetter {
    pub fn new(address: Address, representation: &'static str, reason: StageError) -> Self {
        Self {
            address,
            representation,
            reason,
        }
    }
}

/// Collector of undeliverable messages, shared by every actor of a stage.
///
/// Cloning yields another handle to the same collector.
#[derive(Clone)]
pub struct DeadLetters {
    letters: Arc<Mutex<VecDeque<DeadLetter>>>,
    listeners: Arc<Mutex<Vec<mpsc::UnboundedSender<DeadLetter>>>>,
    max_size: usize,
}

impl DeadLetters {
    pub fn new(max_size: usize) -> Self {
        Self {
            letters: Arc::new(Mutex::new(VecDeque::with_capacity(max_size.min(64)))),
            listeners: Arc::new(Mutex::new(Vec::new())),
            max_size: max_size.max(1),
        }
    }

    fn letters(&self) -> MutexGuard<'_, VecDeque<DeadLetter>> {
        self.letters.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records a failed delivery. The oldest entry is evicted once `max_size` is reached.
    pub fn failed_delivery(&self, dead_letter: DeadLetter) {
        warn!(
            actor = %dead_letter.address,
            method = dead_letter.representation,
            reason = %dead_letter.reason,
            "Dead letter"
        );

        {
            let mut listeners = self
                .listeners
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            listeners.retain(|listener| listener.send(dead_letter.clone()).is_ok());
        }

        let mut letters = self.letters();
        if letters.len() >= self.max_size {
            letters.pop_front();
        }
        letters.push_back(dead_letter);
    }

    /// Receives every dead letter recorded from now on.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<DeadLetter> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sender);
        receiver
    }

    /// Copies the retained dead letters, oldest first.
    pub fn snapshot(&self) -> Vec<DeadLetter> {
        self.letters().iter().cloned().collect()
    }

    /// Removes and returns the retained dead letters, oldest first.
    pub fn drain(&self) -> Vec<DeadLetter> {
        self.letters().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.letters().len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters().is_empty()
    }
}

impl Default for DeadLetters {
    fn default() -> Self {
        Self::new(DEFAULT_DEAD_LETTER_CAPACITY)
    }
}
