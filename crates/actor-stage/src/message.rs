//! # Messages
//!
//! A message is a deferred method call: a human-readable representation of the
//! method (used for logging and dead letters) plus a consumer closure that runs
//! against the actor once the message reaches the front of its mailbox.
//!
//! This replaces per-interface generated proxies. Every protocol an actor exposes
//! is expressed as closures sent through the same [`ActorRef`](crate::ActorRef).

use std::fmt;

/// One deferred call against an actor of type `A`.
pub struct Message<A> {
    representation: &'static str,
    consumer: Box<dyn FnOnce(&mut A) + Send>,
}

impl<A> Message<A> {
    pub fn new<F>(representation: &'static str, consumer: F) -> Self
    where
        F: FnOnce(&mut A) + Send + 'static,
    {
        Self {
            representation,
            consumer: Box::new(consumer),
        }
    }

    /// The method representation, e.g. `"handle_for(Context, MappedParameters)"`.
    pub fn representation(&self) -> &'static str {
        self.representation
    }

    /// Runs the call against `actor`, consuming the message.
    pub fn deliver(self, actor: &mut A) {
        (self.consumer)(actor)
    }
}

impl<A> fmt::Debug for Message<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("representation", &self.representation)
            .finish_non_exhaustive()
    }
}

/// What actually travels through a mailbox.
#[derive(Debug)]
pub enum Envelope<A> {
    /// A call to run against the actor.
    Deliver(Message<A>),
    /// Ends the actor's loop once every earlier envelope has been processed.
    Stop,
}
