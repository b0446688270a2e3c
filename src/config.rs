//! # Server Configuration
//!
//! Runtime knobs read from the environment once at startup. Anything missing or
//! unparsable falls back to its default.
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `RESOURCE_HANDLER_POOL` | pool size for resources built without an explicit size | 10 |
//! | `RESOURCE_MAILBOX` | `preallocated` or `unbounded` | `unbounded` |
//! | `RESOURCE_MAILBOX_CAPACITY` | capacity of preallocated mailboxes | 1024 |
//! | `RESOURCE_DEAD_LETTER_CAPACITY` | retained dead letters | 1000 |

use actor_stage::{MailboxKind, DEFAULT_DEAD_LETTER_CAPACITY, DEFAULT_MAILBOX_CAPACITY};

pub const DEFAULT_HANDLER_POOL_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Workers per resource unless the resource sets its own size.
    pub handler_pool_size: usize,
    pub mailbox: MailboxKind,
    pub dead_letter_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            handler_pool_size: DEFAULT_HANDLER_POOL_SIZE,
            mailbox: MailboxKind::Unbounded,
            dead_letter_capacity: DEFAULT_DEAD_LETTER_CAPACITY,
        }
    }
}

impl ServerConfig {
    pub fn new(handler_pool_size: usize, mailbox: MailboxKind, dead_letter_capacity: usize) -> Self {
        Self {
            handler_pool_size: handler_pool_size.max(1),
            mailbox,
            dead_letter_capacity,
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let handler_pool_size = lookup("RESOURCE_HANDLER_POOL")
            .and_then(|s| s.trim().parse().ok())
            .filter(|size: &usize| *size > 0)
            .unwrap_or(DEFAULT_HANDLER_POOL_SIZE);

        let capacity = lookup("RESOURCE_MAILBOX_CAPACITY")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_MAILBOX_CAPACITY);

        let mailbox = lookup("RESOURCE_MAILBOX")
            .and_then(|s| MailboxKind::parse(&s, capacity))
            .unwrap_or_default();

        let dead_letter_capacity = lookup("RESOURCE_DEAD_LETTER_CAPACITY")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_DEAD_LETTER_CAPACITY);

        Self {
            handler_pool_size,
            mailbox,
            dead_letter_capacity,
        }
    }
}
