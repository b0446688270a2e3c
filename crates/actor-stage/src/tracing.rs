//! # Observability & Tracing
//!
//! Structured logging for every actor on a stage, built on the `tracing` crate.
//!
//! ## What Gets Traced
//!
//! - **Actor lifecycle** (`info`): `Actor started` and `Actor stopped`, with the actor's
//!   type, address and the number of messages processed.
//! - **Deliveries** (`debug`): one `Deliver` event per message with its method
//!   representation.
//! - **Dead letters** (`warn`): the intended receiver, the method and the reason.
//! - **Panics** (`error`): the method that panicked and the panic message.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run      # lifecycle only
//! RUST_LOG=debug cargo run     # every delivery
//! ```
//!
//! The compact format hides the module prefix (`with_target(false)`); the structured
//! `actor_type` and `actor` fields identify the source instead.
//!
//! ```text
//! INFO Actor started actor_type="ResourceRequestHandlerActor" actor=profile-0#3
//! DEBUG Deliver actor_type="ResourceRequestHandlerActor" actor=profile-0#3 method="handle_for(Context, MappedParameters, RequestHandler)"
//! WARN Dead letter actor=profile-0#3 method="handle_for(Context, MappedParameters, RequestHandler)" reason=Actor stopped
//! ```

pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // actor_type and actor fields identify the source
        .compact()
        .init();
}
