//! # Resource Sample App Library
//!
//! A user profile service built on `resource-dispatch`.
//!
//! - **[model]**: [`Profile`](model::Profile) and its wire form [`ProfileData`](model::ProfileData).
//! - **[profile_store]**: the actor that owns all profiles, and its client.
//! - **[profile_resource]**: typed profile routes and a dynamic health route.
//! - **[lifecycle]**: [`ProfileSystem`](lifecycle::ProfileSystem), which starts and stops everything.

pub mod lifecycle;
pub mod model;
pub mod profile_resource;
pub mod profile_store;
