//! # Profile Store
//!
//! An actor that owns every [`Profile`] and a cloneable [`ProfileStore`] client that
//! resource handlers hold. The store is created once by the
//! [`ProfileSystem`](crate::lifecycle::ProfileSystem) and injected into the routes, so
//! the pooled request workers stay stateless.
//!
//! ```rust
//! use actor_stage::Stage;
//! use resource_sample::model::ProfileData;
//! use resource_sample::profile_store::{Defined, ProfileStore, ProfileStoreActor};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let stage = Stage::new("service");
//!     let store = ProfileStore::new(stage.actor_for("profiles", ProfileStoreActor::default()));
//!
//!     let data = ProfileData {
//!         twitter_account: "@jane".into(),
//!         linked_in_account: "jane".into(),
//!         website: "https://jane.dev".into(),
//!     };
//!     let defined = store.define("42", data)?.await_outcome().await;
//!     assert!(matches!(defined, Defined::Created(_)));
//!
//!     stage.shutdown().await?;
//!     Ok(())
//! }
//! ```

pub mod error;

pub use error::ProfileError;

use crate::model::{Profile, ProfileData};
use actor_stage::{Actor, ActorRef, Address, Completes};
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::{debug, info};

/// Outcome of defining a profile. An existing profile is never overwritten.
#[derive(Debug, Clone, PartialEq)]
pub enum Defined {
    Created(Profile),
    Existing(Profile),
}

#[derive(Debug, Default)]
pub struct ProfileStoreActor {
    profiles: HashMap<String, Profile>,
}

#[async_trait]
impl Actor for ProfileStoreActor {
    async fn started(&mut self, address: &Address) {
        info!(store = %address, profiles = self.profiles.len(), "Profile store ready");
    }
}

impl ProfileStoreActor {
    pub fn define(&mut self, user_id: String, data: ProfileData) -> Defined {
        if let Some(existing) = self.profiles.get(&user_id) {
            debug!(user_id = %user_id, "Profile already defined");
            return Defined::Existing(existing.clone());
        }
        let profile = Profile::from(user_id.clone(), data);
        self.profiles.insert(user_id, profile.clone());
        Defined::Created(profile)
    }

    pub fn profile_of(&self, user_id: &str) -> Option<Profile> {
        self.profiles.get(user_id).cloned()
    }
}

/// Checks a definition before it reaches the store.
pub fn validate(user_id: &str, data: &ProfileData) -> Result<(), ProfileError> {
    if user_id.is_empty() || !user_id.chars().all(|c| c.is_ascii_digit()) {
        return Err(ProfileError::InvalidUserId(user_id.to_string()));
    }
    let website = data.website.as_str();
    if !website.is_empty() && !website.starts_with("http://") && !website.starts_with("https://")
    {
        return Err(ProfileError::InvalidWebsite(website.to_string()));
    }
    Ok(())
}

/// Client for the profile store actor.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    actor: ActorRef<ProfileStoreActor>,
}

impl ProfileStore {
    pub fn new(actor: ActorRef<ProfileStoreActor>) -> Self {
        Self { actor }
    }

    /// Validates and stores a profile unless one exists for `user_id`.
    pub fn define(
        &self,
        user_id: impl Into<String>,
        data: ProfileData,
    ) -> Result<Completes<Defined>, ProfileError> {
        let user_id = user_id.into();
        validate(&user_id, &data)?;
        Ok(self
            .actor
            .ask("define(String, ProfileData)", move |store| store.define(user_id, data)))
    }

    pub fn profile_of(&self, user_id: impl Into<String>) -> Completes<Option<Profile>> {
        let user_id = user_id.into();
        self.actor
            .ask("profile_of(String)", move |store| store.profile_of(&user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actor_stage::mock::probe_for;

    fn data(website: &str) -> ProfileData {
        ProfileData {
            twitter_account: "@jane".into(),
            linked_in_account: "jane".into(),
            website: website.into(),
        }
    }

    #[tokio::test]
    async fn test_define_sends_one_message() {
        let (actor, mut probe) = probe_for::<ProfileStoreActor>("profiles");
        let store = ProfileStore::new(actor);

        let defined = store.define("7", data("https://jane.dev")).unwrap();
        assert!(!defined.is_completed());

        let mut double = ProfileStoreActor::default();
        let method = probe.deliver_next(&mut double).await;
        assert_eq!(method, Some("define(String, ProfileData)"));
        assert!(matches!(defined.outcome(), Some(Defined::Created(_))));
        assert!(double.profile_of("7").is_some());
    }

    #[tokio::test]
    async fn test_invalid_definition_never_reaches_store() {
        let (actor, mut probe) = probe_for::<ProfileStoreActor>("profiles");
        let store = ProfileStore::new(actor);

        assert_eq!(
            store.define("jane", data("")).unwrap_err(),
            ProfileError::InvalidUserId("jane".into())
        );
        assert_eq!(
            store.define("7", data("ftp://x")).unwrap_err(),
            ProfileError::InvalidWebsite("ftp://x".into())
        );
        assert!(probe.try_next().is_none());
    }

    #[test]
    fn test_existing_profile_is_kept() {
        let mut store = ProfileStoreActor::default();
        store.define("7".into(), data("https://first.dev"));
        let second = store.define("7".into(), data("https://second.dev"));
        match second {
            Defined::Existing(profile) => assert_eq!(profile.website, "https://first.dev"),
            other => panic!("expected existing profile, got {:?}", other),
        }
    }
}
