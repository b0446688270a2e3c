use serde::{Deserialize, Serialize};

/// A user's public profile as stored by the
/// [`ProfileStoreActor`](crate::profile_store::ProfileStoreActor).
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub user_id: String,
    pub twitter_account: String,
    pub linked_in_account: String,
    pub website: String,
}

/// Wire form of a profile, used for request and response bodies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileData {
    pub twitter_account: String,
    pub linked_in_account: String,
    pub website: String,
}

impl Profile {
    pub fn from(user_id: impl Into<String>, data: ProfileData) -> Self {
        Self {
            user_id: user_id.into(),
            twitter_account: data.twitter_account,
            linked_in_account: data.linked_in_account,
            website: data.website,
        }
    }

    /// Path this profile is served from.
    pub fn location(&self) -> String {
        profile_location(&self.user_id)
    }
}

impl From<&Profile> for ProfileData {
    fn from(profile: &Profile) -> Self {
        Self {
            twitter_account: profile.twitter_account.clone(),
            linked_in_account: profile.linked_in_account.clone(),
            website: profile.website.clone(),
        }
    }
}

pub fn profile_location(user_id: &str) -> String {
    format!("/users/{}/profile", user_id)
}
