//! User profile document
//!
//! Profiles live in their own document (`user_profiles/{userId}`), separate
//! from the per-user application state. Saves are merge-patches: fields absent
//! from the patch are preserved.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Public profile of a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub avatar: String,
    pub email: String,
    pub join_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

impl UserProfile {
    /// Empty profile shell for `id`. Used when a merge-patch arrives for a
    /// document that does not exist yet.
    pub fn blank(id: Uuid) -> Self {
        Self {
            id,
            name: String::new(),
            username: String::new(),
            avatar: String::new(),
            email: String::new(),
            join_date: Utc::now(),
            phone_number: None,
        }
    }

    pub fn apply(&mut self, patch: &ProfilePatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(username) = &patch.username {
            self.username = username.clone();
        }
        if let Some(avatar) = &patch.avatar {
            self.avatar = avatar.clone();
        }
        if let Some(email) = &patch.email {
            self.email = email.clone();
        }
        if let Some(join_date) = &patch.join_date {
            self.join_date = *join_date;
        }
        if let Some(phone_number) = &patch.phone_number {
            self.phone_number = Some(phone_number.clone());
        }
    }
}

/// Partial profile write. `None` fields are left untouched in the stored
/// document (Firestore-style merge semantics).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

impl ProfilePatch {
    /// A patch carrying every field of `profile`, for first-time saves.
    pub fn full(profile: &UserProfile) -> Self {
        Self {
            name: Some(profile.name.clone()),
            username: Some(profile.username.clone()),
            avatar: Some(profile.avatar.clone()),
            email: Some(profile.email.clone()),
            join_date: Some(profile.join_date),
            phone_number: profile.phone_number.clone(),
        }
    }
}
