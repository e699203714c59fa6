//! References to users that appear inside listings and orders.

use crate::ids::UserId;
use serde::{Deserialize, Serialize};

/// A buyer or seller reference.
///
/// The backend sends either a bare id or a populated user object depending on
/// the endpoint, so both shapes are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Party {
    /// Populated user profile.
    Profile(PartyProfile),
    /// Bare user id.
    Id(UserId),
}

/// The public fields of a populated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyProfile {
    /// User ID.
    #[serde(rename = "_id")]
    pub id: UserId,
    /// Display name.
    #[serde(default)]
    pub full_name: String,
    /// Email address.
    #[serde(default)]
    pub email: String,
}

impl Party {
    /// Get the referenced user's id.
    pub fn id(&self) -> &UserId {
        match self {
            Party::Profile(p) => &p.id,
            Party::Id(id) => id,
        }
    }

    /// Get a display name, falling back to the id.
    pub fn display_name(&self) -> &str {
        match self {
            Party::Profile(p) if !p.full_name.is_empty() => &p.full_name,
            Party::Profile(p) => p.id.as_str(),
            Party::Id(id) => id.as_str(),
        }
    }
}

impl From<UserId> for Party {
    fn from(id: UserId) -> Self {
        Party::Id(id)
    }
}
