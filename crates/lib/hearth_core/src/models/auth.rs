//! Identity and session models.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::geo::GeoPoint;
use crate::geo::Located;

/// Default role for feed members.
pub const MEMBER_ROLE: &str = "member";
/// Role of identities that ask for help.
pub const ELDER_ROLE: &str = "elder";
/// Role of identities matched to help requests.
pub const HELPER_ROLE: &str = "helper";

/// Independent identity namespaces. Emails are unique per realm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Realm {
    /// Social feed members, keyed by a generated opaque id.
    Feed,
    /// Neighbour-help identities, keyed by their email.
    Neighbourhood,
}

impl Realm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Realm::Feed => "feed",
            Realm::Neighbourhood => "neighbourhood",
        }
    }
}

/// Stored identity, including the password hash.
///
/// Not `Serialize`: use [`PublicIdentity`] for anything that
/// leaves the process.
#[derive(Clone, PartialEq)]
pub struct Identity {
    pub id: String,
    pub realm: Realm,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub location: Option<GeoPoint>,
    pub reward: i64,
    pub created_at: DateTime<Utc>,
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("id", &self.id)
            .field("realm", &self.realm)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("role", &self.role)
            .field("location", &self.location)
            .field("reward", &self.reward)
            .field("created_at", &self.created_at)
            .finish()
    }
}

impl Identity {
    pub fn to_public(&self) -> PublicIdentity {
        PublicIdentity {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role.clone(),
            location: self.location,
            reward: self.reward,
            created_at: self.created_at,
        }
    }
}

impl Located for Identity {
    fn location(&self) -> Option<GeoPoint> {
        self.location
    }
}

/// Identity without credentials, safe to serialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicIdentity {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub location: Option<GeoPoint>,
    pub reward: i64,
    pub created_at: DateTime<Utc>,
}

/// Signup input. The plaintext password is consumed by hashing.
#[derive(Clone, Default)]
pub struct NewIdentity {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Empty means the realm default.
    pub role: String,
    pub location: Option<GeoPoint>,
}

/// JWT claims embedded in session tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject — identity ID (standard JWT `sub` claim).
    pub sub: String,
    pub email: String,
    pub role: String,
    /// Expiry (unix timestamp).
    pub exp: i64,
    /// Issued at (unix timestamp).
    pub iat: i64,
}

/// Normalize an email for storage and lookup: trimmed, lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
