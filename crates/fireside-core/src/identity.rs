//! User identity resolution.
//!
//! Normalizes a raw account document from the auth provider into a
//! role-bearing identity. Resolution is a pure mapping: an absent account
//! yields the [`Identity::Anonymous`] sentinel, never an error.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::PolicyConfig;

/// Unique identifier for a user (document store id).
pub type UserId = String;

/// Role of a user account.
///
/// Assigned once at signup (default [`Role::User`]); only an admin may
/// change another user's role afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full administrative rights over adventures, posts, and roles.
    Admin,
    /// Regular member.
    #[default]
    User,
}

impl Role {
    /// Whether this role carries administrative rights.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::User => write!(f, "user"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Raw account document as stored by the auth provider.
///
/// Accounts created before roles existed carry no `role` field, so the
/// field is optional here; [`Identity::resolve`] applies the fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAccount {
    /// Document id of the account.
    pub id: UserId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Unique handle.
    #[serde(default)]
    pub username: String,
    /// Contact email.
    #[serde(default)]
    pub email: String,
    /// Stored role, absent on legacy documents.
    #[serde(default)]
    pub role: Option<Role>,
    /// Last activity timestamp, written by the presence tracker.
    #[serde(default)]
    pub last_seen: Option<DateTime<Utc>>,
}

/// A resolved user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Document id of the account.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Unique handle.
    pub username: String,
    /// Contact email.
    pub email: String,
    /// Effective role after legacy fallback.
    pub role: Role,
    /// Last activity timestamp, written by the presence tracker.
    pub last_seen: Option<DateTime<Utc>>,
}

/// The identity of the current session: a resolved user, or anonymous.
#[derive(Debug, Clone, PartialEq)]
pub enum Identity {
    /// An authenticated, resolved user.
    User(User),
    /// No account present (logged out, or session expired).
    Anonymous,
}

impl Identity {
    /// Resolve a raw account document into a typed identity.
    ///
    /// If the document lacks a `role` field the role is derived from the
    /// legacy admin allow-list in `config`, defaulting to [`Role::User`].
    /// An absent account resolves to [`Identity::Anonymous`].
    pub fn resolve(raw: Option<&RawAccount>, config: &PolicyConfig) -> Self {
        let Some(account) = raw else {
            return Self::Anonymous;
        };

        let role = account.role.unwrap_or(if config.is_legacy_admin(&account.id) {
            Role::Admin
        } else {
            Role::User
        });

        Self::User(User {
            id: account.id.clone(),
            name: account.name.clone(),
            username: account.username.clone(),
            email: account.email.clone(),
            role,
            last_seen: account.last_seen,
        })
    }

    /// Whether this identity belongs to an authenticated user.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::User(_))
    }

    /// Whether this identity carries administrative rights.
    pub fn is_admin(&self) -> bool {
        match self {
            Self::User(user) => user.role.is_admin(),
            Self::Anonymous => false,
        }
    }

    /// The resolved user, if authenticated.
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::User(user) => Some(user),
            Self::Anonymous => None,
        }
    }

    /// The user id, if authenticated.
    pub fn id(&self) -> Option<&str> {
        self.user().map(|u| u.id.as_str())
    }

    /// Display name: the user's name, falling back to their handle.
    pub fn display_name(&self) -> &str {
        match self {
            Self::User(user) if !user.name.is_empty() => &user.name,
            Self::User(user) => &user.username,
            Self::Anonymous => "anonymous",
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
