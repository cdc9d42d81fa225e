//! Adventure records - the content scopes of the feed.
//!
//! An adventure groups posts and participants. Visibility follows one rule:
//! a public flag only has meaning while the adventure is active; an inactive
//! adventure is admin-only no matter what, participants included.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::UserId;

/// Unique identifier for an adventure (document store id).
pub type AdventureId = String;

/// Unique identifier for a participant record (document store id).
pub type ParticipantId = String;

/// Lifecycle status of an adventure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdventureStatus {
    /// Open for its audience.
    #[default]
    Active,
    /// Archived; only admins can still see it.
    Inactive,
}

impl AdventureStatus {
    /// Whether the adventure is currently active.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Human-readable label for UI display.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for AdventureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// An adventure document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adventure {
    /// Document id.
    pub id: AdventureId,
    /// Title shown in the feed.
    pub title: String,
    /// Optional longer description.
    #[serde(default)]
    pub description: Option<String>,
    /// Lifecycle status.
    #[serde(default)]
    pub status: AdventureStatus,
    /// Whether the adventure is open to everyone while active.
    #[serde(default)]
    pub is_public: bool,
    /// The admin who created it.
    pub created_by: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last edit timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Adventure {
    /// Whether this adventure is visible to everyone.
    ///
    /// The public flag counts only while the adventure is active; an
    /// inactive public adventure behaves like a private inactive one.
    pub fn is_publicly_visible(&self) -> bool {
        self.is_public && self.status.is_active()
    }
}

/// A membership join record linking a user to an adventure.
///
/// The store enforces no uniqueness on `(adventure_id, user_id)`; the
/// membership index collapses duplicates on read, so a duplicate row can
/// never widen visibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdventureParticipant {
    /// Document id of the join record itself.
    pub id: ParticipantId,
    /// The adventure joined.
    pub adventure_id: AdventureId,
    /// The member.
    pub user_id: UserId,
    /// The admin who added them.
    pub added_by: UserId,
    /// When they were added.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adventure(status: AdventureStatus, is_public: bool) -> Adventure {
        Adventure {
            id: "a_1".to_string(),
            title: "The Sunken Vault".to_string(),
            description: None,
            status,
            is_public,
            created_by: "u_gm".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_public_requires_active() {
        assert!(adventure(AdventureStatus::Active, true).is_publicly_visible());
        assert!(!adventure(AdventureStatus::Inactive, true).is_publicly_visible());
        assert!(!adventure(AdventureStatus::Active, false).is_publicly_visible());
        assert!(!adventure(AdventureStatus::Inactive, false).is_publicly_visible());
    }

    #[test]
    fn test_status_defaults_active_on_legacy_documents() {
        // Early adventure documents predate the status field.
        let adventure: Adventure = serde_json::from_value(serde_json::json!({
            "id": "a_old",
            "title": "First Campaign",
            "created_by": "u_gm",
            "created_at": "2023-01-10T12:00:00Z",
            "updated_at": "2023-01-10T12:00:00Z",
        }))
        .unwrap();

        assert_eq!(adventure.status, AdventureStatus::Active);
        assert!(!adventure.is_public);
    }
}
