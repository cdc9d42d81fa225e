//! Post records.
//!
//! A post is scoped by its `adventures` list: an empty list marks a public
//! post visible to everyone, a non-empty list restricts the post to the
//! audiences of those adventures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::adventure::AdventureId;
use crate::identity::UserId;

/// Unique identifier for a post (document store id).
pub type PostId = String;

/// A post document.
///
/// All collection fields default to empty so legacy or partially-written
/// documents decode instead of failing: a post whose `adventures` field is
/// missing reads as unscoped, exactly how the feed treats it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Document id.
    pub id: PostId,
    /// The user who created the post.
    pub creator: UserId,
    /// Title shown in the feed.
    pub title: String,
    /// Caption text under the media.
    #[serde(default)]
    pub captions: String,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Adventure scopes; empty means public.
    #[serde(default)]
    pub adventures: Vec<AdventureId>,
    /// Users who liked the post.
    #[serde(default)]
    pub likes: Vec<UserId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Whether this post is public (no adventure scopes).
    pub fn is_public(&self) -> bool {
        self.adventures.is_empty()
    }

    /// Whether this post is scoped to the given adventure.
    pub fn scoped_to(&self, adventure_id: &str) -> bool {
        self.adventures.iter().any(|a| a == adventure_id)
    }

    /// Whether the given user has liked this post.
    pub fn is_liked_by(&self, user_id: &str) -> bool {
        self.likes.iter().any(|u| u == user_id)
    }

    /// Number of likes.
    pub fn like_count(&self) -> usize {
        self.likes.len()
    }

    /// Toggle a like for the given user.
    ///
    /// Likes behave as a set: liking twice removes the like, and a user
    /// never appears in the list more than once.
    pub fn toggle_like(&mut self, user_id: impl Into<UserId>) {
        let user_id = user_id.into();
        if let Some(pos) = self.likes.iter().position(|u| *u == user_id) {
            self.likes.remove(pos);
        } else {
            self.likes.push(user_id);
        }
    }
}
