//! Document store contract and in-memory implementation.
//!
//! The core owns no persistence: adventures, posts, participants, and users
//! live in a hosted document database reached through the [`DocumentStore`]
//! trait. [`MemoryStore`] implements the contract in memory for tests and
//! for driving the presence tracker without a network.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::warn;

use crate::adventure::{Adventure, AdventureParticipant};
use crate::error::{FiresideError, Result};
use crate::identity::{User, UserId};
use crate::post::Post;

/// Async contract with the hosted document store.
///
/// Each call either resolves with documents or rejects with
/// [`FiresideError::Store`]; the core treats the transport as a black box
/// and never retries on its own.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// List every adventure document.
    async fn list_adventures(&self) -> Result<Vec<Adventure>>;

    /// List participant records, optionally restricted to one adventure.
    async fn list_participants(
        &self,
        adventure_id: Option<&str>,
    ) -> Result<Vec<AdventureParticipant>>;

    /// List every post document.
    async fn list_posts(&self) -> Result<Vec<Post>>;

    /// Fetch a single user.
    async fn get_user(&self, id: &str) -> Result<User>;

    /// Write a user's last-seen timestamp.
    ///
    /// Called exclusively by the presence tracker; last-write-wins races
    /// across sessions are acceptable since the value is advisory.
    async fn touch_user(&self, id: &str, seen_at: DateTime<Utc>) -> Result<()>;

    /// Replace a post document (likes, edits).
    async fn update_post(&self, post: &Post) -> Result<()>;
}

/// Decode raw JSON documents leniently.
///
/// A document that fails to decode is skipped with a warning rather than
/// failing the whole listing; visibility stays fail-closed because a
/// skipped document is simply never shown.
pub fn decode_documents<T: DeserializeOwned>(values: Vec<serde_json::Value>) -> Vec<T> {
    values
        .into_iter()
        .filter_map(|value| match serde_json::from_value(value) {
            Ok(document) => Some(document),
            Err(e) => {
                warn!(error = %e, "Skipping malformed document");
                None
            }
        })
        .collect()
}

/// Collapse a failed listing into an empty collection.
///
/// Visibility is fail-closed: when a fetch rejects, the feed renders
/// nothing rather than guessing. The error is logged and swallowed here;
/// retryable transport UI is the caller's concern.
pub fn collection_or_empty<T>(result: Result<Vec<T>>) -> Vec<T> {
    match result {
        Ok(items) => items,
        Err(e) => {
            warn!(error = %e, "Listing failed, rendering empty collection");
            Vec::new()
        }
    }
}

/// In-memory [`DocumentStore`] for tests.
///
/// Collections are seeded through the `insert_*` methods. Writes can be
/// made to fail on demand, and every attempted timestamp write is counted,
/// which is what the presence throttle tests observe.
#[derive(Default)]
pub struct MemoryStore {
    adventures: RwLock<Vec<Adventure>>,
    participants: RwLock<Vec<AdventureParticipant>>,
    posts: RwLock<Vec<Post>>,
    users: RwLock<HashMap<UserId, User>>,
    fail_writes: AtomicBool,
    touch_count: AtomicU64,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an adventure document.
    pub async fn insert_adventure(&self, adventure: Adventure) {
        self.adventures.write().await.push(adventure);
    }

    /// Seed a participant record.
    pub async fn insert_participant(&self, participant: AdventureParticipant) {
        self.participants.write().await.push(participant);
    }

    /// Seed a post document.
    pub async fn insert_post(&self, post: Post) {
        self.posts.write().await.push(post);
    }

    /// Seed a user document.
    pub async fn insert_user(&self, user: User) {
        self.users.write().await.insert(user.id.clone(), user);
    }

    /// Make every subsequent write fail with a store error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of timestamp writes attempted so far.
    pub fn touch_count(&self) -> u64 {
        self.touch_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list_adventures(&self) -> Result<Vec<Adventure>> {
        Ok(self.adventures.read().await.clone())
    }

    async fn list_participants(
        &self,
        adventure_id: Option<&str>,
    ) -> Result<Vec<AdventureParticipant>> {
        let participants = self.participants.read().await;
        Ok(match adventure_id {
            Some(id) => participants
                .iter()
                .filter(|p| p.adventure_id == id)
                .cloned()
                .collect(),
            None => participants.clone(),
        })
    }

    async fn list_posts(&self) -> Result<Vec<Post>> {
        Ok(self.posts.read().await.clone())
    }

    async fn get_user(&self, id: &str) -> Result<User> {
        self.users
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| FiresideError::UserNotFound { id: id.to_string() })
    }

    async fn touch_user(&self, id: &str, seen_at: DateTime<Utc>) -> Result<()> {
        self.touch_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(FiresideError::Store("write rejected".to_string()));
        }
        let mut users = self.users.write().await;
        let user = users
            .get_mut(id)
            .ok_or_else(|| FiresideError::UserNotFound { id: id.to_string() })?;
        user.last_seen = Some(seen_at);
        Ok(())
    }

    async fn update_post(&self, post: &Post) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(FiresideError::Store("write rejected".to_string()));
        }
        let mut posts = self.posts.write().await;
        let existing = posts
            .iter_mut()
            .find(|p| p.id == post.id)
            .ok_or_else(|| FiresideError::PostNotFound {
                id: post.id.clone(),
            })?;
        *existing = post.clone();
        Ok(())
    }
}
