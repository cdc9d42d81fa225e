//! Adventure membership index.
//!
//! Derives, from raw participant and adventure records, the two sets the
//! policy engine consumes: the adventures a user participates in, and the
//! adventures open to everyone. The index holds no cache of its own; callers
//! rebuild it whenever the underlying collections are invalidated.

use std::collections::HashSet;

use crate::adventure::{Adventure, AdventureId, AdventureParticipant};

/// Membership sets for one user against the current adventure collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipIndex {
    /// Adventures the user participates in, regardless of adventure status.
    user_adventures: HashSet<AdventureId>,
    /// Adventures that are public and active, independent of the user.
    public_adventures: HashSet<AdventureId>,
}

impl MembershipIndex {
    /// Build the index for a user.
    ///
    /// `user_id` is `None` for an anonymous session, which participates in
    /// nothing but still sees public-active adventures. Duplicate
    /// participant rows collapse into the set.
    pub fn build(
        user_id: Option<&str>,
        participants: &[AdventureParticipant],
        adventures: &[Adventure],
    ) -> Self {
        let user_adventures = match user_id {
            Some(id) => participants
                .iter()
                .filter(|p| p.user_id == id)
                .map(|p| p.adventure_id.clone())
                .collect(),
            None => HashSet::new(),
        };

        let public_adventures = adventures
            .iter()
            .filter(|a| a.is_publicly_visible())
            .map(|a| a.id.clone())
            .collect();

        Self {
            user_adventures,
            public_adventures,
        }
    }

    /// An index with no memberships and no public adventures.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Adventures the user participates in.
    pub fn user_adventures(&self) -> &HashSet<AdventureId> {
        &self.user_adventures
    }

    /// Public-active adventures.
    pub fn public_adventures(&self) -> &HashSet<AdventureId> {
        &self.public_adventures
    }

    /// Whether the user participates in the given adventure.
    pub fn is_participant(&self, adventure_id: &str) -> bool {
        self.user_adventures.contains(adventure_id)
    }

    /// Whether the given adventure is public and active.
    pub fn is_public_active(&self, adventure_id: &str) -> bool {
        self.public_adventures.contains(adventure_id)
    }

    /// Whether the user's audience includes the given adventure, either
    /// through participation or because it is public and active.
    pub fn can_reach(&self, adventure_id: &str) -> bool {
        self.is_participant(adventure_id) || self.is_public_active(adventure_id)
    }

    /// The union of participant and public-active adventure ids.
    pub fn visible_adventure_ids(&self) -> HashSet<AdventureId> {
        self.user_adventures
            .union(&self.public_adventures)
            .cloned()
            .collect()
    }

    /// Whether adding `(adventure_id, user_id)` would duplicate an existing
    /// membership. Admin surfaces check this before issuing the write.
    pub fn would_duplicate(
        participants: &[AdventureParticipant],
        adventure_id: &str,
        user_id: &str,
    ) -> bool {
        participants
            .iter()
            .any(|p| p.adventure_id == adventure_id && p.user_id == user_id)
    }
}
