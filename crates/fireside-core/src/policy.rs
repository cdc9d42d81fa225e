//! The content visibility policy engine.
//!
//! Pure predicate functions deciding what a given identity may see, create,
//! or administer. Every function here is total and side-effect free: it
//! consumes already-fetched data, performs no I/O, and never fails - a
//! denial is a value, not an error.
//!
//! View checks return a [`ViewDecision`] carrying a reason tag rather than a
//! bare boolean, so tests and debug surfaces can see *why* an item was
//! granted or hidden.
//!
//! # Visibility rules
//!
//! - Admins see everything.
//! - An adventure is visible when it is active and either public or one of
//!   the user's memberships. Inactive adventures are admin-only, even for
//!   participants.
//! - A post with no adventure scopes is public. A scoped post is visible
//!   when any of its adventures is in the user's audience (membership or
//!   public-active).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::adventure::{Adventure, AdventureId};
use crate::config::PolicyConfig;
use crate::identity::Identity;
use crate::membership::MembershipIndex;
use crate::post::Post;

/// Why a view check granted or denied access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessReason {
    /// Granted: the identity is an admin.
    Admin,
    /// Granted: the adventure is public and active.
    PublicAdventure,
    /// Granted: the post carries no adventure scopes.
    PublicPost,
    /// Granted: the user participates in a granting adventure.
    Participant,
    /// Denied: the adventure is inactive and the identity is not an admin.
    Inactive,
    /// Denied: nothing grants access.
    NoAccess,
}

impl AccessReason {
    /// Human-readable label for UI display and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::PublicAdventure => "public_adventure",
            Self::PublicPost => "public_post",
            Self::Participant => "participant",
            Self::Inactive => "inactive",
            Self::NoAccess => "no_access",
        }
    }
}

impl fmt::Display for AccessReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A reason-tagged view decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewDecision {
    allowed: bool,
    reason: AccessReason,
}

impl ViewDecision {
    fn grant(reason: AccessReason) -> Self {
        Self {
            allowed: true,
            reason,
        }
    }

    fn deny(reason: AccessReason) -> Self {
        Self {
            allowed: false,
            reason,
        }
    }

    /// Whether access is granted.
    pub fn allowed(&self) -> bool {
        self.allowed
    }

    /// Why access was granted or denied.
    pub fn reason(&self) -> AccessReason {
        self.reason
    }
}

/// Whether the identity carries administrative rights.
pub fn is_admin(identity: &Identity) -> bool {
    identity.is_admin()
}

/// Whether the identity may view the given adventure.
///
/// The inactive check comes before the membership check: a participant of
/// an inactive adventure is still denied, with [`AccessReason::Inactive`].
pub fn can_view_adventure(
    identity: &Identity,
    adventure: &Adventure,
    index: &MembershipIndex,
) -> ViewDecision {
    if identity.is_admin() {
        return ViewDecision::grant(AccessReason::Admin);
    }
    if !adventure.status.is_active() {
        return ViewDecision::deny(AccessReason::Inactive);
    }
    if adventure.is_public {
        return ViewDecision::grant(AccessReason::PublicAdventure);
    }
    if index.is_participant(&adventure.id) {
        return ViewDecision::grant(AccessReason::Participant);
    }
    ViewDecision::deny(AccessReason::NoAccess)
}

/// Whether the identity may view the given post.
///
/// Membership is reported ahead of a public-adventure grant when a post
/// qualifies both ways; the outcome is identical either way.
pub fn can_view_post(identity: &Identity, post: &Post, index: &MembershipIndex) -> ViewDecision {
    if identity.is_admin() {
        return ViewDecision::grant(AccessReason::Admin);
    }
    if post.is_public() {
        return ViewDecision::grant(AccessReason::PublicPost);
    }
    if post.adventures.iter().any(|a| index.is_participant(a)) {
        return ViewDecision::grant(AccessReason::Participant);
    }
    if post.adventures.iter().any(|a| index.is_public_active(a)) {
        return ViewDecision::grant(AccessReason::PublicAdventure);
    }
    ViewDecision::deny(AccessReason::NoAccess)
}

// ============================================================
// Administrative capabilities (admin-exclusive, no delegation)
// ============================================================

/// Whether the identity may create adventures.
pub fn can_create_adventure(identity: &Identity) -> bool {
    identity.is_admin()
}

/// Whether the identity may edit adventures.
pub fn can_edit_adventure(identity: &Identity) -> bool {
    identity.is_admin()
}

/// Whether the identity may delete adventures.
pub fn can_delete_adventure(identity: &Identity) -> bool {
    identity.is_admin()
}

/// Whether the identity may add or remove adventure participants.
pub fn can_manage_participants(identity: &Identity) -> bool {
    identity.is_admin()
}

/// Whether the identity may flip an adventure's public flag.
pub fn can_toggle_adventure_visibility(identity: &Identity) -> bool {
    identity.is_admin()
}

/// Whether the identity may change another user's role.
pub fn can_change_role(identity: &Identity) -> bool {
    identity.is_admin()
}

// ============================================================
// Posting capabilities
// ============================================================

/// Whether the identity may create posts.
///
/// Admins always may; a handful of legacy non-admin publishers keep the
/// right through the allow-list in [`PolicyConfig`].
pub fn can_create_post(identity: &Identity, config: &PolicyConfig) -> bool {
    match identity {
        Identity::User(user) => user.role.is_admin() || config.is_legacy_publisher(&user.id),
        Identity::Anonymous => false,
    }
}

/// Whether the identity may create unscoped (public) posts.
///
/// Same rule as [`can_create_post`]: the legacy publishers were grandfathered
/// into the full posting right, public posts included.
pub fn can_create_public_post(identity: &Identity, config: &PolicyConfig) -> bool {
    can_create_post(identity, config)
}

/// Whether the identity may edit the given post (creator or admin).
pub fn can_edit_post(identity: &Identity, post: &Post) -> bool {
    identity.is_admin() || identity.id() == Some(post.creator.as_str())
}

/// Whether the identity may delete the given post (creator or admin).
pub fn can_delete_post(identity: &Identity, post: &Post) -> bool {
    can_edit_post(identity, post)
}

/// Whether the identity may like the given post.
///
/// Any authenticated user who can view a post may toggle a like on it.
pub fn can_like_post(identity: &Identity, post: &Post, index: &MembershipIndex) -> bool {
    identity.is_authenticated() && can_view_post(identity, post, index).allowed()
}

/// Why a posting attempt was allowed or refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostGateReason {
    /// Allowed: the identity is an admin.
    Admin,
    /// Allowed: every selected adventure is in the user's audience.
    HasAccess,
    /// Refused: at least one selected adventure is out of reach.
    NoAccessToAdventures,
}

/// Decision for posting into a set of adventures.
///
/// On refusal, `blocked` lists exactly the offending adventure ids so the
/// caller can explain which selections were invalid. Callers must refuse
/// the whole submission; there is no partial posting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostGate {
    allowed: bool,
    reason: PostGateReason,
    blocked: Vec<AdventureId>,
}

impl PostGate {
    fn allow(reason: PostGateReason) -> Self {
        Self {
            allowed: true,
            reason,
            blocked: Vec::new(),
        }
    }

    fn refuse(blocked: Vec<AdventureId>) -> Self {
        Self {
            allowed: false,
            reason: PostGateReason::NoAccessToAdventures,
            blocked,
        }
    }

    /// Whether the whole submission may proceed.
    pub fn allowed(&self) -> bool {
        self.allowed
    }

    /// Why the submission was allowed or refused.
    pub fn reason(&self) -> PostGateReason {
        self.reason
    }

    /// The adventure ids that blocked the submission (empty when allowed).
    pub fn blocked(&self) -> &[AdventureId] {
        &self.blocked
    }
}

/// Whether the identity may post into every one of the selected adventures.
///
/// Admins post anywhere. For everyone else each selected adventure must be
/// in the user's audience (membership or public-active); otherwise the gate
/// refuses with the full list of blocked ids. An empty selection is a
/// public post and passes trivially - whether the identity may post at all
/// is [`can_create_post`]'s question, not this one's.
pub fn can_post_in_adventures(
    identity: &Identity,
    selected: &[AdventureId],
    index: &MembershipIndex,
) -> PostGate {
    if identity.is_admin() {
        return PostGate::allow(PostGateReason::Admin);
    }

    let blocked: Vec<AdventureId> = selected
        .iter()
        .filter(|a| !index.can_reach(a))
        .cloned()
        .collect();

    if blocked.is_empty() {
        PostGate::allow(PostGateReason::HasAccess)
    } else {
        PostGate::refuse(blocked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adventure::{AdventureParticipant, AdventureStatus};
    use crate::identity::{Role, User};
    use chrono::Utc;

    fn user(id: &str, role: Role) -> Identity {
        Identity::User(User {
            id: id.to_string(),
            name: format!("User {id}"),
            username: id.to_string(),
            email: format!("{id}@example.com"),
            role,
            last_seen: None,
        })
    }

    fn adventure(id: &str, status: AdventureStatus, is_public: bool) -> Adventure {
        Adventure {
            id: id.to_string(),
            title: format!("Adventure {id}"),
            description: None,
            status,
            is_public,
            created_by: "u_gm".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn post(id: &str, creator: &str, adventures: &[&str]) -> Post {
        Post {
            id: id.to_string(),
            creator: creator.to_string(),
            title: format!("Post {id}"),
            captions: String::new(),
            tags: vec![],
            adventures: adventures.iter().map(|s| s.to_string()).collect(),
            likes: vec![],
            created_at: Utc::now(),
        }
    }

    fn index_for(
        user_id: &str,
        memberships: &[&str],
        adventures: &[Adventure],
    ) -> MembershipIndex {
        let participants: Vec<AdventureParticipant> = memberships
            .iter()
            .enumerate()
            .map(|(i, a)| AdventureParticipant {
                id: format!("m_{i}"),
                adventure_id: a.to_string(),
                user_id: user_id.to_string(),
                added_by: "u_gm".to_string(),
                created_at: Utc::now(),
            })
            .collect();
        MembershipIndex::build(Some(user_id), &participants, adventures)
    }

    // ============================================================
    // Adventure visibility
    // ============================================================

    #[test]
    fn test_admin_sees_every_adventure() {
        let admin = user("u_admin", Role::Admin);
        let index = MembershipIndex::empty();

        for status in [AdventureStatus::Active, AdventureStatus::Inactive] {
            for is_public in [true, false] {
                let decision =
                    can_view_adventure(&admin, &adventure("a", status, is_public), &index);
                assert!(decision.allowed());
                assert_eq!(decision.reason(), AccessReason::Admin);
            }
        }
    }

    #[test]
    fn test_inactive_adventure_denied_even_for_participants() {
        let member = user("u_1", Role::User);
        let a = adventure("a_1", AdventureStatus::Inactive, false);
        let index = index_for("u_1", &["a_1"], &[]);

        let decision = can_view_adventure(&member, &a, &index);
        assert!(!decision.allowed());
        assert_eq!(decision.reason(), AccessReason::Inactive);
    }

    #[test]
    fn test_public_active_adventure_visible_to_strangers() {
        let stranger = user("u_2", Role::User);
        let a = adventure("a_1", AdventureStatus::Active, true);

        let decision = can_view_adventure(&stranger, &a, &MembershipIndex::empty());
        assert!(decision.allowed());
        assert_eq!(decision.reason(), AccessReason::PublicAdventure);
    }

    #[test]
    fn test_private_adventure_needs_membership() {
        let a = adventure("a_1", AdventureStatus::Active, false);

        let member = user("u_1", Role::User);
        let index = index_for("u_1", &["a_1"], &[]);
        let decision = can_view_adventure(&member, &a, &index);
        assert!(decision.allowed());
        assert_eq!(decision.reason(), AccessReason::Participant);

        let stranger = user("u_2", Role::User);
        let decision = can_view_adventure(&stranger, &a, &MembershipIndex::empty());
        assert!(!decision.allowed());
        assert_eq!(decision.reason(), AccessReason::NoAccess);
    }

    // ============================================================
    // Post visibility
    // ============================================================

    #[test]
    fn test_private_adventure_post_scenario() {
        // A1 is active and private; U1 participates, U2 does not.
        let a1 = adventure("a_1", AdventureStatus::Active, false);
        let p1 = post("p_1", "u_gm", &["a_1"]);

        let u1_index = index_for("u_1", &["a_1"], std::slice::from_ref(&a1));
        let decision = can_view_post(&user("u_1", Role::User), &p1, &u1_index);
        assert!(decision.allowed());
        assert_eq!(decision.reason(), AccessReason::Participant);

        let u2_index = index_for("u_2", &[], std::slice::from_ref(&a1));
        let decision = can_view_post(&user("u_2", Role::User), &p1, &u2_index);
        assert!(!decision.allowed());
        assert_eq!(decision.reason(), AccessReason::NoAccess);

        let decision = can_view_post(&user("u_admin", Role::Admin), &p1, &u2_index);
        assert!(decision.allowed());
        assert_eq!(decision.reason(), AccessReason::Admin);
    }

    #[test]
    fn test_public_adventure_post_scenario() {
        // A2 is active and public with no participants.
        let a2 = adventure("a_2", AdventureStatus::Active, true);
        let p2 = post("p_2", "u_gm", &["a_2"]);

        let index = index_for("u_any", &[], std::slice::from_ref(&a2));
        let decision = can_view_post(&user("u_any", Role::User), &p2, &index);
        assert!(decision.allowed());
        assert_eq!(decision.reason(), AccessReason::PublicAdventure);
    }

    #[test]
    fn test_unscoped_post_visible_to_everyone() {
        let p = post("p_1", "u_gm", &[]);
        let index = MembershipIndex::empty();

        for identity in [
            user("u_1", Role::User),
            user("u_admin", Role::Admin),
            Identity::Anonymous,
        ] {
            let decision = can_view_post(&identity, &p, &index);
            assert!(decision.allowed(), "{identity:?} should see a public post");
        }
    }

    #[test]
    fn test_scoped_post_hidden_when_scope_went_inactive() {
        // The post's only scope is a public adventure that has been
        // archived; the public grant dies with it.
        let archived = adventure("a_1", AdventureStatus::Inactive, true);
        let p = post("p_1", "u_gm", &["a_1"]);
        let index = index_for("u_1", &[], std::slice::from_ref(&archived));

        let decision = can_view_post(&user("u_1", Role::User), &p, &index);
        assert!(!decision.allowed());
        assert_eq!(decision.reason(), AccessReason::NoAccess);
    }

    // ============================================================
    // Capabilities
    // ============================================================

    #[test]
    fn test_adventure_administration_is_admin_only() {
        let admin = user("u_admin", Role::Admin);
        let member = user("u_1", Role::User);

        for check in [
            can_create_adventure,
            can_edit_adventure,
            can_delete_adventure,
            can_manage_participants,
            can_toggle_adventure_visibility,
            can_change_role,
        ] {
            assert!(check(&admin));
            assert!(!check(&member));
            assert!(!check(&Identity::Anonymous));
        }
    }

    #[test]
    fn test_post_creation_honors_publisher_allow_list() {
        let config = PolicyConfig::new().with_legacy_publishers(["u_bard"]);

        assert!(can_create_post(&user("u_admin", Role::Admin), &config));
        assert!(can_create_post(&user("u_bard", Role::User), &config));
        assert!(!can_create_post(&user("u_1", Role::User), &config));
        assert!(!can_create_post(&Identity::Anonymous, &config));

        assert!(can_create_public_post(&user("u_bard", Role::User), &config));
    }

    #[test]
    fn test_post_edit_is_creator_or_admin() {
        let p = post("p_1", "u_bard", &[]);

        assert!(can_edit_post(&user("u_bard", Role::User), &p));
        assert!(can_edit_post(&user("u_admin", Role::Admin), &p));
        assert!(!can_edit_post(&user("u_other", Role::User), &p));
        assert!(!can_delete_post(&Identity::Anonymous, &p));
    }

    #[test]
    fn test_like_requires_auth_and_visibility() {
        let a = adventure("a_1", AdventureStatus::Active, false);
        let p = post("p_1", "u_gm", &["a_1"]);

        let member_index = index_for("u_1", &["a_1"], std::slice::from_ref(&a));
        assert!(can_like_post(&user("u_1", Role::User), &p, &member_index));

        let stranger_index = MembershipIndex::empty();
        assert!(!can_like_post(&user("u_2", Role::User), &p, &stranger_index));

        // Anonymous can see public posts but cannot like them.
        let public_post = post("p_2", "u_gm", &[]);
        assert!(!can_like_post(&Identity::Anonymous, &public_post, &stranger_index));
    }

    // ============================================================
    // Posting gate
    // ============================================================

    #[test]
    fn test_admin_posts_anywhere() {
        let gate = can_post_in_adventures(
            &user("u_admin", Role::Admin),
            &["a_1".to_string(), "a_2".to_string()],
            &MembershipIndex::empty(),
        );
        assert!(gate.allowed());
        assert_eq!(gate.reason(), PostGateReason::Admin);
        assert!(gate.blocked().is_empty());
    }

    #[test]
    fn test_gate_lists_every_blocked_adventure() {
        let public = adventure("a_pub", AdventureStatus::Active, true);
        let index = index_for("u_1", &["a_mine"], std::slice::from_ref(&public));

        let selected = vec![
            "a_mine".to_string(),
            "a_pub".to_string(),
            "a_secret".to_string(),
            "a_other".to_string(),
        ];
        let gate = can_post_in_adventures(&user("u_1", Role::User), &selected, &index);

        assert!(!gate.allowed());
        assert_eq!(gate.reason(), PostGateReason::NoAccessToAdventures);
        assert_eq!(gate.blocked(), ["a_secret".to_string(), "a_other".to_string()]);
    }

    #[test]
    fn test_gate_allows_reachable_selection() {
        let public = adventure("a_pub", AdventureStatus::Active, true);
        let index = index_for("u_1", &["a_mine"], std::slice::from_ref(&public));

        let selected = vec!["a_mine".to_string(), "a_pub".to_string()];
        let gate = can_post_in_adventures(&user("u_1", Role::User), &selected, &index);

        assert!(gate.allowed());
        assert_eq!(gate.reason(), PostGateReason::HasAccess);
    }

    #[test]
    fn test_empty_selection_passes_the_gate() {
        let gate = can_post_in_adventures(
            &user("u_1", Role::User),
            &[],
            &MembershipIndex::empty(),
        );
        assert!(gate.allowed());
    }

    #[test]
    fn test_reason_labels() {
        assert_eq!(AccessReason::PublicAdventure.label(), "public_adventure");
        assert_eq!(AccessReason::NoAccess.to_string(), "no_access");
    }
}
