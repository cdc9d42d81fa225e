//! # Fireside Core
//!
//! Content visibility and access-control core for the Fireside community
//! feed: the rules deciding, for a given user, which adventures (content
//! scopes) and which posts they may see, create into, or administer.
//!
//! ## Quick Start
//!
//! ```
//! use fireside_core::prelude::*;
//!
//! // Resolve the current account into a session.
//! let config = PolicyConfig::new().with_legacy_admins(["u_founder"]);
//! let session = Session::resolve(None, config); // logged out -> anonymous
//!
//! // Build the membership sets from already-fetched documents.
//! let index = MembershipIndex::build(session.user_id(), &[], &[]);
//!
//! // Narrow a collection down to what the session may see.
//! let visible = filter::visible_posts(&[], session.identity(), &index);
//! assert!(visible.is_empty());
//! ```
//!
//! ## Core Concepts
//!
//! ### Identity
//!
//! [`Identity::resolve`] normalizes a raw account document into a
//! role-bearing identity, falling back to the configured legacy allow-list
//! for documents that predate roles. A missing account resolves to the
//! [`Identity::Anonymous`] sentinel, never an error.
//!
//! ### Policy
//!
//! The [`policy`] module is pure predicate functions over already-fetched
//! data. View checks return reason-tagged [`ViewDecision`]s; the posting
//! gate reports exactly which adventure selections were blocked. Denials
//! are values, not errors - callers render them as empty states.
//!
//! ### Membership
//!
//! [`MembershipIndex`] derives two sets from raw participant and adventure
//! records: the adventures a user belongs to, and the public-active ones.
//! Everything the policy engine needs to answer visibility questions.
//!
//! ### Filtering
//!
//! The [`filter`] pipeline composes policy with free-text (case- and
//! accent-insensitive), tag, status, and adventure-scope refinement, then
//! applies the stable active-first / newest-first sort.
//!
//! ### Store
//!
//! All I/O goes through the [`DocumentStore`] contract; [`MemoryStore`]
//! implements it in memory for tests.

pub mod adventure;
pub mod config;
pub mod error;
pub mod filter;
pub mod identity;
pub mod membership;
pub mod policy;
pub mod post;
pub mod session;
pub mod store;

pub use adventure::{Adventure, AdventureId, AdventureParticipant, AdventureStatus, ParticipantId};
pub use config::PolicyConfig;
pub use error::{FiresideError, Result};
pub use filter::{ContentQuery, SearchFields, StatusFilter};
pub use identity::{Identity, RawAccount, Role, User, UserId};
pub use membership::MembershipIndex;
pub use policy::{AccessReason, PostGate, PostGateReason, ViewDecision};
pub use post::{Post, PostId};
pub use session::Session;
pub use store::{DocumentStore, MemoryStore, collection_or_empty, decode_documents};

/// Commonly used types, importable in one line.
pub mod prelude {
    pub use crate::adventure::{Adventure, AdventureParticipant, AdventureStatus};
    pub use crate::config::PolicyConfig;
    pub use crate::error::{FiresideError, Result};
    pub use crate::filter::{self, ContentQuery, StatusFilter};
    pub use crate::identity::{Identity, RawAccount, Role, User};
    pub use crate::membership::MembershipIndex;
    pub use crate::policy;
    pub use crate::post::Post;
    pub use crate::session::Session;
    pub use crate::store::{DocumentStore, MemoryStore};
}
