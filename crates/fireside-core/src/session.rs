//! Session context.
//!
//! An explicit value tying the resolved identity to the policy
//! configuration, passed to whoever needs to make policy decisions. There
//! is no global session singleton; tests run as many independent sessions
//! as they like.

use crate::config::PolicyConfig;
use crate::identity::{Identity, RawAccount};
use crate::policy;

/// The current session: who is acting, under which policy configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    identity: Identity,
    config: PolicyConfig,
}

impl Session {
    /// Create a session from an already-resolved identity.
    pub fn new(identity: Identity, config: PolicyConfig) -> Self {
        Self { identity, config }
    }

    /// Resolve a raw account into a session in one step.
    pub fn resolve(raw: Option<&RawAccount>, config: PolicyConfig) -> Self {
        let identity = Identity::resolve(raw, &config);
        Self { identity, config }
    }

    /// An anonymous session with an empty configuration.
    pub fn anonymous() -> Self {
        Self::new(Identity::Anonymous, PolicyConfig::default())
    }

    /// The session identity.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// The policy configuration in force.
    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Whether the session belongs to an authenticated user.
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_authenticated()
    }

    /// Whether the session carries administrative rights.
    pub fn is_admin(&self) -> bool {
        self.identity.is_admin()
    }

    /// The user id, if authenticated.
    pub fn user_id(&self) -> Option<&str> {
        self.identity.id()
    }

    /// Whether this session may create posts.
    pub fn can_create_post(&self) -> bool {
        policy::can_create_post(&self.identity, &self.config)
    }

    /// Whether this session may create public posts.
    pub fn can_create_public_post(&self) -> bool {
        policy::can_create_public_post(&self.identity, &self.config)
    }

    /// Whether this session may administer adventures.
    pub fn can_create_adventure(&self) -> bool {
        policy::can_create_adventure(&self.identity)
    }
}
