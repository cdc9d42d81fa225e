//! # Fireside Presence
//!
//! Heartbeat presence tracker for the Fireside community feed. Maintains an
//! approximate last-seen timestamp per user and classifies anyone as online
//! or offline from it.
//!
//! The tracker is deliberately loose: timestamps are advisory, concurrent
//! sessions race last-write-wins, and a failed write simply waits for the
//! next tick. Nothing in the feed gates access on presence.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use fireside_core::prelude::*;
//! use fireside_presence::{ActivityTrigger, HeartbeatTask, PresenceConfig};
//!
//! let session = Session::resolve(Some(&account), PolicyConfig::new());
//! let handle = HeartbeatTask::spawn(&session, store, PresenceConfig::default())
//!     .expect("authenticated session");
//!
//! // Wire UI events to the tracker.
//! handle.activity(ActivityTrigger::FocusRegained);
//!
//! // On logout, tear the task down.
//! handle.shutdown().await;
//! ```

pub mod config;
pub mod heartbeat;
pub mod status;

pub use config::PresenceConfig;
pub use heartbeat::{ActivityTrigger, HeartbeatHandle, HeartbeatTask};
pub use status::{PresenceStatus, classify, is_online, last_seen_label};
