//! Online/offline classification from last-seen timestamps.
//!
//! Pure functions over a user's `last_seen` value. Presence is advisory: a
//! user is "online" while their last heartbeat is younger than the
//! freshness window, "offline" otherwise, and a user with no timestamp has
//! never been seen at all.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Presence of a user as derived from their last-seen timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceStatus {
    /// Last heartbeat is within the freshness window.
    Online,
    /// Stale or absent heartbeat.
    #[default]
    Offline,
}

impl fmt::Display for PresenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Online => write!(f, "online"),
            Self::Offline => write!(f, "offline"),
        }
    }
}

/// Classify a last-seen timestamp against the freshness window.
///
/// A timestamp slightly in the future (clock skew between devices) still
/// classifies as online.
pub fn classify(
    last_seen: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    freshness: Duration,
) -> PresenceStatus {
    let Some(seen) = last_seen else {
        return PresenceStatus::Offline;
    };
    let window = TimeDelta::from_std(freshness).unwrap_or(TimeDelta::MAX);
    if now.signed_duration_since(seen) < window {
        PresenceStatus::Online
    } else {
        PresenceStatus::Offline
    }
}

/// Whether the user counts as online right now.
pub fn is_online(last_seen: Option<DateTime<Utc>>, now: DateTime<Utc>, freshness: Duration) -> bool {
    classify(last_seen, now, freshness) == PresenceStatus::Online
}

/// Human-readable presence label: "online", "last seen 3 minutes ago",
/// "never seen".
pub fn last_seen_label(
    last_seen: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    freshness: Duration,
) -> String {
    let Some(seen) = last_seen else {
        return "never seen".to_string();
    };
    if classify(last_seen, now, freshness) == PresenceStatus::Online {
        return "online".to_string();
    }

    let age = now.signed_duration_since(seen);
    if age.num_minutes() < 1 {
        "last seen just now".to_string()
    } else if age.num_hours() < 1 {
        format!("last seen {}", plural(age.num_minutes(), "minute"))
    } else if age.num_days() < 1 {
        format!("last seen {}", plural(age.num_hours(), "hour"))
    } else {
        format!("last seen {}", plural(age.num_days(), "day"))
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}
