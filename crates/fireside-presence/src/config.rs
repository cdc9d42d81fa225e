//! Presence tracker configuration.

use std::time::Duration;

/// Timing configuration for the heartbeat and online classification.
///
/// Defaults match the production feed: a timestamp write every two minutes,
/// activity-triggered writes throttled to one per minute, and a five-minute
/// freshness window for the online/offline boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresenceConfig {
    /// Period of the timer-driven heartbeat write.
    pub interval: Duration,
    /// Minimum gap between non-forced writes.
    pub throttle: Duration,
    /// Maximum last-seen age still classified as online.
    pub freshness: Duration,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(120),
            throttle: Duration::from_secs(60),
            freshness: Duration::from_secs(300),
        }
    }
}

impl PresenceConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the heartbeat interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the write throttle.
    pub fn with_throttle(mut self, throttle: Duration) -> Self {
        self.throttle = throttle;
        self
    }

    /// Set the online freshness window.
    pub fn with_freshness(mut self, freshness: Duration) -> Self {
        self.freshness = freshness;
        self
    }
}
