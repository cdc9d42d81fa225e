//! Background heartbeat task recording last-seen timestamps.
//!
//! One task per authenticated session. The task issues a forced timestamp
//! write on startup, then writes on a periodic timer and on activity
//! triggers reported by the UI shell (visibility, focus, input). Non-forced
//! writes are throttled to one per throttle window, measured from the last
//! *successful* write; a request that arrives while a write is outstanding
//! is dropped, not queued.
//!
//! Write failures are logged and swallowed. Staleness is cosmetic, so the
//! tracker never surfaces an error and never retries before the next
//! natural tick.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{Mutex, broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use fireside_core::identity::UserId;
use fireside_core::session::Session;
use fireside_core::store::DocumentStore;

use crate::config::PresenceConfig;

/// Buffered activity triggers; input events beyond this are dropped.
const TRIGGER_BUFFER: usize = 16;

/// An activity signal from the UI shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityTrigger {
    /// The page became visible again.
    VisibilityRegained,
    /// The window regained focus.
    FocusRegained,
    /// Pointer-down or key-down activity.
    UserInput,
    /// The page is unloading; write unconditionally, best effort.
    Unload,
}

impl ActivityTrigger {
    /// Whether this trigger bypasses the write throttle.
    pub fn is_forced(&self) -> bool {
        matches!(self, Self::Unload)
    }
}

/// Shared write state: the last successful write time.
///
/// The mutex doubles as the in-flight guard: the writer holds the lock for
/// the duration of the store call, and `try_lock` failing means a write is
/// already outstanding.
type WriteState = Arc<Mutex<Option<Instant>>>;

/// Background presence heartbeat.
pub struct HeartbeatTask {
    /// The user whose timestamp this task maintains.
    user_id: UserId,
    /// Document store receiving the writes.
    store: Arc<dyn DocumentStore>,
    /// Timing configuration.
    config: PresenceConfig,
    /// Shutdown signal.
    shutdown_rx: broadcast::Receiver<()>,
    /// Activity triggers from the UI shell.
    trigger_rx: mpsc::Receiver<ActivityTrigger>,
    /// Last successful write, behind the in-flight guard.
    write_state: WriteState,
}

impl HeartbeatTask {
    /// Spawn the heartbeat for an authenticated session.
    ///
    /// Returns `None` for an anonymous session: there is no identity to
    /// keep alive.
    pub fn spawn(
        session: &Session,
        store: Arc<dyn DocumentStore>,
        config: PresenceConfig,
    ) -> Option<HeartbeatHandle> {
        let user_id = session.user_id()?.to_string();
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let (trigger_tx, trigger_rx) = mpsc::channel(TRIGGER_BUFFER);

        let task = Self {
            user_id,
            store,
            config,
            shutdown_rx,
            trigger_rx,
            write_state: Arc::new(Mutex::new(None)),
        };

        let join = tokio::spawn(task.run());

        Some(HeartbeatHandle {
            trigger_tx,
            shutdown_tx,
            join,
        })
    }

    /// Run the heartbeat loop.
    async fn run(mut self) {
        info!(
            user = %self.user_id,
            interval_secs = self.config.interval.as_secs(),
            "Presence heartbeat started"
        );

        // Entering Heartbeating: one immediate forced write.
        self.request_write(true);

        let mut interval = tokio::time::interval(self.config.interval);
        // No catch-up burst after the timer falls behind (laptop suspend).
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; the forced write above
        // already covered it.
        interval.tick().await;

        loop {
            tokio::select! {
                _ = self.shutdown_rx.recv() => {
                    info!(user = %self.user_id, "Presence heartbeat shutting down");
                    break;
                }
                _ = interval.tick() => self.request_write(false),
                trigger = self.trigger_rx.recv() => match trigger {
                    Some(t) => {
                        debug!(user = %self.user_id, trigger = ?t, "Activity trigger");
                        self.request_write(t.is_forced());
                    }
                    // Handle dropped: tear down without a further write.
                    None => break,
                },
            }
        }
    }

    /// Issue a timestamp write unless throttled or already in flight.
    ///
    /// The write itself runs on a separate task so a slow store never
    /// blocks trigger processing; the mutex guard travels with it and
    /// serializes writers.
    fn request_write(&self, forced: bool) {
        let Ok(mut slot) = Arc::clone(&self.write_state).try_lock_owned() else {
            debug!(user = %self.user_id, "Heartbeat write already in flight, dropping");
            return;
        };

        if !forced {
            let recently_written =
                (*slot).is_some_and(|at| at.elapsed() < self.config.throttle);
            if recently_written {
                debug!(user = %self.user_id, "Heartbeat write throttled");
                return;
            }
        }

        let store = Arc::clone(&self.store);
        let user_id = self.user_id.clone();

        tokio::spawn(async move {
            match store.touch_user(&user_id, Utc::now()).await {
                Ok(()) => {
                    *slot = Some(Instant::now());
                    debug!(user = %user_id, "Presence timestamp written");
                }
                // Failed writes do not advance the throttle clock; the
                // next tick is the retry.
                Err(e) => warn!(user = %user_id, error = %e, "Presence write failed"),
            }
        });
    }
}

/// Handle to a running heartbeat.
///
/// Dropping the handle tears the task down: both channels close and the
/// loop exits, so no write is ever issued on behalf of a stale identity.
pub struct HeartbeatHandle {
    trigger_tx: mpsc::Sender<ActivityTrigger>,
    shutdown_tx: broadcast::Sender<()>,
    join: JoinHandle<()>,
}

impl HeartbeatHandle {
    /// Report an activity trigger.
    ///
    /// Lossy: if the buffer is full the trigger is dropped.
    pub fn activity(&self, trigger: ActivityTrigger) {
        if self.trigger_tx.try_send(trigger).is_err() {
            debug!(trigger = ?trigger, "Activity trigger dropped");
        }
    }

    /// Best-effort forced write for page unload.
    pub fn unload(&self) {
        self.activity(ActivityTrigger::Unload);
    }

    /// Whether the heartbeat loop has exited.
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Stop the heartbeat and wait for the loop to exit.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        let _ = self.join.await;
    }
}
