//! Polling service that owns the snapshot and drives check-cycles.
//!
//! One instance belongs to one signed-in session: build it on login, drop it
//! on logout. Dropping stops the timer.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Duration;

use tokio::sync::{broadcast, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use mentor_client::RequestDirectory;
use mentor_common::config::AppConfig;

use crate::diff::{self, RequestEvent};
use crate::notification::{Notification, NotifierEvent};
use crate::snapshot::Snapshot;

/// Default polling interval in milliseconds.
const DEFAULT_POLL_INTERVAL_MS: u64 = 5000;

/// Default number of events buffered per subscriber.
const DEFAULT_EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
pub struct NotifierConfig {
    pub poll_interval: Duration,
    pub event_capacity: usize,
}

impl NotifierConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            event_capacity: config.event_capacity,
        }
    }
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

/// Result of a single check-cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// First successful cycle: snapshot recorded, nothing emitted.
    Baseline,
    /// Snapshot diffed and replaced.
    Checked {
        events: Vec<RequestEvent>,
        pending_count: usize,
    },
    /// A fetch failed; the previous snapshot is untouched.
    Failed { reason: String },
    /// Another cycle was already in flight.
    Skipped,
}

/// State shared between the notifier handle and its timer task.
struct Shared {
    directory: Arc<dyn RequestDirectory>,
    /// `None` until the first successful cycle.
    snapshot: RwLock<Option<Arc<Snapshot>>>,
    cycle_guard: tokio::sync::Mutex<()>,
    events: broadcast::Sender<NotifierEvent>,
}

impl Shared {
    fn current(&self) -> Option<Arc<Snapshot>> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace(&self, snapshot: Arc<Snapshot>) {
        *self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(snapshot);
    }

    fn emit(&self, event: NotifierEvent) {
        // No subscribers is fine: nobody is looking at the UI.
        let _ = self.events.send(event);
    }

    async fn run_cycle(&self) -> CycleOutcome {
        let Ok(_guard) = self.cycle_guard.try_lock() else {
            tracing::debug!("Check-cycle already in flight, skipping");
            return CycleOutcome::Skipped;
        };

        let (incoming, outgoing) =
            match tokio::try_join!(self.directory.incoming(), self.directory.outgoing()) {
                Ok(lists) => lists,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to check for new messages");
                    return CycleOutcome::Failed {
                        reason: e.to_string(),
                    };
                }
            };

        let fresh = Arc::new(Snapshot::from_requests(&incoming, &outgoing));

        let Some(previous) = self.current() else {
            tracing::info!(
                incoming = fresh.incoming_len(),
                outgoing = fresh.outgoing_len(),
                "Recorded baseline request snapshot"
            );
            self.replace(fresh);
            return CycleOutcome::Baseline;
        };

        let events = diff::detect_transitions(&previous, &incoming, &outgoing);
        for event in &events {
            tracing::info!(
                request_id = event.request().id,
                transition = event.kind_str(),
                "Request status transition detected"
            );
            self.emit(NotifierEvent::Notify(Notification::for_event(event)));
        }

        // Zero is never broadcast here; clearing the badge goes through
        // `reset_notification_state`.
        let pending_count = fresh.pending_incoming();
        if pending_count > 0 {
            self.emit(NotifierEvent::UnreadCount(pending_count));
        }

        self.replace(fresh);

        CycleOutcome::Checked {
            events,
            pending_count,
        }
    }
}

struct BackgroundCheck {
    stop: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

/// Watches the signed-in account's mentorship requests for status changes.
pub struct RequestStatusNotifier {
    shared: Arc<Shared>,
    poll_interval: Duration,
    background: Mutex<Option<BackgroundCheck>>,
}

impl RequestStatusNotifier {
    pub fn new(directory: Arc<dyn RequestDirectory>, config: NotifierConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));

        Self {
            shared: Arc::new(Shared {
                directory,
                snapshot: RwLock::new(None),
                cycle_guard: tokio::sync::Mutex::new(()),
                events,
            }),
            poll_interval: config.poll_interval,
            background: Mutex::new(None),
        }
    }

    /// Receive notifications, unread counts and reset signals.
    pub fn subscribe(&self) -> broadcast::Receiver<NotifierEvent> {
        self.shared.events.subscribe()
    }

    /// Start polling: one cycle right away, then one per interval.
    ///
    /// Restarts the timer if it is already running. The baseline is kept, so a
    /// restart never suppresses events a second time. If the old timer's cycle
    /// is still in flight, the new timer's immediate cycle is skipped and the
    /// next check happens one interval later. Must be called from within a
    /// Tokio runtime.
    pub fn start_background_check(&self) {
        self.stop_background_check();

        let (stop, mut stop_rx) = oneshot::channel();
        let shared = Arc::clone(&self.shared);
        let period = self.poll_interval;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                // The stop signal is only observed between cycles, so a cycle
                // in flight when polling stops still runs to completion.
                tokio::select! {
                    biased;
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {}
                }
                shared.run_cycle().await;
            }

            tracing::debug!("Request status polling loop exited");
        });

        *self.lock_background() = Some(BackgroundCheck { stop, handle });

        tracing::info!(
            poll_interval_ms = period.as_millis() as u64,
            "Request status polling started"
        );
    }

    /// Stop the timer. No-op when it is not running.
    pub fn stop_background_check(&self) {
        if let Some(background) = self.lock_background().take() {
            let _ = background.stop.send(());
            tracing::info!("Request status polling stopped");
        }
    }

    /// Stop the timer and wait for a cycle in flight to finish.
    pub async fn shutdown(&self) {
        let background = self.lock_background().take();
        if let Some(background) = background {
            let _ = background.stop.send(());
            if let Err(e) = background.handle.await {
                tracing::warn!(error = %e, "Request status polling task failed");
            }
            tracing::info!("Request status polling shut down");
        }
    }

    pub fn is_running(&self) -> bool {
        self.lock_background().is_some()
    }

    /// Whether a baseline snapshot has been recorded.
    pub fn is_initialized(&self) -> bool {
        self.shared.current().is_some()
    }

    /// Run one check-cycle now. Failures are logged and reported in the
    /// outcome, never returned as errors.
    pub async fn check_new_messages(&self) -> CycleOutcome {
        self.shared.run_cycle().await
    }

    /// Ask the badge consumer to clear its counter. The snapshot is kept.
    pub fn reset_notification_state(&self) {
        tracing::debug!("Unread badge reset requested");
        self.shared.emit(NotifierEvent::UnreadReset);
    }

    /// Pending incoming requests in the last successful snapshot.
    pub fn get_new_messages_count(&self) -> usize {
        self.shared
            .current()
            .map(|s| s.pending_incoming())
            .unwrap_or(0)
    }

    fn lock_background(&self) -> MutexGuard<'_, Option<BackgroundCheck>> {
        self.background
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for RequestStatusNotifier {
    fn drop(&mut self) {
        let background = self
            .background
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(background) = background {
            let _ = background.stop.send(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mentor_common::types::EntityType;

    #[test]
    fn test_default_config() {
        let config = NotifierConfig::default();
        assert_eq!(config.poll_interval, Duration::from_millis(5000));
        assert_eq!(config.event_capacity, 64);
    }

    #[test]
    fn test_config_from_app_config() {
        let app = AppConfig {
            api_url: "http://unused".to_string(),
            api_token: "tok".to_string(),
            auth_type: EntityType::Mentor,
            poll_interval_ms: 750,
            http_timeout_ms: 1000,
            event_capacity: 8,
        };
        let config = NotifierConfig::from_app_config(&app);
        assert_eq!(config.poll_interval, Duration::from_millis(750));
        assert_eq!(config.event_capacity, 8);
    }
}
