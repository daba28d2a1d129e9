//! Request-status notifier.
//!
//! Polls the request directory for incoming and outgoing mentorship requests,
//! diffs the observed statuses against the previous poll and publishes one
//! [`NotifierEvent`] per detected transition:
//!
//! - a new pending request arrived for the signed-in account
//! - one of its own pending requests was accepted
//! - one of its own pending requests was rejected
//!
//! The badge consumer additionally receives the current pending count and an
//! explicit reset signal.

pub mod diff;
pub mod notification;
pub mod service;
pub mod snapshot;

pub use diff::RequestEvent;
pub use notification::{Notification, NotificationAction, NotificationKind, NotifierEvent};
pub use service::{CycleOutcome, NotifierConfig, RequestStatusNotifier};
pub use snapshot::Snapshot;
