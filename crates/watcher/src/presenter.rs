//! Headless presenter: logs what a UI would show and keeps the unread badge.

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use mentor_notifier::NotifierEvent;

#[derive(Debug, Default)]
pub struct TerminalPresenter {
    badge: usize,
    shown: usize,
}

impl TerminalPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current unread badge value.
    pub fn badge(&self) -> usize {
        self.badge
    }

    /// Number of notifications shown so far.
    pub fn shown(&self) -> usize {
        self.shown
    }

    pub fn handle(&mut self, event: &NotifierEvent) {
        match event {
            NotifierEvent::Notify(n) => {
                self.shown += 1;
                tracing::info!(
                    notification_id = %n.id,
                    request_id = n.request_id,
                    kind = %n.kind,
                    title = %n.title,
                    description = %n.description,
                    action = n.action.as_ref().map(|a| a.path.as_str()).unwrap_or(""),
                    "Notification"
                );
            }
            NotifierEvent::UnreadCount(count) => {
                if *count != self.badge {
                    tracing::info!(unread = count, "Unread badge updated");
                }
                self.badge = *count;
            }
            NotifierEvent::UnreadReset => {
                tracing::info!("Unread badge cleared");
                self.badge = 0;
            }
        }
    }

    /// Consume events until the notifier is dropped.
    pub async fn run(mut self, mut events: broadcast::Receiver<NotifierEvent>) -> Self {
        loop {
            match events.recv().await {
                Ok(event) => self.handle(&event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Presenter lagged behind notifier events");
                }
                Err(RecvError::Closed) => break,
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mentor_notifier::{Notification, NotificationKind};

    fn notification() -> Notification {
        Notification {
            id: Default::default(),
            request_id: 3,
            kind: NotificationKind::Info,
            title: "New request from Anna".to_string(),
            description: "You have a new incoming request".to_string(),
            action: None,
        }
    }

    #[test]
    fn test_badge_follows_count_and_reset() {
        let mut presenter = TerminalPresenter::new();
        presenter.handle(&NotifierEvent::UnreadCount(3));
        assert_eq!(presenter.badge(), 3);

        presenter.handle(&NotifierEvent::UnreadReset);
        assert_eq!(presenter.badge(), 0);

        presenter.handle(&NotifierEvent::Notify(notification()));
        assert_eq!(presenter.shown(), 1);
        assert_eq!(presenter.badge(), 0);
    }

    #[tokio::test]
    async fn test_run_stops_when_sender_dropped() {
        let (tx, rx) = broadcast::channel(8);
        let task = tokio::spawn(TerminalPresenter::new().run(rx));

        tx.send(NotifierEvent::Notify(notification())).unwrap();
        tx.send(NotifierEvent::UnreadCount(2)).unwrap();
        drop(tx);

        let presenter = task.await.unwrap();
        assert_eq!(presenter.shown(), 1);
        assert_eq!(presenter.badge(), 2);
    }
}
