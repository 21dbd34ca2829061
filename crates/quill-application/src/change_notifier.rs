//! Fan-out of document change events.

use quill_core::document::DocumentEvent;
use std::sync::{Mutex, PoisonError};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

/// Broadcasts [`DocumentEvent`]s to every live subscriber.
///
/// Publishing never blocks and never fails; a subscriber whose receiver was
/// dropped is removed on the next publish.
#[derive(Debug, Default)]
pub struct ChangeNotifier {
    subscribers: Mutex<Vec<UnboundedSender<DocumentEvent>>>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> UnboundedReceiver<DocumentEvent> {
        let (tx, rx) = unbounded_channel();
        self.lock().push(tx);
        rx
    }

    /// Sends `event` to all subscribers and returns how many received it.
    pub fn publish(&self, event: DocumentEvent) -> usize {
        let mut subscribers = self.lock();
        let before = subscribers.len();
        subscribers.retain(|tx| tx.send(event).is_ok());
        let delivered = subscribers.len();
        if delivered < before {
            tracing::warn!(dropped = before - delivered, "Dropped closed subscribers");
        }
        tracing::debug!(event = event.name(), delivered, "Published document event");
        delivered
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<UnboundedSender<DocumentEvent>>> {
        self.subscribers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn every_subscriber_receives_the_event() {
        let notifier = ChangeNotifier::new();
        let mut a = notifier.subscribe();
        let mut b = notifier.subscribe();

        assert_eq!(notifier.publish(DocumentEvent::ManualUpdated { ok: true }), 2);
        assert_eq!(a.recv().await, Some(DocumentEvent::ManualUpdated { ok: true }));
        assert_eq!(b.recv().await, Some(DocumentEvent::ManualUpdated { ok: true }));
    }

    #[tokio::test]
    async fn closed_subscribers_are_pruned_without_affecting_others() {
        let notifier = ChangeNotifier::new();
        let dropped = notifier.subscribe();
        let mut live = notifier.subscribe();
        drop(dropped);

        assert_eq!(notifier.publish(DocumentEvent::ManualUpdated { ok: true }), 1);
        assert_eq!(notifier.subscriber_count(), 1);
        assert!(live.recv().await.is_some());
    }

    #[test]
    fn publish_without_subscribers_is_a_no_op() {
        assert_eq!(ChangeNotifier::new().publish(DocumentEvent::ManualUpdated { ok: true }), 0);
    }
}
