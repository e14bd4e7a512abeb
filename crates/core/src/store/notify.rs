//! Change notification for store tables.

use tokio::sync::watch;

/// Version counter bumped after every write that touched rows.
///
/// Subscribers get a `watch::Receiver` and re-read when it changes. Many
/// writes between two reads collapse into one notification.
#[derive(Debug)]
pub struct ChangeNotifier {
    tx: watch::Sender<u64>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx }
    }

    /// Signal that rows changed.
    pub fn notify(&self) {
        self.tx.send_modify(|version| *version = version.wrapping_add(1));
    }

    #[cfg(test)]
    pub(crate) fn version(&self) -> u64 {
        *self.tx.borrow()
    }

    /// Subscribe to changes. The current version counts as already seen.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.tx.subscribe()
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notify_bumps_version_without_subscribers() {
        let notifier = ChangeNotifier::new();
        assert_eq!(notifier.version(), 0);
        notifier.notify();
        notifier.notify();
        assert_eq!(notifier.version(), 2);
    }

    #[tokio::test]
    async fn test_subscriber_sees_change() {
        let notifier = ChangeNotifier::new();
        let mut rx = notifier.subscribe();
        assert!(!rx.has_changed().unwrap());

        notifier.notify();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 1);
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_dropping_notifier_closes_subscribers() {
        let notifier = ChangeNotifier::new();
        let mut rx = notifier.subscribe();
        drop(notifier);
        assert!(rx.changed().await.is_err());
    }
}
