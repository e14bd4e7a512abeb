//! Live snapshot streams over store change notifications.

use futures::stream::{self, BoxStream, StreamExt};
use tokio::sync::watch;

use super::RepositoryError;

/// Build a stream that yields `load()` once on first poll and again after
/// every change signalled on `changes`.
///
/// The stream ends when the notifier is dropped or when `load` returns
/// `None` (the backing store is gone).
pub(crate) fn snapshot_stream<T, F>(
    changes: watch::Receiver<u64>,
    load: F,
) -> BoxStream<'static, Result<T, RepositoryError>>
where
    T: Send + 'static,
    F: Fn() -> Option<Result<T, RepositoryError>> + Send + Sync + 'static,
{
    stream::unfold(
        (changes, load, true),
        |(mut changes, load, first)| async move {
            if !first && changes.changed().await.is_err() {
                return None;
            }
            // Coalesce changes that landed before this load.
            changes.borrow_and_update();
            let snapshot = load()?;
            Some((snapshot, (changes, load, false)))
        },
    )
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ChangeNotifier;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_yields_initial_then_on_change() {
        let notifier = ChangeNotifier::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let loads = Arc::clone(&counter);

        let mut stream = snapshot_stream(notifier.subscribe(), move || {
            Some(Ok(loads.fetch_add(1, Ordering::SeqCst)))
        });

        assert_eq!(counter.load(Ordering::SeqCst), 0, "nothing loaded before poll");
        assert_eq!(stream.next().await.unwrap().unwrap(), 0);

        notifier.notify();
        assert_eq!(stream.next().await.unwrap().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_no_snapshot_without_change() {
        let notifier = ChangeNotifier::new();
        let mut stream = snapshot_stream(notifier.subscribe(), || Some(Ok(())));

        stream.next().await.unwrap().unwrap();
        let pending = tokio::time::timeout(Duration::from_millis(50), stream.next()).await;
        assert!(pending.is_err());
    }

    #[tokio::test]
    async fn test_ends_when_notifier_dropped() {
        let notifier = ChangeNotifier::new();
        let mut stream = snapshot_stream(notifier.subscribe(), || Some(Ok(1u8)));

        stream.next().await.unwrap().unwrap();
        drop(notifier);
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_ends_when_load_returns_none() {
        let notifier = ChangeNotifier::new();
        let mut stream = snapshot_stream::<u8, _>(notifier.subscribe(), || None);
        assert!(stream.next().await.is_none());
    }
}
