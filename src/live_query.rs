//! Queries that re-run whenever the table they read from changes.

use std::sync::Arc;

use tokio::sync::watch;

use crate::{Error, db::run_blocking};

/// Tells live queries on a table that the table has changed.
///
/// Clones share the same notifier, so every repository handle for a table must be a clone of
/// one repository.
#[derive(Debug, Clone)]
pub struct ChangeNotifier(Arc<watch::Sender<u64>>);

impl ChangeNotifier {
    /// Create a notifier with no subscribers.
    pub fn new() -> Self {
        let (sender, _) = watch::channel(0);

        Self(Arc::new(sender))
    }

    /// Wake every live query subscribed to this notifier.
    pub fn notify(&self) {
        self.0.send_modify(|version| *version = version.wrapping_add(1));
    }

    /// Create a live query that runs `fetch` now and again after every [ChangeNotifier::notify].
    ///
    /// `fetch` runs on Tokio's blocking thread pool.
    pub fn live_query<T>(
        &self,
        fetch: impl Fn() -> Result<T, Error> + Send + Sync + 'static,
    ) -> LiveQuery<T> {
        LiveQuery {
            changes: self.0.subscribe(),
            fetch: Arc::new(fetch),
            seen: None,
        }
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

/// A sequence of snapshots of a query's result.
///
/// The first call to [LiveQuery::next] returns the current result straight away. Later calls
/// wait until the underlying table changes and then return the new result. Several changes made
/// between two calls are collapsed into one snapshot. Dropping the query unsubscribes it.
pub struct LiveQuery<T> {
    changes: watch::Receiver<u64>,
    fetch: Arc<dyn Fn() -> Result<T, Error> + Send + Sync>,
    /// The notifier version the last returned snapshot was read at.
    seen: Option<u64>,
}

impl<T: Send + 'static> LiveQuery<T> {
    /// Wait for the next snapshot.
    ///
    /// Returns `None` once the repository that created the query has been dropped.
    /// This method is cancel safe: a snapshot that was cancelled mid-read is read again on the
    /// next call.
    pub async fn next(&mut self) -> Option<Result<T, Error>> {
        if let Some(seen) = self.seen {
            self.changes
                .wait_for(|version| *version != seen)
                .await
                .ok()?;
        }

        let version = *self.changes.borrow_and_update();
        let fetch = self.fetch.clone();
        let snapshot = run_blocking(move || fetch()).await;
        self.seen = Some(version);

        Some(snapshot)
    }
}

impl<T> std::fmt::Debug for LiveQuery<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveQuery")
            .field("version", &*self.changes.borrow())
            .field("seen", &self.seen)
            .finish()
    }
}

#[cfg(test)]
mod live_query_tests {
    use std::{
        sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
        time::Duration,
    };

    use tokio::time::timeout;

    use super::ChangeNotifier;

    fn counting_query(notifier: &ChangeNotifier) -> super::LiveQuery<usize> {
        let runs = Arc::new(AtomicUsize::new(0));
        notifier.live_query(move || Ok(runs.fetch_add(1, Ordering::SeqCst) + 1))
    }

    #[tokio::test]
    async fn first_snapshot_is_immediate() {
        let notifier = ChangeNotifier::new();
        let mut query = counting_query(&notifier);

        let snapshot = timeout(Duration::from_secs(1), query.next())
            .await
            .expect("First snapshot should not wait");

        assert_eq!(snapshot, Some(Ok(1)));
    }

    #[tokio::test]
    async fn next_waits_for_a_change() {
        let notifier = ChangeNotifier::new();
        let mut query = counting_query(&notifier);
        query.next().await;

        let waited = timeout(Duration::from_millis(50), query.next()).await;
        assert!(waited.is_err(), "Expected no snapshot without a change");

        notifier.notify();
        let snapshot = timeout(Duration::from_secs(1), query.next())
            .await
            .expect("Expected a snapshot after a change");

        assert_eq!(snapshot, Some(Ok(2)));
    }

    #[tokio::test]
    async fn changes_between_reads_are_collapsed() {
        let notifier = ChangeNotifier::new();
        let mut query = counting_query(&notifier);
        query.next().await;

        notifier.notify();
        notifier.notify();
        notifier.notify();

        assert_eq!(query.next().await, Some(Ok(2)));
        let waited = timeout(Duration::from_millis(50), query.next()).await;
        assert!(waited.is_err(), "Expected the changes to be collapsed");
    }

    #[tokio::test]
    async fn slow_reads_do_not_block_the_runtime() {
        let notifier = ChangeNotifier::new();
        let mut query = notifier.live_query(|| {
            std::thread::sleep(Duration::from_millis(300));
            Ok(())
        });
        let start = std::time::Instant::now();
        let reader = tokio::spawn(async move { query.next().await });
        tokio::task::yield_now().await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        let elapsed = start.elapsed();

        assert!(
            elapsed < Duration::from_millis(200),
            "Runtime was blocked for {elapsed:?}"
        );
        assert_eq!(
            reader.await.expect("Reader task failed"),
            Some(Ok(()))
        );
    }

    #[tokio::test]
    async fn cancelled_read_is_retried() {
        let notifier = ChangeNotifier::new();
        let mut slow = notifier.live_query(|| {
            std::thread::sleep(Duration::from_millis(100));
            Ok(())
        });
        let cancelled = timeout(Duration::from_millis(10), slow.next()).await;
        assert!(cancelled.is_err(), "Expected the read to be cancelled");

        let snapshot = timeout(Duration::from_secs(1), slow.next())
            .await
            .expect("Expected the cancelled read to run again straight away");
        assert_eq!(snapshot, Some(Ok(())));
    }

    #[tokio::test]
    async fn next_returns_none_once_the_notifier_is_gone() {
        let notifier = ChangeNotifier::new();
        let mut query = counting_query(&notifier);
        query.next().await;

        drop(notifier);

        assert_eq!(query.next().await, None);
    }
}
