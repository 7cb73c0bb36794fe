//! Keeping a live query running only while someone is watching.
//!
//! Controllers publish their state through a [watch] cell. Every [StateObserver] handed out by a
//! controller is counted, and a collector task copies snapshots from a [LiveQuery] into the
//! state while the count is above zero. Once the last observer has been gone for the
//! [WhileSubscribed::stop_timeout], the query is dropped. The next observer restarts it.

use std::{sync::Arc, time::Duration};

use tokio::{sync::watch, task::JoinHandle, time::timeout};

use crate::{Error, LiveQuery};

/// How long to keep an upstream query alive after the last observer detaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WhileSubscribed {
    /// The grace period after the last observer detaches before the query is stopped.
    pub stop_timeout: Duration,
}

impl WhileSubscribed {
    /// The grace period used when nothing else is configured.
    pub const DEFAULT_STOP_TIMEOUT: Duration = Duration::from_secs(5);
}

impl Default for WhileSubscribed {
    fn default() -> Self {
        Self {
            stop_timeout: Self::DEFAULT_STOP_TIMEOUT,
        }
    }
}

/// Counts the live [StateObserver]s of one state cell.
#[derive(Debug, Clone)]
pub(crate) struct ObserverCount(Arc<watch::Sender<usize>>);

impl ObserverCount {
    pub(crate) fn new() -> Self {
        let (sender, _) = watch::channel(0);

        Self(Arc::new(sender))
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<usize> {
        self.0.subscribe()
    }

    fn attach(&self) -> ObserverGuard {
        self.0.send_modify(|count| *count += 1);

        ObserverGuard(self.clone())
    }
}

#[derive(Debug)]
struct ObserverGuard(ObserverCount);

impl Drop for ObserverGuard {
    fn drop(&mut self) {
        self.0
            .0
            .send_modify(|count| *count = count.saturating_sub(1));
    }
}

/// A read handle on a controller's state.
///
/// While at least one observer exists, the controller keeps its data up to date.
#[derive(Debug)]
pub struct StateObserver<S> {
    receiver: watch::Receiver<S>,
    _guard: ObserverGuard,
}

impl<S: Clone> StateObserver<S> {
    pub(crate) fn new(state: &watch::Sender<S>, observers: &ObserverCount) -> Self {
        Self {
            receiver: state.subscribe(),
            _guard: observers.attach(),
        }
    }

    /// A copy of the latest state.
    pub fn current(&self) -> S {
        self.receiver.borrow().clone()
    }

    /// Wait until the state changes, then return a copy of it.
    ///
    /// Returns `None` if the controller has been dropped.
    pub async fn changed(&mut self) -> Option<S> {
        self.receiver.changed().await.ok()?;

        Some(self.receiver.borrow_and_update().clone())
    }

    /// Wait until `predicate` holds for the state, then return a copy of it.
    ///
    /// Returns immediately if the current state already satisfies `predicate`.
    /// Returns `None` if the controller is dropped first.
    pub async fn wait_for(&mut self, predicate: impl FnMut(&S) -> bool) -> Option<S> {
        self.receiver
            .wait_for(predicate)
            .await
            .map(|state| state.clone())
            .ok()
    }
}

/// What a collector task reports to its owner.
#[derive(Debug)]
pub(crate) enum Collected<T> {
    /// An observer attached and a new live query was started.
    Started,
    /// The live query produced a snapshot.
    Snapshot(T),
    /// The live query failed. Collection pauses until observers detach and return.
    Failed(Error),
}

/// Spawn a task that runs the live query from `subscribe` while `observers` is above zero,
/// passing everything it sees to `handle`.
///
/// The task ends when the observer count or the query's repository is dropped. Must be called
/// from within a Tokio runtime.
pub(crate) fn spawn_collector<T, Q, H>(
    policy: WhileSubscribed,
    mut observers: watch::Receiver<usize>,
    mut subscribe: Q,
    mut handle: H,
) -> JoinHandle<()>
where
    T: Send + 'static,
    Q: FnMut() -> LiveQuery<T> + Send + 'static,
    H: FnMut(Collected<T>) + Send + 'static,
{
    tokio::spawn(async move {
        loop {
            if observers.wait_for(|count| *count > 0).await.is_err() {
                return;
            }

            tracing::debug!("observer attached, starting live query");
            handle(Collected::Started);
            let mut query = subscribe();

            let stopped = {
                let idle = wait_until_idle(&mut observers, policy.stop_timeout);
                tokio::pin!(idle);

                loop {
                    tokio::select! {
                        snapshot = query.next() => match snapshot {
                            Some(Ok(snapshot)) => handle(Collected::Snapshot(snapshot)),
                            Some(Err(error)) => {
                                handle(Collected::Failed(error));
                                break false;
                            }
                            None => return,
                        },
                        result = &mut idle => {
                            if result.is_err() {
                                return;
                            }
                            break true;
                        }
                    }
                }
            };

            drop(query);

            if !stopped && wait_until_idle(&mut observers, policy.stop_timeout).await.is_err() {
                return;
            }

            tracing::debug!(
                "no observers for {:?}, stopped live query",
                policy.stop_timeout
            );
        }
    })
}

/// Wait until there have been no observers for `stop_timeout`.
async fn wait_until_idle(
    observers: &mut watch::Receiver<usize>,
    stop_timeout: Duration,
) -> Result<(), watch::error::RecvError> {
    loop {
        observers.wait_for(|count| *count == 0).await.map(|_| ())?;

        let reattached = timeout(stop_timeout, observers.wait_for(|count| *count > 0))
            .await
            .map(|result| result.map(|_| ()));

        match reattached {
            Err(_elapsed) => return Ok(()),
            Ok(Ok(())) => continue,
            Ok(Err(error)) => return Err(error),
        }
    }
}

#[cfg(test)]
mod sharing_tests {
    use std::{sync::Arc, time::Duration};

    use tokio::{sync::watch, time::sleep};

    use crate::{ChangeNotifier, Error};

    use super::{Collected, ObserverCount, StateObserver, WhileSubscribed, spawn_collector};

    const SHORT: WhileSubscribed = WhileSubscribed {
        stop_timeout: Duration::from_millis(50),
    };

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Log {
        started: usize,
        snapshots: Vec<u32>,
        failed: usize,
    }

    fn start(
        notifier: &ChangeNotifier,
        value: watch::Receiver<Result<u32, ()>>,
    ) -> (
        Arc<watch::Sender<Log>>,
        ObserverCount,
        tokio::task::JoinHandle<()>,
    ) {
        let (log, _) = watch::channel(Log::default());
        let log = Arc::new(log);
        let log_handle = log.clone();
        let observers = ObserverCount::new();
        let notifier = notifier.clone();

        let collector = spawn_collector(
            SHORT,
            observers.subscribe(),
            move || {
                let value = value.clone();
                notifier.live_query(move || {
                    (*value.borrow()).map_err(|_| Error::DatabaseLockError)
                })
            },
            move |collected| {
                log_handle.send_modify(|log| match collected {
                    Collected::Started => log.started += 1,
                    Collected::Snapshot(snapshot) => log.snapshots.push(snapshot),
                    Collected::Failed(_) => log.failed += 1,
                })
            },
        );

        (log, observers, collector)
    }

    async fn wait_for_log(
        observer: &mut StateObserver<Log>,
        predicate: impl FnMut(&Log) -> bool,
    ) -> Log {
        tokio::time::timeout(Duration::from_secs(5), observer.wait_for(predicate))
            .await
            .expect("Timed out waiting for the collector")
            .expect("Log was dropped")
    }

    #[tokio::test]
    async fn does_not_query_without_observers() {
        let notifier = ChangeNotifier::new();
        let (_value_sender, value) = watch::channel(Ok(1));
        let (log, _observers, _collector) = start(&notifier, value);

        sleep(Duration::from_millis(50)).await;

        assert_eq!(*log.borrow(), Log::default());
    }

    #[tokio::test]
    async fn collects_while_observed() {
        let notifier = ChangeNotifier::new();
        let (value_sender, value) = watch::channel(Ok(1));
        let (log, observers, _collector) = start(&notifier, value);

        let mut observer = StateObserver::new(&log, &observers);
        wait_for_log(&mut observer, |log| log.snapshots == [1]).await;

        value_sender.send_replace(Ok(2));
        notifier.notify();

        let got = wait_for_log(&mut observer, |log| log.snapshots == [1, 2]).await;
        assert_eq!(got.started, 1);
    }

    #[tokio::test]
    async fn stops_after_the_grace_period_and_restarts_on_return() {
        let notifier = ChangeNotifier::new();
        let (_value_sender, value) = watch::channel(Ok(7));
        let (log, observers, _collector) = start(&notifier, value);

        let mut observer = StateObserver::new(&log, &observers);
        wait_for_log(&mut observer, |log| log.snapshots == [7]).await;
        drop(observer);

        sleep(SHORT.stop_timeout * 3).await;
        notifier.notify();
        sleep(Duration::from_millis(20)).await;
        assert_eq!(log.borrow().snapshots, [7], "Query should have stopped");

        let mut observer = StateObserver::new(&log, &observers);
        let got = wait_for_log(&mut observer, |log| log.snapshots == [7, 7]).await;
        assert_eq!(got.started, 2);
    }

    #[tokio::test]
    async fn keeps_running_if_an_observer_returns_within_the_grace_period() {
        let notifier = ChangeNotifier::new();
        let (_value_sender, value) = watch::channel(Ok(3));
        let (log, observers, _collector) = start(&notifier, value);

        let mut observer = StateObserver::new(&log, &observers);
        wait_for_log(&mut observer, |log| log.snapshots == [3]).await;
        drop(observer);

        let mut observer = StateObserver::new(&log, &observers);
        notifier.notify();

        let got = wait_for_log(&mut observer, |log| log.snapshots == [3, 3]).await;
        assert_eq!(got.started, 1);
    }

    #[tokio::test]
    async fn reports_failures_and_pauses() {
        let notifier = ChangeNotifier::new();
        let (value_sender, value) = watch::channel(Err(()));
        let (log, observers, _collector) = start(&notifier, value);

        let mut observer = StateObserver::new(&log, &observers);
        wait_for_log(&mut observer, |log| log.failed == 1).await;

        value_sender.send_replace(Ok(4));
        notifier.notify();
        sleep(Duration::from_millis(20)).await;

        assert!(log.borrow().snapshots.is_empty());
    }
}
