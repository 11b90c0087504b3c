// src/core/scanner/dispatcher.rs

use crate::core::models::ProbeResult;
use crate::core::scanner::probe::Prober;
use std::sync::Arc;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info, warn};

/// Default number of probes allowed in flight at once.
pub const DEFAULT_CONCURRENCY: usize = 50;

/// What the dispatcher did, reported once every task has finished.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchStats {
    pub dispatched: usize,
    pub completed: usize,
    /// Tasks that panicked or were aborted and so sent no result.
    pub failed: usize,
    /// Most unreaped tasks held at once. Never above the limit.
    pub peak_pending: usize,
}

impl DispatchStats {
    fn record(&mut self, joined: Result<(), JoinError>) {
        match joined {
            Ok(()) => self.completed += 1,
            Err(e) => {
                warn!(error = %e, "Probe task did not complete.");
                self.failed += 1;
            }
        }
    }
}

/// Fans probe tasks out over a candidate list with a fixed concurrency cap.
pub struct Dispatcher<P: Prober> {
    prober: Arc<P>,
    limit: usize,
}

impl<P: Prober> Dispatcher<P> {
    /// `limit` is clamped to at least one slot.
    pub fn new(prober: Arc<P>, limit: usize) -> Self {
        Self { prober, limit: limit.max(1) }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Runs one probe task per candidate and forwards every result on `tx`.
    ///
    /// A slot is taken before each spawn, so at most `limit` tasks hold one at
    /// any time. The slot moves into the task and is released when the task
    /// ends, however it ends. Finished tasks are reaped as dispatch goes, so
    /// the task set never holds more than `limit` entries. The channel closes
    /// once `tx` and every task's clone of it are dropped, which happens after
    /// the last task finishes.
    pub async fn run<I>(&self, candidates: I, tx: mpsc::Sender<ProbeResult>) -> DispatchStats
    where
        I: IntoIterator<Item = String>,
    {
        let semaphore = Arc::new(Semaphore::new(self.limit));
        let mut tasks = JoinSet::new();
        let mut stats = DispatchStats::default();

        for candidate in candidates {
            while tasks.len() >= self.limit {
                match tasks.join_next().await {
                    Some(joined) => stats.record(joined),
                    None => break,
                }
            }
            let Ok(permit) = semaphore.clone().acquire_owned().await else {
                warn!("Concurrency semaphore closed, stopping dispatch.");
                break;
            };
            let prober = Arc::clone(&self.prober);
            let tx = tx.clone();
            stats.dispatched += 1;

            tasks.spawn(async move {
                let _permit = permit;
                let result = prober.probe(&candidate).await;
                if tx.send(result).await.is_err() {
                    debug!(candidate = %candidate, "Result receiver dropped.");
                }
            });
            stats.peak_pending = stats.peak_pending.max(tasks.len());

            while let Some(joined) = tasks.try_join_next() {
                stats.record(joined);
            }
        }
        drop(tx);
        debug!(dispatched = stats.dispatched, "All candidates dispatched, waiting for tasks.");

        while let Some(joined) = tasks.join_next().await {
            stats.record(joined);
        }

        info!(
            dispatched = stats.dispatched,
            completed = stats.completed,
            failed = stats.failed,
            peak_pending = stats.peak_pending,
            "Dispatch finished."
        );
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::ProbeOutcome;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Records the highest number of overlapping probes it has seen.
    #[derive(Default)]
    struct CountingProber {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl Prober for CountingProber {
        async fn probe(&self, candidate: &str) -> ProbeResult {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            ProbeResult {
                url: format!("http://example.com/{}", candidate),
                candidate: candidate.to_string(),
                outcome: ProbeOutcome::Status(200),
                line: candidate.to_string(),
            }
        }
    }

    struct PanickingProber;

    #[async_trait]
    impl Prober for PanickingProber {
        async fn probe(&self, candidate: &str) -> ProbeResult {
            if candidate == "boom" {
                panic!("probe exploded");
            }
            ProbeResult {
                url: candidate.to_string(),
                candidate: candidate.to_string(),
                outcome: ProbeOutcome::Status(200),
                line: candidate.to_string(),
            }
        }
    }

    fn candidates(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("c{}", i)).collect()
    }

    async fn collect(mut rx: mpsc::Receiver<ProbeResult>) -> Vec<ProbeResult> {
        let mut out = Vec::new();
        while let Some(r) = rx.recv().await {
            out.push(r);
        }
        out
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn never_exceeds_the_limit() {
        let prober = Arc::new(CountingProber::default());
        let dispatcher = Dispatcher::new(Arc::clone(&prober), 5);
        let (tx, rx) = mpsc::channel(8);
        let sink = tokio::spawn(collect(rx));

        let stats = dispatcher.run(candidates(60), tx).await;
        let results = sink.await.unwrap();

        assert_eq!(stats.dispatched, 60);
        assert_eq!(stats.completed, 60);
        assert_eq!(results.len(), 60);
        let peak = prober.peak.load(Ordering::SeqCst);
        assert!(peak <= 5, "peak concurrency was {}", peak);
        assert!(peak >= 2, "tasks never overlapped");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn small_lists_stay_below_the_list_size() {
        let prober = Arc::new(CountingProber::default());
        let dispatcher = Dispatcher::new(Arc::clone(&prober), 50);
        let (tx, rx) = mpsc::channel(100);
        let sink = tokio::spawn(collect(rx));

        dispatcher.run(candidates(3), tx).await;
        sink.await.unwrap();

        assert!(prober.peak.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn finished_tasks_are_reaped_during_dispatch() {
        let dispatcher = Dispatcher::new(Arc::new(CountingProber::default()), 4);
        let (tx, rx) = mpsc::channel(16);
        let sink = tokio::spawn(collect(rx));

        let stats = dispatcher.run(candidates(200), tx).await;
        sink.await.unwrap();

        assert_eq!(stats.completed, 200);
        assert!(stats.peak_pending <= 4, "task set grew to {}", stats.peak_pending);
    }

    #[tokio::test]
    async fn exactly_one_result_per_candidate() {
        let dispatcher = Dispatcher::new(Arc::new(CountingProber::default()), 7);
        let (tx, rx) = mpsc::channel(4);
        let sink = tokio::spawn(collect(rx));

        dispatcher.run(candidates(25), tx).await;
        let results = sink.await.unwrap();

        let seen: HashSet<String> = results.iter().map(|r| r.candidate.clone()).collect();
        assert_eq!(results.len(), 25);
        assert_eq!(seen.len(), 25);
    }

    #[tokio::test]
    async fn empty_list_closes_the_channel() {
        let dispatcher = Dispatcher::new(Arc::new(CountingProber::default()), 3);
        let (tx, rx) = mpsc::channel(1);
        let stats = dispatcher.run(Vec::new(), tx).await;
        assert_eq!(stats, DispatchStats::default());
        assert!(collect(rx).await.is_empty());
    }

    #[tokio::test]
    async fn panicking_task_releases_its_slot() {
        // With one slot, a leaked permit would hang the remaining candidates.
        let dispatcher = Dispatcher::new(Arc::new(PanickingProber), 1);
        let (tx, rx) = mpsc::channel(10);
        let sink = tokio::spawn(collect(rx));

        let list = vec!["a".to_string(), "boom".to_string(), "b".to_string()];
        let stats = tokio::time::timeout(Duration::from_secs(5), dispatcher.run(list, tx))
            .await
            .expect("dispatcher hung");

        assert_eq!(stats.completed, 2);
        assert_eq!(stats.failed, 1);
        assert_eq!(sink.await.unwrap().len(), 2);
    }

    #[test]
    fn zero_limit_is_clamped() {
        let dispatcher = Dispatcher::new(Arc::new(PanickingProber), 0);
        assert_eq!(dispatcher.limit(), 1);
    }
}
