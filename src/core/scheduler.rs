//! Refresh scheduling: wait, assemble, hand over, wait for the frame, repeat

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Notify};
use tokio::task::JoinHandle;

use crate::core::assembler::SnapshotAssembler;
use crate::core::events::Event;

/// A single re-armed timer driving one assembly per cycle.
///
/// The next delay starts only after the dispatch loop reports, through
/// `landed`, that the previous snapshot has been drawn. Cycles therefore never
/// overlap, and the effective period is the configured delay plus assembly
/// time (in practice the CPU sampling window).
pub struct RefreshScheduler {
    assembler: SnapshotAssembler,
    period: Duration,
    landed: Arc<Notify>,
}

impl RefreshScheduler {
    pub fn new(assembler: SnapshotAssembler, period: Duration, landed: Arc<Notify>) -> Self {
        Self {
            assembler,
            period,
            landed,
        }
    }

    pub fn spawn(self, tx: mpsc::UnboundedSender<Event>) -> JoinHandle<()> {
        tokio::spawn(self.run(tx))
    }

    async fn run(self, tx: mpsc::UnboundedSender<Event>) {
        loop {
            tokio::time::sleep(self.period).await;

            match self.assembler.assemble().await {
                Ok(snapshot) => {
                    if tx.send(Event::Refresh(Box::new(snapshot))).is_err() {
                        break;
                    }
                    self.landed.notified().await;
                }
                Err(e) => {
                    tracing::error!("refresh failed, stopping: {}", e);
                    let _ = tx.send(Event::RefreshFailed(e));
                    break;
                }
            }
        }
        tracing::debug!("refresh scheduler stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::testing::counting_provider;
    use crate::metrics::ProviderError;
    use std::sync::atomic::Ordering;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_waits_for_frame_before_rearming() {
        let (mock, calls) = counting_provider(usize::MAX);
        let landed = Arc::new(Notify::new());
        let (tx, mut rx) = mpsc::unbounded_channel();

        let handle = RefreshScheduler::new(
            SnapshotAssembler::new(Arc::new(mock)),
            Duration::from_millis(1),
            Arc::clone(&landed),
        )
        .spawn(tx);

        let first = timeout(Duration::from_secs(5), rx.recv()).await.unwrap();
        assert!(matches!(first, Some(Event::Refresh(s)) if s.cpu.per_core_percent.len() == 1));

        // Nothing else is assembled until the frame is reported as drawn.
        assert!(timeout(Duration::from_millis(100), rx.recv()).await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        landed.notify_one();
        let second = timeout(Duration::from_secs(5), rx.recv()).await.unwrap();
        assert!(matches!(second, Some(Event::Refresh(s)) if s.cpu.per_core_percent.len() == 2));

        handle.abort();
    }

    #[tokio::test]
    async fn test_failure_ends_the_loop() {
        let (mock, _) = counting_provider(0);
        let (tx, mut rx) = mpsc::unbounded_channel();

        let handle = RefreshScheduler::new(
            SnapshotAssembler::new(Arc::new(mock)),
            Duration::from_millis(1),
            Arc::new(Notify::new()),
        )
        .spawn(tx);

        let event = timeout(Duration::from_secs(5), rx.recv()).await.unwrap();
        assert!(matches!(event, Some(Event::RefreshFailed(ProviderError::Cpu(_)))));

        timeout(Duration::from_secs(5), handle).await.unwrap().unwrap();
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_stops_when_receiver_is_gone() {
        let (mock, _) = counting_provider(usize::MAX);
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);

        let handle = RefreshScheduler::new(
            SnapshotAssembler::new(Arc::new(mock)),
            Duration::from_millis(1),
            Arc::new(Notify::new()),
        )
        .spawn(tx);

        timeout(Duration::from_secs(5), handle).await.unwrap().unwrap();
    }
}
