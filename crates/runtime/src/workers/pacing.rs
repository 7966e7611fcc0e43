//! Broadcast pacing for multi-step resolutions.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::time::Instant;

use crate::events::ServerMessage;

/// Messages released to subscribers together.
#[derive(Debug, Clone)]
pub(crate) struct Batch {
    pub seq: u64,
    pub messages: Vec<ServerMessage>,
    /// Releasing this batch ends the session.
    pub closes: bool,
}

/// Releases queued batches one acknowledgement at a time.
///
/// A released batch waits for `AnimationComplete` or the timeout before the
/// next one goes out; the last one is waited on as well so the resolution
/// only settles after its final animation.
#[derive(Debug)]
pub(crate) struct BroadcastPacer {
    queue: VecDeque<Batch>,
    ack_deadline: Option<Instant>,
    timeout: Duration,
}

impl BroadcastPacer {
    pub fn new(timeout: Duration) -> Self {
        Self {
            queue: VecDeque::new(),
            ack_deadline: None,
            timeout,
        }
    }

    pub fn push(&mut self, batch: Batch) {
        self.queue.push_back(batch);
    }

    /// Most recently queued batch, still unreleased.
    pub fn last_mut(&mut self) -> Option<&mut Batch> {
        self.queue.back_mut()
    }

    /// Releases the next batch unless one is still awaiting acknowledgement.
    pub fn release_next(&mut self, now: Instant) -> Option<Batch> {
        if self.ack_deadline.is_some() {
            return None;
        }
        let batch = self.queue.pop_front()?;
        self.ack_deadline = Some(now + self.timeout);
        Some(batch)
    }

    /// Ends the current wait and releases whatever comes next.
    pub fn acknowledge(&mut self, now: Instant) -> Option<Batch> {
        self.ack_deadline = None;
        self.release_next(now)
    }

    /// Drops every unreleased batch, returning how many were discarded.
    pub fn clear(&mut self) -> usize {
        self.ack_deadline = None;
        std::mem::take(&mut self.queue).len()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.ack_deadline
    }

    pub fn is_waiting(&self) -> bool {
        self.ack_deadline.is_some()
    }

    /// A resolution is still being delivered.
    pub fn is_busy(&self) -> bool {
        self.is_waiting() || !self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(seq: u64) -> Batch {
        Batch {
            seq,
            messages: Vec::new(),
            closes: false,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn one_batch_in_flight_at_a_time() {
        let mut pacer = BroadcastPacer::new(Duration::from_secs(3));
        pacer.push(batch(1));
        pacer.push(batch(2));

        let now = Instant::now();
        assert_eq!(pacer.release_next(now).map(|b| b.seq), Some(1));
        assert!(pacer.release_next(now).is_none());
        assert_eq!(pacer.deadline(), Some(now + Duration::from_secs(3)));

        assert_eq!(pacer.acknowledge(now).map(|b| b.seq), Some(2));
        assert!(pacer.is_busy());

        assert!(pacer.acknowledge(now).is_none());
        assert!(!pacer.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn clear_discards_pending() {
        let mut pacer = BroadcastPacer::new(Duration::from_secs(3));
        pacer.push(batch(1));
        pacer.push(batch(2));
        pacer.release_next(Instant::now());

        assert_eq!(pacer.clear(), 1);
        assert!(!pacer.is_busy());
    }
}
