//! EffectScheduler — delayed log effects with per-stage cancellation.
//!
//! Scripted stages animate by scheduling pure log transforms (insert a typing
//! indicator, later replace it with revealed content) and follow-up events.
//! Every pending timer is tracked under the stage that scheduled it, so
//! teardown can cancel a stage's effects atomically; a timer must never fire
//! into a torn-down log.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::message::{LogHandle, LogOp};
use crate::stage::event::StageEvent;
use crate::stage::state::Stage;

/// Schedules delayed mutations against the message log.
pub struct EffectScheduler {
    log: LogHandle,
    events: mpsc::UnboundedSender<StageEvent>,
    /// Pending timers, keyed by the stage that scheduled them.
    pending: Mutex<HashMap<Stage, Vec<JoinHandle<()>>>>,
}

impl EffectScheduler {
    pub fn new(log: LogHandle, events: mpsc::UnboundedSender<StageEvent>) -> Self {
        Self {
            log,
            events,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Schedule a pure log transform to fire after `delay`.
    pub fn schedule_op(&self, stage: Stage, delay: Duration, op: LogOp) {
        let log = self.log.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            log.apply(op);
        });
        self.track(stage, handle);
    }

    /// Schedule an event to be delivered back to the controller after `delay`.
    pub fn schedule_event(&self, stage: Stage, delay: Duration, event: StageEvent) {
        let events = self.events.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(event);
        });
        self.track(stage, handle);
    }

    fn track(&self, stage: Stage, handle: JoinHandle<()>) {
        let mut pending = self.pending.lock().expect("scheduler lock poisoned");
        // Drop handles for timers that already fired.
        for handles in pending.values_mut() {
            handles.retain(|h| !h.is_finished());
        }
        pending.entry(stage).or_default().push(handle);
    }

    /// Cancel every pending timer scheduled by `stage`.
    pub fn cancel_stage(&self, stage: Stage) {
        let mut pending = self.pending.lock().expect("scheduler lock poisoned");
        if let Some(handles) = pending.remove(&stage) {
            let count = handles.len();
            for handle in handles {
                handle.abort();
            }
            debug!(%stage, count, "cancelled stage timers");
        }
    }

    /// Cancel all pending timers. Called on teardown.
    pub fn cancel_all(&self) {
        let mut pending = self.pending.lock().expect("scheduler lock poisoned");
        for (_, handles) in pending.drain() {
            for handle in handles {
                handle.abort();
            }
        }
    }

    /// Number of tracked (possibly already fired) timers.
    pub fn pending_count(&self) -> usize {
        let pending = self.pending.lock().expect("scheduler lock poisoned");
        pending.values().map(|v| v.len()).sum()
    }
}

impl Drop for EffectScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{Message, MessageKind};

    fn scheduler() -> (EffectScheduler, LogHandle) {
        let log = LogHandle::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        (EffectScheduler::new(log.clone(), tx), log)
    }

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn op_fires_after_its_delay() {
        let (sched, log) = scheduler();
        sched.schedule_op(
            Stage::Greeting,
            Duration::from_millis(500),
            LogOp::Append(vec![Message::typing()]),
        );
        settle().await;

        tokio::time::advance(Duration::from_millis(499)).await;
        settle().await;
        assert!(log.snapshot().is_empty());

        tokio::time::advance(Duration::from_millis(2)).await;
        settle().await;
        assert!(log.snapshot().contains_kind(MessageKind::Typing));
    }

    #[tokio::test(start_paused = true)]
    async fn ops_fire_in_delay_order() {
        let (sched, log) = scheduler();
        sched.schedule_op(
            Stage::Greeting,
            Duration::from_millis(1000),
            LogOp::ReplaceKind(MessageKind::Typing, vec![Message::assistant("hello")]),
        );
        sched.schedule_op(
            Stage::Greeting,
            Duration::from_millis(500),
            LogOp::Append(vec![Message::typing()]),
        );
        settle().await;

        tokio::time::advance(Duration::from_millis(1100)).await;
        settle().await;

        let log = log.snapshot();
        assert!(!log.contains_kind(MessageKind::Typing));
        assert_eq!(log.last().unwrap().text(), Some("hello"));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_stage_never_fires() {
        let (sched, log) = scheduler();
        sched.schedule_op(
            Stage::Greeting,
            Duration::from_millis(500),
            LogOp::Append(vec![Message::typing()]),
        );
        sched.cancel_stage(Stage::Greeting);

        tokio::time::advance(Duration::from_secs(5)).await;
        settle().await;
        assert!(log.snapshot().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_cancels_everything() {
        let (sched, log) = scheduler();
        sched.schedule_op(
            Stage::Searching,
            Duration::from_millis(400),
            LogOp::Append(vec![Message::assistant("late")]),
        );
        sched.schedule_event(
            Stage::Searching,
            Duration::from_millis(400),
            StageEvent::SessionStarted,
        );
        drop(sched);

        tokio::time::advance(Duration::from_secs(5)).await;
        settle().await;
        assert!(log.snapshot().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn event_is_delivered_to_the_channel() {
        let log = LogHandle::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sched = EffectScheduler::new(log, tx);
        sched.schedule_event(
            Stage::Greeting,
            Duration::from_millis(100),
            StageEvent::GreetingPlayed,
        );
        settle().await;

        tokio::time::advance(Duration::from_millis(150)).await;
        settle().await;
        assert!(matches!(rx.try_recv(), Ok(StageEvent::GreetingPlayed)));
    }
}
