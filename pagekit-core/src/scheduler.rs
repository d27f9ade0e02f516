//! Virtual-time timer queue
//!
//! Pages never sleep. Every delayed effect is queued here with a due time in
//! milliseconds, and the host moves the clock forward with
//! [`Page::advance`](crate::Page::advance).

use std::time::Duration;

use serde::Serialize;

use crate::types::ModalId;

/// Handle returned by [`Scheduler::schedule`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TimerId(u64);

/// Deferred page effect
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "task", rename_all = "camelCase")]
pub enum TimerTask {
    /// Hide the feedback panel of a modal and close it
    RevertFeedback { modal: ModalId },
    /// Send the visitor to another page; cancelled when `modal` closes first
    Redirect { modal: ModalId, url: String },
}

#[derive(Debug, Clone)]
struct PendingTimer {
    id: TimerId,
    due_at: u64,
    task: TimerTask,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    now_ms: u64,
    next_id: u64,
    queue: Vec<PendingTimer>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.queue.iter().any(|t| t.id == id)
    }

    pub fn schedule(&mut self, delay: Duration, task: TimerTask) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let due_at = self.now_ms.saturating_add(duration_ms(delay));
        log::debug!("[Timer] schedule {id:?} at {due_at}ms: {task:?}");
        self.queue.push(PendingTimer { id, due_at, task });
        id
    }

    /// Drop a pending timer; returns whether it was still queued
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.queue.len();
        self.queue.retain(|t| t.id != id);
        let removed = self.queue.len() < before;
        if removed {
            log::debug!("[Timer] cancel {id:?}");
        }
        removed
    }

    /// Time left until the earliest pending timer
    pub fn next_due_in(&self) -> Option<Duration> {
        self.queue
            .iter()
            .map(|t| t.due_at)
            .min()
            .map(|due| Duration::from_millis(due.saturating_sub(self.now_ms)))
    }

    /// Remove the earliest timer due at or before `limit_ms`, moving the clock to its due time
    ///
    /// Timers with the same due time come out in scheduling order.
    pub fn pop_due(&mut self, limit_ms: u64) -> Option<(TimerId, TimerTask)> {
        let index = self
            .queue
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_at <= limit_ms)
            .min_by_key(|(_, t)| (t.due_at, t.id))
            .map(|(i, _)| i)?;
        let timer = self.queue.remove(index);
        self.now_ms = self.now_ms.max(timer.due_at);
        Some((timer.id, timer.task))
    }

    /// Move the clock to `target_ms` without running anything
    pub fn set_now(&mut self, target_ms: u64) {
        self.now_ms = self.now_ms.max(target_ms);
    }

}

pub(crate) fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
