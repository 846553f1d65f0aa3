//! Event Loop Implementation
//!
//! Timer queue on a virtual clock. Time only moves when the host advances it,
//! so watchdog behaviour is deterministic.

use std::time::Duration;

use crate::watcher::RequestId;

/// Timer handle
pub type TimerId = u32;

/// Work a timer performs when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTask {
    /// Check whether a wait request is still pending
    Watchdog(RequestId),
}

/// Anything that can run a task after a delay
pub trait Scheduler {
    fn schedule(&mut self, task: TimerTask, delay: Duration) -> TimerId;
}

/// Timer task
#[derive(Debug, Clone)]
struct Timer {
    id: TimerId,
    task: TimerTask,
    delay: Duration,
    scheduled_at: Duration,
}

impl Timer {
    fn due_at(&self) -> Duration {
        self.scheduled_at + self.delay
    }
}

/// Timer event loop
#[derive(Debug, Default)]
pub struct EventLoop {
    /// Pending timers
    timers: Vec<Timer>,
    /// Next timer ID
    next_timer_id: TimerId,
    /// Current virtual time
    current_time: Duration,
}

impl EventLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a timeout
    pub fn set_timeout(&mut self, task: TimerTask, delay: Duration) -> TimerId {
        let id = self.next_timer_id;
        self.next_timer_id += 1;
        self.timers.push(Timer {
            id,
            task,
            delay,
            scheduled_at: self.current_time,
        });
        id
    }

    /// Clear a timeout; false if it already fired or never existed
    pub fn clear_timer(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    /// Pop the earliest timer due at or before `deadline`.
    ///
    /// The clock moves to the timer's due time, so anything scheduled while
    /// handling it is measured from there. Ties fire in scheduling order.
    pub fn next_due(&mut self, deadline: Duration) -> Option<TimerTask> {
        let (index, _) = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_at() <= deadline)
            .min_by_key(|(_, t)| (t.due_at(), t.id))?;

        let timer = self.timers.remove(index);
        self.current_time = self.current_time.max(timer.due_at());
        Some(timer.task)
    }

    /// Move the clock forward to `time` (never backwards)
    pub fn advance_to(&mut self, time: Duration) {
        self.current_time = self.current_time.max(time);
    }

    /// Check if there are pending timers
    pub fn has_pending_timers(&self) -> bool {
        !self.timers.is_empty()
    }

    /// Number of pending timers
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Get current time
    pub fn current_time(&self) -> Duration {
        self.current_time
    }
}

impl Scheduler for EventLoop {
    fn schedule(&mut self, task: TimerTask, delay: Duration) -> TimerId {
        self.set_timeout(task, delay)
    }
}
