//! Frame-driven one-shot timers
//!
//! Nothing runs on another thread: tasks become due at a timestamp and are
//! handed back to the session on the first frame at or after it.

use std::time::Duration;

/// Work deferred to a later frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredTask {
    /// Fire the held launch ball if `generation` is still current
    ReleaseLaunch { generation: u64 },
}

#[derive(Debug, Clone)]
struct Scheduled {
    due: Duration,
    task: DeferredTask,
}

#[derive(Debug, Clone, Default)]
pub struct FrameTimer {
    pending: Vec<Scheduled>,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire-and-forget: `task` becomes due `delay` after `now`
    pub fn schedule_after(&mut self, now: Duration, delay: Duration, task: DeferredTask) {
        self.pending.push(Scheduled {
            due: now + delay,
            task,
        });
    }

    /// Remove and return every task due at `now`, earliest first (ties keep scheduling order)
    pub fn take_due(&mut self, now: Duration) -> Vec<DeferredTask> {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|s| s.due <= now);
        self.pending = pending;
        due.sort_by_key(|s| s.due);
        due.into_iter().map(|s| s.task).collect()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
