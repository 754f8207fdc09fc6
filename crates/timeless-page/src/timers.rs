//! Timer queue (`setTimeout` / `clearTimeout`) and debounce.
//!
//! Timers fire in due order; timers due at the same instant fire in the
//! order they were scheduled.

use timeless_dom::NodeId;

/// Deferred work a timer runs when it comes due.
#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    /// Scroll to the section named by a URL fragment.
    HashScroll { id: String },
    /// Simulated submission delay has elapsed.
    SubmitSettled { form: NodeId, fields: Vec<(String, String)> },
    /// Resizing paused; recompute section scroll margins.
    SectionMargins,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Timer {
    id: TimerId,
    due_ms: f64,
    task: Task,
}

#[derive(Debug, Default)]
pub struct TimerQueue {
    next_id: u64,
    timers: Vec<Timer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` at `now_ms + delay_ms`.
    pub fn schedule(&mut self, now_ms: f64, delay_ms: f64, task: Task) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.timers.push(Timer {
            id,
            due_ms: now_ms + delay_ms.max(0.0),
            task,
        });
        id
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    /// Earliest due time among pending timers.
    pub fn next_due(&self) -> Option<f64> {
        self.timers.iter().map(|t| t.due_ms).reduce(f64::min)
    }

    /// Remove and return the earliest timer due at or before `now_ms`.
    pub fn pop_due(&mut self, now_ms: f64) -> Option<(TimerId, Task)> {
        let index = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= now_ms)
            .min_by(|(_, a), (_, b)| a.due_ms.total_cmp(&b.due_ms).then(a.id.cmp(&b.id)))
            .map(|(i, _)| i)?;
        let timer = self.timers.remove(index);
        Some((timer.id, timer.task))
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

/// Collapses a burst of triggers into one timer that fires `wait_ms`
/// after the last trigger.
#[derive(Debug, Clone, Default)]
pub struct Debounce {
    wait_ms: f64,
    pending: Option<TimerId>,
}

impl Debounce {
    pub fn new(wait_ms: f64) -> Self {
        Self {
            wait_ms,
            pending: None,
        }
    }

    pub fn trigger(&mut self, timers: &mut TimerQueue, now_ms: f64, task: Task) -> TimerId {
        if let Some(previous) = self.pending.take() {
            timers.cancel(previous);
        }
        let id = timers.schedule(now_ms, self.wait_ms, task);
        self.pending = Some(id);
        id
    }

    /// Forget the pending timer once it has fired.
    pub fn settle(&mut self, fired: TimerId) {
        if self.pending == Some(fired) {
            self.pending = None;
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
