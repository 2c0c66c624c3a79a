//! Delayed continuations on a virtual clock
//!
//! The transition controller sequences its phases with two scheduled
//! continuations: the pre-forward delay that gives the destination one
//! layout pass to report bounds, and the settle/cleanup step at the end of
//! each animation leg. Timers are cancelable so a reversal mid-flight can
//! retract a pending settle.
//!
//! Time is virtual: the host frame loop advances the clock explicitly with
//! [`TimerService::advance`], which drains due continuations in deadline
//! order. The service never executes callbacks itself - the runtime runs
//! them after releasing the lock, so a continuation may schedule or cancel
//! timers without deadlocking.

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::sync::{Arc, Mutex};

new_key_type! {
    /// Handle to a scheduled continuation
    pub struct TimerId;
}

/// A scheduled continuation
pub type TimerCallback = Box<dyn FnOnce() + Send>;

struct ScheduledTimer {
    deadline_ms: f64,
    /// Insertion order, breaks deadline ties
    seq: u64,
    callback: TimerCallback,
}

/// Virtual-clock timer queue
pub struct TimerService {
    timers: SlotMap<TimerId, ScheduledTimer>,
    now_ms: f64,
    next_seq: u64,
}

/// Timer service shared across controllers and the runtime
pub type SharedTimers = Arc<Mutex<TimerService>>;

impl TimerService {
    pub fn new() -> Self {
        Self {
            timers: SlotMap::with_key(),
            now_ms: 0.0,
            next_seq: 0,
        }
    }

    /// Current virtual time
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Schedule `callback` to fire once `delay_ms` has elapsed
    pub fn schedule<F>(&mut self, delay_ms: f32, callback: F) -> TimerId
    where
        F: FnOnce() + Send + 'static,
    {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.insert(ScheduledTimer {
            deadline_ms: self.now_ms + delay_ms.max(0.0) as f64,
            seq,
            callback: Box::new(callback),
        })
    }

    /// Cancel a pending timer. Returns false if it already fired or was
    /// cancelled before.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.timers.remove(id).is_some()
    }

    /// Number of pending timers
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Advance the clock and drain continuations whose deadline passed.
    ///
    /// Callbacks are returned in deadline order (insertion order on ties)
    /// for the caller to execute once the service is unlocked.
    pub fn advance(&mut self, dt_ms: f32) -> SmallVec<[TimerCallback; 4]> {
        self.now_ms += dt_ms.max(0.0) as f64;

        let mut due: SmallVec<[(TimerId, f64, u64); 4]> = self
            .timers
            .iter()
            .filter(|(_, t)| t.deadline_ms <= self.now_ms)
            .map(|(id, t)| (id, t.deadline_ms, t.seq))
            .collect();
        due.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.2.cmp(&b.2)));

        due.into_iter()
            .filter_map(|(id, _, _)| self.timers.remove(id).map(|t| t.callback))
            .collect()
    }
}

impl Default for TimerService {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a shareable timer service
pub fn shared_timers() -> SharedTimers {
    Arc::new(Mutex::new(TimerService::new()))
}
