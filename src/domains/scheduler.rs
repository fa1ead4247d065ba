use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::common::{DomainError, DomainResult};

/// Anything a recurring timer can drive.
pub trait Tickable {
    fn on_tick(&mut self, now: Duration);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

struct RecurringTimer {
    id: TimerId,
    due: Duration,
    seq: u64,
    interval: Duration,
    target: Weak<RefCell<dyn Tickable>>,
}

// Min-heap on (due, seq): earliest first, ties in insertion order.
impl Ord for RecurringTimer {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for RecurringTimer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for RecurringTimer {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for RecurringTimer {}

/// Single-threaded discrete-event scheduler on a virtual clock.
///
/// Timers hold only a weak reference to their target: once the target is
/// dropped the timer is discarded instead of fired. A timer is re-armed
/// after its target's tick returns, so ticks of one target never overlap.
pub struct EventScheduler {
    now: Duration,
    next_seq: u64,
    next_id: u64,
    queue: BinaryHeap<RecurringTimer>,
    cancelled: HashSet<TimerId>,
    fired: u64,
}

impl EventScheduler {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_seq: 0,
            next_id: 0,
            queue: BinaryHeap::new(),
            cancelled: HashSet::new(),
            fired: 0,
        }
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn fired(&self) -> u64 {
        self.fired
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Fire `target` every `interval`, first at `now + interval`.
    pub fn schedule_recurring<T>(&mut self, interval: Duration, target: &Rc<RefCell<T>>) -> DomainResult<TimerId>
    where
        T: Tickable + 'static,
    {
        if interval.is_zero() {
            return Err(DomainError::invalid_parameter(
                "interval",
                "recurring timers need a non-zero interval",
            ));
        }

        let due = self.now.checked_add(interval).ok_or_else(|| {
            DomainError::invalid_parameter("interval", "first fire time overflows the clock")
        })?;

        let target: Rc<RefCell<dyn Tickable>> = target.clone();
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.push(id, due, interval, Rc::downgrade(&target));
        Ok(id)
    }

    /// Stop a pending timer. Returns false if the timer is no longer queued.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        if !self.queue.iter().any(|timer| timer.id == id) {
            return false;
        }
        self.cancelled.insert(id)
    }

    fn push(&mut self, id: TimerId, due: Duration, interval: Duration, target: Weak<RefCell<dyn Tickable>>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(RecurringTimer { id, due, seq, interval, target });
    }

    /// Fire the earliest timer due at or before `end`. Returns false when
    /// nothing is left to fire in that window.
    pub fn step(&mut self, end: Duration) -> bool {
        loop {
            match self.queue.peek() {
                Some(next) if next.due <= end => {}
                _ => return false,
            }
            let Some(timer) = self.queue.pop() else {
                return false;
            };

            if self.cancelled.remove(&timer.id) {
                tracing::debug!("Timer {:?} cancelled", timer.id);
                continue;
            }

            let Some(target) = timer.target.upgrade() else {
                tracing::debug!("Timer {:?} target dropped, discarding", timer.id);
                continue;
            };

            self.now = timer.due;
            target.borrow_mut().on_tick(self.now);
            self.fired += 1;

            match timer.due.checked_add(timer.interval) {
                Some(due) => self.push(timer.id, due, timer.interval, timer.target),
                None => tracing::warn!(
                    "Timer {:?} dropped: next fire time overflows the clock",
                    timer.id
                ),
            }
            return true;
        }
    }

    /// Fire every timer due up to and including `end`, then park the clock
    /// at `end`. Returns the number of ticks fired.
    pub fn run_until(&mut self, end: Duration) -> u64 {
        let before = self.fired;
        while self.step(end) {}
        if end > self.now {
            self.now = end;
        }
        self.fired - before
    }
}

impl Default for EventScheduler {
    fn default() -> Self {
        Self::new()
    }
}
