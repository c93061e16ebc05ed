//! Deterministic tick-driven timers.
//!
//! Sherpa introduces no background threads: the host's event loop calls
//! [`TimerQueue::fire_due`] whenever it ticks, and due timers hand back their
//! tags in a deterministic order (deadline first, then creation order).
//! Cancellation is immediate; a cancelled timer can never fire afterwards,
//! which is what makes overlay teardown safe ("no dangling timers may fire
//! after teardown").

use std::time::{Duration, Instant};

/// Handle to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone, Copy)]
enum Repeat {
    Once,
    Every(Duration),
}

#[derive(Debug)]
struct TimerEntry<T> {
    id: TimerId,
    deadline: Instant,
    repeat: Repeat,
    tag: T,
}

/// A queue of one-shot and repeating deadlines.
///
/// `T` is the tag returned when a timer fires; callers dispatch on it.
#[derive(Debug)]
pub struct TimerQueue<T> {
    entries: Vec<TimerEntry<T>>,
    next_id: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    /// Schedule a one-shot timer `after` from `now`.
    pub fn schedule_once(&mut self, now: Instant, after: Duration, tag: T) -> TimerId {
        self.push(now + after, Repeat::Once, tag)
    }

    /// Schedule a repeating timer firing every `every` from `now`.
    pub fn schedule_repeating(&mut self, now: Instant, every: Duration, tag: T) -> TimerId {
        self.push(now + every, Repeat::Every(every), tag)
    }

    fn push(&mut self, deadline: Instant, repeat: Repeat, tag: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(TimerEntry {
            id,
            deadline,
            repeat,
            tag,
        });
        id
    }

    /// Cancel a timer.
    ///
    /// Returns `true` if the timer was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    /// Cancel every pending timer.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of pending timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no timers are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Earliest pending deadline, for hosts that want to sleep until it.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|entry| entry.deadline).min()
    }
}

impl<T: Clone> TimerQueue<T> {
    /// Collect the tags of every timer due at `now`.
    ///
    /// One-shot timers are removed; repeating timers are rescheduled from
    /// their previous deadline. Tags come back ordered by deadline, ties
    /// broken by creation order.
    pub fn fire_due(&mut self, now: Instant) -> Vec<T> {
        let mut due: Vec<(Instant, TimerId, T)> = Vec::new();
        let mut remaining = Vec::with_capacity(self.entries.len());

        for mut entry in self.entries.drain(..) {
            if entry.deadline <= now {
                due.push((entry.deadline, entry.id, entry.tag.clone()));
                if let Repeat::Every(every) = entry.repeat {
                    entry.deadline += every;
                    // Catch up rather than firing a burst after a long stall.
                    if entry.deadline <= now {
                        entry.deadline = now + every;
                    }
                    remaining.push(entry);
                }
            } else {
                remaining.push(entry);
            }
        }

        self.entries = remaining;
        due.sort_by_key(|(deadline, id, _)| (*deadline, id.0));
        due.into_iter().map(|(_, _, tag)| tag).collect()
    }
}
