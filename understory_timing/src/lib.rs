// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_timing --heading-base-level=0

//! Understory Timing: host-agnostic timer queue primitives for UI runtimes.
//!
//! UI behaviour is full of small one-shot delays: show a tooltip after a
//! hover settles, hide it after a grace period, start a long-press, blink a
//! caret. This crate provides [`TimerQueue`], a deadline-ordered set of such
//! timers that a host drives from its own event loop.
//!
//! The queue never reads a clock. Time is a [`Duration`] measured from any
//! monotonic origin the host chooses (application start, the first frame, a
//! test's fake clock), and the host pulls due timers with
//! [`TimerQueue::pop_due`]. This keeps every consumer deterministic and makes
//! tests trivial: advance a number, not a wall clock.
//!
//! ## Cancellation
//!
//! Each scheduled timer is identified by a [`TimerId`]. Ids are generational:
//! once a timer has fired or been cancelled, its id is dead forever, even if
//! the underlying slot is reused for a later timer. Cancelling a dead id is a
//! no-op that returns `None`, so callers can cancel unconditionally.
//!
//! Cancellation alone is not a liveness guarantee for the *payload*. A host
//! that pops a batch of due timers and then runs their bodies may still run a
//! body whose owner changed state earlier in the same batch. Consumers that
//! care should carry an epoch in the payload and check it when the body runs.
//!
//! ## Minimal example
//!
//! ```rust
//! use core::time::Duration;
//! use understory_timing::TimerQueue;
//!
//! let mut timers = TimerQueue::new();
//! let now = Duration::from_millis(1_000);
//!
//! let caret = timers.schedule_after(now, Duration::from_millis(500), "caret");
//! let press = timers.schedule_after(now, Duration::from_millis(300), "long-press");
//! assert_eq!(timers.next_deadline(), Some(Duration::from_millis(1_300)));
//!
//! // The pointer was released: the long-press never happens.
//! assert_eq!(timers.cancel(press), Some("long-press"));
//!
//! assert!(timers.pop_due(Duration::from_millis(1_400)).is_none());
//! assert_eq!(
//!     timers.pop_due(Duration::from_millis(1_500)),
//!     Some((caret, "caret"))
//! );
//! assert!(timers.is_empty());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::collections::BinaryHeap;
use alloc::vec::Vec;
use core::cmp::Reverse;
use core::time::Duration;

/// Handle to a timer scheduled on a [`TimerQueue`].
///
/// Handles are generational: a handle becomes stale once its timer fires or is
/// cancelled and never refers to a different timer afterwards.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId {
    index: u32,
    generation: u32,
}

#[derive(Clone, Debug)]
struct Slot<T> {
    generation: u32,
    entry: Option<Entry<T>>,
}

#[derive(Clone, Debug)]
struct Entry<T> {
    deadline: Duration,
    payload: T,
}

/// Heap key: deadline, then scheduling sequence for FIFO ties, then the slot.
type HeapKey = Reverse<(Duration, u64, u32, u32)>;

/// A deadline-ordered queue of cancellable one-shot timers.
///
/// `T` is the payload handed back when a timer comes due. Typical payloads are
/// small enums naming the task to run plus whatever liveness information the
/// consumer needs to validate it.
///
/// Cancellation uses lazy deletion: cancelled entries stay in the heap until
/// they reach the top or the heap is compacted. The queue maintains that the
/// top of the heap is always a live timer, so [`TimerQueue::next_deadline`]
/// is exact.
#[derive(Clone, Debug)]
pub struct TimerQueue<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    heap: BinaryHeap<HeapKey>,
    next_seq: u64,
    len: usize,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    /// Creates an empty queue.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            heap: BinaryHeap::new(),
            next_seq: 0,
            len: 0,
        }
    }

    /// Returns the number of pending timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no timer is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Schedules `payload` to come due at `deadline`.
    ///
    /// Timers with equal deadlines come due in the order they were scheduled.
    pub fn schedule_at(&mut self, deadline: Duration, payload: T) -> TimerId {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                let index = u32::try_from(self.slots.len())
                    .expect("timer queue cannot hold more than u32::MAX timers");
                self.slots.push(Slot {
                    generation: 0,
                    entry: None,
                });
                index
            }
        };
        let slot = &mut self.slots[index as usize];
        slot.entry = Some(Entry { deadline, payload });
        let generation = slot.generation;

        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse((deadline, seq, index, generation)));
        self.len += 1;

        TimerId { index, generation }
    }

    /// Schedules `payload` to come due `delay` after `now`.
    ///
    /// The deadline saturates at [`Duration::MAX`].
    pub fn schedule_after(&mut self, now: Duration, delay: Duration, payload: T) -> TimerId {
        self.schedule_at(now.saturating_add(delay), payload)
    }

    /// Cancels a pending timer and returns its payload.
    ///
    /// Returns `None` if the timer already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let entry = slot.entry.take()?;
        self.release(id.index);
        self.prune();
        Some(entry.payload)
    }

    /// Returns `true` if `id` names a timer that has neither fired nor been cancelled.
    #[must_use]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.is_live(id.index, id.generation)
    }

    /// Returns the deadline of a pending timer.
    #[must_use]
    pub fn deadline(&self, id: TimerId) -> Option<Duration> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.entry.as_ref().map(|entry| entry.deadline)
    }

    /// Returns the earliest deadline among pending timers.
    ///
    /// Hosts use this to decide how long their event loop may sleep.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.heap.peek().map(|Reverse((deadline, ..))| *deadline)
    }

    /// Removes and returns the earliest timer whose deadline is at or before `now`.
    ///
    /// Call in a loop to drain every due timer:
    ///
    /// ```rust
    /// use core::time::Duration;
    /// use understory_timing::TimerQueue;
    ///
    /// let mut timers = TimerQueue::new();
    /// timers.schedule_at(Duration::from_secs(1), 'a');
    /// timers.schedule_at(Duration::from_secs(2), 'b');
    /// timers.schedule_at(Duration::from_secs(3), 'c');
    ///
    /// let mut fired = Vec::new();
    /// while let Some((_, task)) = timers.pop_due(Duration::from_secs(2)) {
    ///     fired.push(task);
    /// }
    /// assert_eq!(fired, ['a', 'b']);
    /// assert_eq!(timers.len(), 1);
    /// ```
    pub fn pop_due(&mut self, now: Duration) -> Option<(TimerId, T)> {
        let &Reverse((deadline, _, index, generation)) = self.heap.peek()?;
        if deadline > now {
            return None;
        }
        self.heap.pop();
        let entry = self.slots[index as usize].entry.take();
        debug_assert!(entry.is_some(), "heap top must be a live timer");
        self.release(index);
        self.prune();
        entry.map(|entry| (TimerId { index, generation }, entry.payload))
    }

    /// Cancels every pending timer.
    ///
    /// All outstanding [`TimerId`]s become stale.
    pub fn clear(&mut self) {
        for index in 0..self.slots.len() {
            if self.slots[index].entry.take().is_some() {
                #[expect(clippy::cast_possible_truncation, reason = "bounded by schedule_at")]
                self.release(index as u32);
            }
        }
        self.heap.clear();
    }

    fn is_live(&self, index: u32, generation: u32) -> bool {
        self.slots
            .get(index as usize)
            .is_some_and(|slot| slot.generation == generation && slot.entry.is_some())
    }

    /// Returns an emptied slot to the free list and retires its handles.
    fn release(&mut self, index: u32) {
        let slot = &mut self.slots[index as usize];
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(index);
        self.len -= 1;
    }

    /// Restores the "heap top is live" invariant and bounds stale garbage.
    fn prune(&mut self) {
        while let Some(&Reverse((_, _, index, generation))) = self.heap.peek() {
            if self.is_live(index, generation) {
                break;
            }
            self.heap.pop();
        }
        if self.heap.len() > 2 * self.len + 32 {
            let slots = &self.slots;
            self.heap.retain(|Reverse((_, _, index, generation))| {
                slots
                    .get(*index as usize)
                    .is_some_and(|slot| slot.generation == *generation && slot.entry.is_some())
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn empty_queue_has_nothing_due() {
        let mut timers = TimerQueue::<u8>::new();
        assert!(timers.is_empty());
        assert_eq!(timers.next_deadline(), None);
        assert_eq!(timers.pop_due(Duration::MAX), None);
    }

    #[test]
    fn timers_fire_in_deadline_order() {
        let mut timers = TimerQueue::new();
        timers.schedule_at(ms(30), 3);
        timers.schedule_at(ms(10), 1);
        timers.schedule_at(ms(20), 2);

        let mut fired = Vec::new();
        while let Some((_, value)) = timers.pop_due(ms(100)) {
            fired.push(value);
        }
        assert_eq!(fired, [1, 2, 3]);
        assert!(timers.is_empty());
    }

    #[test]
    fn equal_deadlines_fire_in_scheduling_order() {
        let mut timers = TimerQueue::new();
        for value in 0..5 {
            timers.schedule_at(ms(10), value);
        }
        let mut fired = Vec::new();
        while let Some((_, value)) = timers.pop_due(ms(10)) {
            fired.push(value);
        }
        assert_eq!(fired, [0, 1, 2, 3, 4]);
    }

    #[test]
    fn deadline_is_inclusive() {
        let mut timers = TimerQueue::new();
        let id = timers.schedule_after(ms(100), ms(250), ());
        assert_eq!(timers.pop_due(ms(349)), None);
        assert_eq!(timers.pop_due(ms(350)), Some((id, ())));
    }

    #[test]
    fn cancel_returns_payload_once() {
        let mut timers = TimerQueue::new();
        let id = timers.schedule_at(ms(10), "task");
        assert!(timers.is_pending(id));
        assert_eq!(timers.cancel(id), Some("task"));
        assert_eq!(timers.cancel(id), None);
        assert!(!timers.is_pending(id));
        assert_eq!(timers.pop_due(ms(10)), None);
    }

    #[test]
    fn cancelled_timer_does_not_shadow_next_deadline() {
        let mut timers = TimerQueue::new();
        let early = timers.schedule_at(ms(10), 'a');
        timers.schedule_at(ms(20), 'b');
        assert_eq!(timers.next_deadline(), Some(ms(10)));

        timers.cancel(early);
        assert_eq!(timers.next_deadline(), Some(ms(20)));
        assert_eq!(timers.deadline(early), None);
    }

    #[test]
    fn fired_id_goes_stale_when_slot_is_reused() {
        let mut timers = TimerQueue::new();
        let first = timers.schedule_at(ms(1), 1);
        assert_eq!(timers.pop_due(ms(1)), Some((first, 1)));

        let second = timers.schedule_at(ms(2), 2);
        assert_ne!(first, second);
        assert!(!timers.is_pending(first));
        assert_eq!(timers.cancel(first), None);
        assert!(timers.is_pending(second));
    }

    #[test]
    fn saturating_schedule_after() {
        let mut timers = TimerQueue::new();
        let id = timers.schedule_after(Duration::MAX, ms(1), ());
        assert_eq!(timers.deadline(id), Some(Duration::MAX));
    }

    #[test]
    fn clear_retires_all_handles() {
        let mut timers = TimerQueue::new();
        let a = timers.schedule_at(ms(1), 'a');
        let b = timers.schedule_at(ms(2), 'b');
        timers.clear();

        assert!(timers.is_empty());
        assert!(!timers.is_pending(a));
        assert!(!timers.is_pending(b));
        assert_eq!(timers.next_deadline(), None);

        let c = timers.schedule_at(ms(3), 'c');
        assert_eq!(timers.pop_due(ms(3)), Some((c, 'c')));
    }

    #[test]
    fn repeated_rescheduling_keeps_heap_bounded() {
        let mut timers = TimerQueue::new();
        let mut id = timers.schedule_at(ms(1_000), 0_u32);
        for value in 1..1_000 {
            timers.cancel(id);
            id = timers.schedule_at(ms(1_000 + u64::from(value)), value);
        }
        assert_eq!(timers.len(), 1);
        assert!(timers.heap.len() <= 2 * timers.len() + 33);
        assert_eq!(timers.pop_due(Duration::MAX), Some((id, 999)));
    }
}
