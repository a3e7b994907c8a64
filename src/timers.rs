//! Deadlines for per-buffer state resets.
//!
//! A timer is identified by its buffer and kind. Scheduling replaces any
//! pending timer with the same identity and bumps a generation counter, so a
//! superseded deadline can never fire. Time is supplied by the caller in
//! milliseconds; nothing runs in the background.

use rustc_hash::FxHashMap;

use crate::types::BufferId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimerKind {
    /// The motion counting window ran out.
    MotionTimeout,
    /// No key-repeat events for the reset delay.
    RepeatReset,
}

/// Handle of a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle {
    pub buffer: BufferId,
    pub kind: TimerKind,
    pub generation: u64,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    deadline: u64,
    generation: u64,
}

#[derive(Debug, Default)]
pub struct Timers {
    pending: FxHashMap<(BufferId, TimerKind), Pending>,
    generation: u64,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules a timer, cancelling the previous one of the same identity.
    pub fn schedule(&mut self, buffer: BufferId, kind: TimerKind, deadline: u64) -> TimerHandle {
        self.generation += 1;
        let generation = self.generation;
        self.pending.insert(
            (buffer, kind),
            Pending {
                deadline,
                generation,
            },
        );
        TimerHandle {
            buffer,
            kind,
            generation,
        }
    }

    pub fn cancel(&mut self, buffer: BufferId, kind: TimerKind) {
        self.pending.remove(&(buffer, kind));
    }

    /// Cancels through a handle; a no-op if the timer was rescheduled since.
    pub fn cancel_handle(&mut self, handle: TimerHandle) {
        if self.is_live(handle) {
            self.pending.remove(&(handle.buffer, handle.kind));
        }
    }

    pub fn cancel_buffer(&mut self, buffer: BufferId) {
        self.pending.retain(|(b, _), _| *b != buffer);
    }

    pub fn is_live(&self, handle: TimerHandle) -> bool {
        self.pending
            .get(&(handle.buffer, handle.kind))
            .is_some_and(|p| p.generation == handle.generation)
    }

    pub fn deadline(&self, buffer: BufferId, kind: TimerKind) -> Option<u64> {
        self.pending.get(&(buffer, kind)).map(|p| p.deadline)
    }

    /// Removes and returns every timer whose deadline is at or before `now`,
    /// ordered by deadline.
    pub fn expire(&mut self, now: u64) -> Vec<TimerHandle> {
        let mut fired: Vec<(u64, TimerHandle)> = self
            .pending
            .iter()
            .filter(|(_, p)| p.deadline <= now)
            .map(|(&(buffer, kind), p)| {
                (
                    p.deadline,
                    TimerHandle {
                        buffer,
                        kind,
                        generation: p.generation,
                    },
                )
            })
            .collect();
        fired.sort_by_key(|(deadline, h)| (*deadline, h.generation));
        for (_, handle) in &fired {
            self.pending.remove(&(handle.buffer, handle.kind));
        }
        fired.into_iter().map(|(_, handle)| handle).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
