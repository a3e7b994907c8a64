//! Motion-repeat detection.
//!
//! Watches raw navigation keys per buffer and reports a trigger once the same
//! key was pressed `threshold` times, each press within `timeout_ms` of the
//! previous one. Held-key auto-repeat and explicit counts never trigger.

use rustc_hash::FxHashMap;

use crate::config::MotionConfig;
use crate::error::{EngineError, Result};
use crate::timers::{TimerKind, Timers};
use crate::types::{BufferId, MotionOutcome};

#[derive(Debug, Default, Clone)]
struct Counts {
    current: Option<u32>,
}

impl Counts {
    fn push_digit(&mut self, d: u32) {
        let next = self
            .current
            .unwrap_or(0)
            .saturating_mul(10)
            .saturating_add(d);
        self.current = Some(next);
    }

    fn take(&mut self) -> Option<u32> {
        self.current.take()
    }
}

/// Counting state of one buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MotionPhase {
    #[default]
    Idle,
    Counting {
        key: char,
        count: u32,
        last_timestamp: u64,
    },
}

impl MotionPhase {
    pub fn count(&self) -> u32 {
        match self {
            MotionPhase::Idle => 0,
            MotionPhase::Counting { count, .. } => *count,
        }
    }
}

#[derive(Debug, Default, Clone)]
struct BufferMotion {
    phase: MotionPhase,
    last_raw: Option<(char, u64)>,
    repeating: bool,
    prefix: Counts,
}

#[derive(Debug)]
pub struct MotionDetector {
    config: MotionConfig,
    buffers: FxHashMap<BufferId, BufferMotion>,
    timers: Timers,
}

impl MotionDetector {
    pub fn new(config: MotionConfig) -> Self {
        Self {
            config,
            buffers: FxHashMap::default(),
            timers: Timers::new(),
        }
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    /// Feeds one motion key pressed at `now` milliseconds.
    ///
    /// Unknown keys are rejected without touching any state.
    pub fn on_motion_key(&mut self, buffer: BufferId, key: char, now: u64) -> Result<MotionOutcome> {
        if !self.config.keys.contains(&key) {
            return Err(EngineError::InvalidMotionKey(key));
        }
        if !self.config.enabled {
            return Ok(MotionOutcome::default());
        }

        let state = self.buffers.entry(buffer).or_default();
        let previous = state.last_raw.replace((key, now));
        // A count applies to the next press, repeated or not
        let counted = state.prefix.take().is_some();

        if self.config.suppress_key_repeat {
            let repeat = previous.is_some_and(|(prev_key, at)| {
                let gap = now.saturating_sub(at);
                prev_key == key
                    && (gap < self.config.key_repeat_threshold_ms
                        || (state.repeating && gap < self.config.key_repeat_reset_delay_ms))
            });
            if repeat {
                if counted {
                    state.phase = MotionPhase::Idle;
                    self.timers.cancel(buffer, TimerKind::MotionTimeout);
                }
                state.repeating = true;
                self.timers.schedule(
                    buffer,
                    TimerKind::RepeatReset,
                    now.saturating_add(self.config.key_repeat_reset_delay_ms),
                );
                return Ok(MotionOutcome {
                    trigger: false,
                    suppressed: true,
                });
            }
            if state.repeating {
                state.repeating = false;
                self.timers.cancel(buffer, TimerKind::RepeatReset);
            }
        }

        // An explicit count already says where to go
        if counted {
            state.phase = MotionPhase::Idle;
            self.timers.cancel(buffer, TimerKind::MotionTimeout);
            return Ok(MotionOutcome::default());
        }

        let count = match state.phase {
            MotionPhase::Counting {
                key: last_key,
                count,
                last_timestamp,
            } if last_key == key
                && now.saturating_sub(last_timestamp) <= self.config.timeout_ms =>
            {
                count + 1
            }
            _ => 1,
        };

        if count >= self.config.threshold_for(key) {
            log::debug!("motion {key:?} repeated {count} times in {buffer:?}, requesting hints");
            state.phase = MotionPhase::Idle;
            self.timers.cancel(buffer, TimerKind::MotionTimeout);
            return Ok(MotionOutcome {
                trigger: true,
                suppressed: false,
            });
        }

        state.phase = MotionPhase::Counting {
            key,
            count,
            last_timestamp: now,
        };
        // The window is inclusive, so the reset fires one tick after it closes
        self.timers.schedule(
            buffer,
            TimerKind::MotionTimeout,
            now.saturating_add(self.config.timeout_ms).saturating_add(1),
        );
        Ok(MotionOutcome::default())
    }

    /// Feeds a count digit typed before a motion.
    ///
    /// Returns `false` for a leading `0`, which is a motion of its own, and
    /// for non-digits. A count resets the counting state and its window.
    pub fn on_count_digit(&mut self, buffer: BufferId, digit: char) -> bool {
        let Some(d) = digit.to_digit(10) else {
            return false;
        };
        let state = self.buffers.entry(buffer).or_default();
        if d == 0 && state.prefix.current.is_none() {
            return false;
        }
        state.prefix.push_digit(d);
        state.phase = MotionPhase::Idle;
        self.timers.cancel(buffer, TimerKind::MotionTimeout);
        true
    }

    /// Expires due timers. Timers only ever clear state.
    pub fn tick(&mut self, now: u64) {
        for handle in self.timers.expire(now) {
            let Some(state) = self.buffers.get_mut(&handle.buffer) else {
                continue;
            };
            match handle.kind {
                TimerKind::MotionTimeout => state.phase = MotionPhase::Idle,
                TimerKind::RepeatReset => state.repeating = false,
            }
        }
    }

    pub fn reset(&mut self, buffer: BufferId) {
        if let Some(state) = self.buffers.get_mut(&buffer) {
            state.phase = MotionPhase::Idle;
            state.prefix = Counts::default();
        }
        self.timers.cancel(buffer, TimerKind::MotionTimeout);
    }

    /// Drops all state of a closed buffer.
    pub fn forget_buffer(&mut self, buffer: BufferId) {
        self.buffers.remove(&buffer);
        self.timers.cancel_buffer(buffer);
    }

    pub fn phase(&self, buffer: BufferId) -> MotionPhase {
        self.buffers
            .get(&buffer)
            .map(|s| s.phase)
            .unwrap_or_default()
    }

    pub fn is_repeating(&self, buffer: BufferId) -> bool {
        self.buffers.get(&buffer).is_some_and(|s| s.repeating)
    }

    pub fn pending_count(&self, buffer: BufferId) -> Option<u32> {
        self.buffers.get(&buffer).and_then(|s| s.prefix.current)
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }
}
