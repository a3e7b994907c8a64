//! Continuous jump loop.
//!
//! Tracks whether hints should come back after a jump. The controller only
//! decides; the engine performs the hide, recenter and redisplay calls in the
//! order these decisions dictate.

use crate::config::ContinuousConfig;
use crate::types::Location;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoopState {
    #[default]
    Inactive,
    Active { origin: Location, jump_count: u32 },
}

/// Why a loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// A keystroke matched no hint.
    NoMatch,
    /// The cancel key was pressed.
    Cancelled,
    /// The jump landed in another buffer or window.
    LeftOrigin,
    /// `max_jumps` was reached.
    JumpCap,
    /// A host call failed.
    HostFailure,
}

/// What the engine should do after a jump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpStep {
    /// Continuous mode is off; the jump ends the cycle.
    SingleShot,
    /// Recenter, then call [`ContinuousLoop::advance`].
    Recenter,
    /// The loop ended.
    Exit(ExitReason),
}

#[derive(Debug)]
pub struct ContinuousLoop {
    config: ContinuousConfig,
    state: LoopState,
}

impl ContinuousLoop {
    pub fn new(config: ContinuousConfig) -> Self {
        Self {
            config,
            state: LoopState::Inactive,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, LoopState::Active { .. })
    }

    pub fn jump_count(&self) -> u32 {
        match self.state {
            LoopState::Inactive => 0,
            LoopState::Active { jump_count, .. } => jump_count,
        }
    }

    pub fn max_jumps(&self) -> u32 {
        self.config.max_jumps
    }

    /// Records a jump that started at `origin` and landed at `landed`.
    ///
    /// The first jump with continuous mode enabled starts the loop.
    pub fn on_jump(&mut self, origin: Location, landed: Location) -> JumpStep {
        if !self.config.enabled {
            return JumpStep::SingleShot;
        }
        let origin = match self.state {
            LoopState::Active { origin, .. } => origin,
            LoopState::Inactive => {
                log::debug!("starting continuous loop in {origin:?}");
                self.state = LoopState::Active {
                    origin,
                    jump_count: 0,
                };
                origin
            }
        };
        if landed != origin {
            self.stop(ExitReason::LeftOrigin);
            return JumpStep::Exit(ExitReason::LeftOrigin);
        }
        JumpStep::Recenter
    }

    /// Counts the jump after a successful recenter.
    ///
    /// Returns the exit reason when the jump cap is reached.
    pub fn advance(&mut self) -> Result<u32, ExitReason> {
        let LoopState::Active { origin, jump_count } = self.state else {
            return Err(ExitReason::Cancelled);
        };
        let jump_count = jump_count + 1;
        if jump_count >= self.config.max_jumps {
            log::warn!(
                "continuous jump limit of {} reached, stopping",
                self.config.max_jumps
            );
            self.stop(ExitReason::JumpCap);
            return Err(ExitReason::JumpCap);
        }
        self.state = LoopState::Active { origin, jump_count };
        Ok(jump_count)
    }

    /// Leaves the loop and resets the jump count.
    pub fn stop(&mut self, reason: ExitReason) {
        if self.is_active() {
            log::debug!(
                "continuous loop stopped after {} jumps: {reason:?}",
                self.jump_count()
            );
        }
        self.state = LoopState::Inactive;
    }
}
