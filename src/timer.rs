//! Cancellable delayed actions driven by the event loop clock.
//!
//! Time is passed in as milliseconds since an arbitrary start so the loop
//! and tests share one notion of "now".

/// An action that fires once, `delay_ms` after it was last armed.
///
/// Re-arming while pending restarts the wait, so a burst of arms yields a
/// single firing timed from the last one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelayedAction {
    delay_ms: u64,
    armed_at: Option<u64>,
}

impl DelayedAction {
    pub const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            armed_at: None,
        }
    }

    pub const fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    /// Arm, or re-arm, the action at `now_ms`.
    pub const fn arm(&mut self, now_ms: u64) {
        self.armed_at = Some(now_ms);
    }

    pub const fn cancel(&mut self) {
        self.armed_at = None;
    }

    pub const fn is_pending(&self) -> bool {
        self.armed_at.is_some()
    }

    /// Returns true exactly once when the delay has elapsed, disarming the action.
    pub fn take_ready(&mut self, now_ms: u64) -> bool {
        let Some(armed_at) = self.armed_at else {
            return false;
        };
        if now_ms.saturating_sub(armed_at) >= self.delay_ms {
            self.armed_at = None;
            true
        } else {
            false
        }
    }

    /// Milliseconds left before the action is ready, if armed.
    pub fn remaining_ms(&self, now_ms: u64) -> Option<u64> {
        self.armed_at
            .map(|armed_at| self.delay_ms.saturating_sub(now_ms.saturating_sub(armed_at)))
    }
}
