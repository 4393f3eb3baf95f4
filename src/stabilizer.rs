// src/stabilizer.rs - unanimity debounce over the candidate intent stream
use std::collections::VecDeque;

use tracing::info;

use crate::classifier::Intent;

/// Consecutive identical candidates required before a change commits.
pub const DEFAULT_WINDOW: usize = 3;

/// Emitted when the stable intent actually changes value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntentTransition {
    pub from: Intent,
    pub to: Intent,
}

/// Converts the flicker-prone per-frame candidate stream into a stable
/// intent that only moves on sustained agreement.
///
/// Holds the last `window` raw candidates in a FIFO; the stable value
/// changes only when the buffer is full and unanimous. Disagreement leaves
/// it stuck on its previous value, so single-frame misclassifications from
/// detector jitter never surface. No-hand frames are handled upstream and
/// never reach this type.
#[derive(Debug)]
pub struct IntentStabilizer {
    buffer: VecDeque<Intent>,
    window: usize,
    stable: Intent,
}

impl IntentStabilizer {
    pub fn new() -> Self {
        Self::with_window(DEFAULT_WINDOW)
    }

    pub fn with_window(window: usize) -> Self {
        let window = window.max(1);
        Self {
            buffer: VecDeque::with_capacity(window),
            window,
            stable: Intent::Listening,
        }
    }

    /// Push this frame's candidate; returns a transition when the stable
    /// intent changes, which happens at most once per call.
    pub fn observe(&mut self, candidate: Intent) -> Option<IntentTransition> {
        self.buffer.push_back(candidate);
        if self.buffer.len() > self.window {
            self.buffer.pop_front();
        }

        let unanimous =
            self.buffer.len() == self.window && self.buffer.iter().all(|i| *i == candidate);
        if unanimous && candidate != self.stable {
            let transition = IntentTransition {
                from: self.stable,
                to: candidate,
            };
            info!("intent changed: {} -> {}", transition.from, transition.to);
            self.stable = candidate;
            return Some(transition);
        }
        None
    }

    pub fn stable(&self) -> Intent {
        self.stable
    }

    /// Raw candidates currently buffered, at most the window size.
    pub fn buffer_len(&self) -> usize {
        self.buffer.len()
    }
}

impl Default for IntentStabilizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_identical_candidates_commit() {
        let mut stab = IntentStabilizer::new();
        assert!(stab.observe(Intent::Peace).is_none());
        assert!(stab.observe(Intent::Peace).is_none());
        let transition = stab.observe(Intent::Peace).expect("third frame commits");
        assert_eq!(transition.from, Intent::Listening);
        assert_eq!(transition.to, Intent::Peace);
        assert_eq!(stab.stable(), Intent::Peace);
    }

    #[test]
    fn disagreement_leaves_stable_untouched() {
        let mut stab = IntentStabilizer::new();
        assert!(stab.observe(Intent::Stop).is_none());
        assert!(stab.observe(Intent::Stop).is_none());
        // Buffer is now [STOP, STOP, PEACE]: no unanimity, no change.
        assert!(stab.observe(Intent::Peace).is_none());
        assert_eq!(stab.stable(), Intent::Listening);
    }

    #[test]
    fn stable_is_sticky_through_noise() {
        let mut stab = IntentStabilizer::new();
        for _ in 0..3 {
            stab.observe(Intent::Stop);
        }
        assert_eq!(stab.stable(), Intent::Stop);

        // A burst of disagreeing frames never reverts the committed value.
        stab.observe(Intent::Peace);
        stab.observe(Intent::Wait);
        stab.observe(Intent::Peace);
        assert_eq!(stab.stable(), Intent::Stop);
    }

    #[test]
    fn no_transition_when_unanimous_on_current_value() {
        let mut stab = IntentStabilizer::new();
        for _ in 0..3 {
            stab.observe(Intent::Stop);
        }
        // Continued agreement on the already-stable value is not an event.
        assert!(stab.observe(Intent::Stop).is_none());
        assert!(stab.observe(Intent::Stop).is_none());
        assert_eq!(stab.stable(), Intent::Stop);
    }

    #[test]
    fn buffer_never_exceeds_window() {
        let mut stab = IntentStabilizer::new();
        for _ in 0..10 {
            stab.observe(Intent::Wait);
        }
        assert_eq!(stab.buffer_len(), DEFAULT_WINDOW);
    }

    #[test]
    fn recommit_after_interruption_needs_a_full_run() {
        let mut stab = IntentStabilizer::new();
        for _ in 0..3 {
            stab.observe(Intent::Stop);
        }
        stab.observe(Intent::Peace);
        stab.observe(Intent::Peace);
        // [STOP, PEACE, PEACE] is not unanimous yet.
        assert_eq!(stab.stable(), Intent::Stop);
        let transition = stab.observe(Intent::Peace).expect("unanimous window");
        assert_eq!(transition.from, Intent::Stop);
        assert_eq!(transition.to, Intent::Peace);
    }
}
