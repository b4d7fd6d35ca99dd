//! Chaos interpolation and mode switching.
//!
//! The chaos factor is the single scalar that drives the whole scene
//! between "assembled" and "scattered". An open right hand pulls it toward
//! 1, its absence lets it relax toward 0, and every tick moves it a fixed
//! fraction of the remaining distance.
//!
//! Mode switching is a hysteresis latch on that scalar: crossing the upper
//! threshold advances one step (and disarms the latch), and the latch only
//! re-arms once chaos has fallen back below the lower threshold. One full
//! open-close cycle therefore advances exactly one step, no matter how long
//! the hand stays open. Even steps show the tree, odd steps show a glyph;
//! the glyph itself advances every two steps so each character gets one
//! tree interlude.

use crate::config::{CHAOS_SMOOTHING, SWITCH_DOWN_THRESHOLD, SWITCH_UP_THRESHOLD};
use crate::state::AnimationState;

/// Which shape the inner layers currently target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Tree,
    Glyph,
}

/// Smooths the chaos factor and derives mode and active glyph from the
/// accumulated step count.
#[derive(Debug)]
pub struct ChaosMachine {
    glyphs: Vec<char>,
    step_index: u64,
    switched: bool,
}

impl ChaosMachine {
    /// `glyphs` is the rotation the display cycles through; it must not be
    /// empty (the engine builder enforces this).
    pub fn new(glyphs: Vec<char>) -> Self {
        debug_assert!(!glyphs.is_empty());
        Self {
            glyphs,
            step_index: 0,
            switched: false,
        }
    }

    /// Advance one tick, deriving the chaos target from the right hand.
    ///
    /// Returns the new active glyph when this tick's step changed it, so
    /// the caller can retarget the glyph-capable layers.
    pub fn update(&mut self, state: &mut AnimationState) -> Option<char> {
        let target = match state.hands.right {
            Some(hand) if hand.is_open => 1.0,
            _ => 0.0,
        };
        self.update_with_target(target, state)
    }

    /// Advance one tick toward an explicit chaos target.
    ///
    /// A non-finite smoothing result aborts the whole tick: chaos, the
    /// latch, and the step count all keep their previous values.
    pub fn update_with_target(&mut self, target: f32, state: &mut AnimationState) -> Option<char> {
        let current = state.chaos_factor();
        let next = current + (target - current) * CHAOS_SMOOTHING;
        if !next.is_finite() {
            return None;
        }
        state.set_chaos_factor(next);
        let chaos = state.chaos_factor();

        let glyph_before = self.active_glyph();
        if chaos >= SWITCH_UP_THRESHOLD && !self.switched {
            self.step_index += 1;
            self.switched = true;
        }
        if chaos <= SWITCH_DOWN_THRESHOLD {
            self.switched = false;
        }
        let glyph_after = self.active_glyph();

        (glyph_after != glyph_before).then_some(glyph_after)
    }

    /// Current display mode, derived from the step count.
    #[inline]
    pub fn mode(&self) -> Mode {
        if self.step_index % 2 == 0 {
            Mode::Tree
        } else {
            Mode::Glyph
        }
    }

    /// The glyph the inner layers currently target (shown on odd steps).
    #[inline]
    pub fn active_glyph(&self) -> char {
        self.glyphs[(self.step_index / 2) as usize % self.glyphs.len()]
    }

    #[inline]
    pub fn step_index(&self) -> u64 {
        self.step_index
    }

    #[inline]
    pub fn glyphs(&self) -> &[char] {
        &self.glyphs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine() -> ChaosMachine {
        ChaosMachine::new(vec!['A', 'B', 'C'])
    }

    #[test]
    fn test_chaos_smoothing_converges() {
        let mut machine = machine();
        let mut state = AnimationState::new();
        let mut ticks = 0;
        while state.chaos_factor() < 0.999 {
            machine.update_with_target(1.0, &mut state);
            ticks += 1;
            assert!(ticks < 200, "smoothing failed to converge");
        }
        // 1 - 0.9^n < 0.001 at n = 66.
        assert!((60..=70).contains(&ticks), "converged in {} ticks", ticks);
    }

    #[test]
    fn test_one_step_per_open_close_cycle() {
        let mut machine = machine();
        let mut state = AnimationState::new();

        for cycle in 1..=4u64 {
            // Hold open well past the switch point.
            for _ in 0..120 {
                machine.update_with_target(1.0, &mut state);
            }
            assert_eq!(machine.step_index(), cycle, "extra steps while held open");
            // Release until the latch re-arms.
            for _ in 0..120 {
                machine.update_with_target(0.0, &mut state);
            }
            assert_eq!(machine.step_index(), cycle);
        }
    }

    #[test]
    fn test_exact_threshold_crossings_count() {
        let mut machine = machine();
        let mut state = AnimationState::new();

        state.set_chaos_factor(SWITCH_UP_THRESHOLD);
        // Target equal to current: chaos stays exactly at the threshold,
        // which still trips the latch.
        machine.update_with_target(SWITCH_UP_THRESHOLD, &mut state);
        assert_eq!(machine.step_index(), 1);

        state.set_chaos_factor(SWITCH_DOWN_THRESHOLD);
        machine.update_with_target(SWITCH_DOWN_THRESHOLD, &mut state);
        assert!(!machine.switched, "latch should re-arm at the lower bound");
    }

    #[test]
    fn test_mode_and_glyph_derivation() {
        let mut machine = machine();
        assert_eq!(machine.mode(), Mode::Tree);
        assert_eq!(machine.active_glyph(), 'A');

        machine.step_index = 1;
        assert_eq!(machine.mode(), Mode::Glyph);
        assert_eq!(machine.active_glyph(), 'A');

        machine.step_index = 2;
        assert_eq!(machine.mode(), Mode::Tree);
        assert_eq!(machine.active_glyph(), 'B');

        machine.step_index = 6;
        assert_eq!(machine.active_glyph(), 'A', "rotation wraps");
    }

    #[test]
    fn test_glyph_change_reported() {
        let mut machine = machine();
        let mut state = AnimationState::new();

        // Step 0 -> 1: mode flips but glyph stays 'A'.
        state.set_chaos_factor(0.9);
        assert_eq!(machine.update_with_target(0.9, &mut state), None);

        // Re-arm, then step 1 -> 2: glyph advances to 'B'.
        state.set_chaos_factor(0.05);
        machine.update_with_target(0.0, &mut state);
        state.set_chaos_factor(0.9);
        assert_eq!(machine.update_with_target(0.9, &mut state), Some('B'));
    }

    #[test]
    fn test_nan_target_aborts_tick() {
        let mut machine = machine();
        let mut state = AnimationState::new();
        state.set_chaos_factor(0.85);
        machine.update_with_target(1.0, &mut state);
        assert_eq!(machine.step_index(), 1);
        assert!(machine.switched);

        let chaos_before = state.chaos_factor();
        assert_eq!(machine.update_with_target(f32::NAN, &mut state), None);
        assert_eq!(state.chaos_factor(), chaos_before);
        assert_eq!(machine.step_index(), 1);
        assert!(machine.switched, "latch preserved across aborted tick");
    }
}
