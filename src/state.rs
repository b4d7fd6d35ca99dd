//! Process-wide animation state.
//!
//! One [`AnimationState`] exists per engine and is threaded explicitly
//! through every per-tick update; there are no globals. Each field has a
//! single writer per tick: the gesture extractor owns `hands` and
//! `hand_rotation_velocity`, the chaos machine owns `chaos_factor`, the
//! note board owns `focused_note`.

use glam::Vec3;

/// Per-hand signals for one frame. Overwritten every frame, never
/// historized beyond the smoothing filters that consume it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandSignal {
    /// Hand cursor position in world space.
    pub position: Vec3,
    /// Thumb and index tips are touching.
    pub is_pinching: bool,
    /// Hand is spread open (mutually exclusive with pinching; an ambiguous
    /// frame sets neither).
    pub is_open: bool,
}

/// Both hands for the current frame; either may be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Hands {
    pub left: Option<HandSignal>,
    pub right: Option<HandSignal>,
}

/// Stable identifier of a note entity.
pub type NoteId = usize;

/// Shared state mutated once per tick per writer.
#[derive(Debug, Clone)]
pub struct AnimationState {
    chaos_factor: f32,
    /// Smoothed yaw steering velocity from the right hand.
    pub hand_rotation_velocity: f32,
    /// Latest hand signals; `None` means not detected this frame.
    pub hands: Hands,
    /// The single note currently holding focus, if any.
    pub focused_note: Option<NoteId>,
}

impl AnimationState {
    pub fn new() -> Self {
        Self {
            chaos_factor: 0.0,
            hand_rotation_velocity: 0.0,
            hands: Hands::default(),
            focused_note: None,
        }
    }

    /// Current chaos factor, always finite and in [0, 1].
    #[inline]
    pub fn chaos_factor(&self) -> f32 {
        self.chaos_factor
    }

    /// Write the chaos factor, rejecting non-finite values.
    ///
    /// A NaN or infinite candidate leaves the previous value untouched so
    /// a single bad frame can never poison the animation.
    pub fn set_chaos_factor(&mut self, value: f32) {
        if value.is_finite() {
            self.chaos_factor = value.clamp(0.0, 1.0);
        }
    }
}

impl Default for AnimationState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nan_chaos_rejected() {
        let mut state = AnimationState::new();
        state.set_chaos_factor(0.42);
        state.set_chaos_factor(f32::NAN);
        assert_eq!(state.chaos_factor(), 0.42);
        state.set_chaos_factor(f32::INFINITY);
        assert_eq!(state.chaos_factor(), 0.42);
    }

    #[test]
    fn test_chaos_clamped_to_unit_interval() {
        let mut state = AnimationState::new();
        state.set_chaos_factor(1.7);
        assert_eq!(state.chaos_factor(), 1.0);
        state.set_chaos_factor(-0.3);
        assert_eq!(state.chaos_factor(), 0.0);
    }
}
