//! Gesture state extraction.
//!
//! Consumes one frame of raw hand-landmark data per tick and turns it into
//! the per-hand [`HandSignal`]s and the smoothed yaw steering velocity in
//! [`AnimationState`]. The landmark producer (webcam + recognition model)
//! is a black box upstream; this module only defines the contract of the
//! data it emits.
//!
//! Degradation rules: a missing frame means "no hands detected", not stale
//! hands; a frame whose timestamp has not advanced is skipped entirely; a
//! hand containing non-finite landmark coordinates is treated as absent.

use crate::config::{
    HAND_DEPTH, HAND_SPAN_X, HAND_SPAN_Y, OPEN_THRESHOLD, PINCH_THRESHOLD,
    ROTATION_DEAD_ZONE_MAX, ROTATION_DEAD_ZONE_MIN, ROTATION_MAX_SPEED, ROTATION_SMOOTHING,
};
use crate::state::{AnimationState, HandSignal, Hands};
use glam::Vec3;

// Landmark indices in the 21-point hand model.
pub const WRIST: usize = 0;
pub const THUMB_TIP: usize = 4;
pub const INDEX_TIP: usize = 8;
/// Number of keypoints per tracked hand.
pub const LANDMARK_COUNT: usize = 21;

/// Which side the recognizer labeled a hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handedness {
    Left,
    Right,
}

/// One detected hand: a side label plus ordered normalized keypoints
/// (x, y in [0, 1] image space, z relative depth).
#[derive(Debug, Clone)]
pub struct TrackedHand {
    pub handedness: Handedness,
    pub landmarks: [Vec3; LANDMARK_COUNT],
}

impl TrackedHand {
    fn is_finite(&self) -> bool {
        self.landmarks.iter().all(|p| p.is_finite())
    }
}

/// One frame from the recognition collaborator: 0–2 hands and the video
/// timestamp used for dedup.
#[derive(Debug, Clone)]
pub struct HandFrame {
    pub timestamp_ms: f64,
    pub hands: Vec<TrackedHand>,
}

/// Turns raw landmark frames into smoothed gesture state.
#[derive(Debug)]
pub struct GestureExtractor {
    rotation_velocity: f32,
    last_timestamp: Option<f64>,
}

impl GestureExtractor {
    pub fn new() -> Self {
        Self {
            rotation_velocity: 0.0,
            last_timestamp: None,
        }
    }

    /// Ingest the latest frame (or its absence) and update `state`.
    ///
    /// Returns `false` when the frame was skipped because its timestamp
    /// had not advanced; previous signals stay in place in that case.
    pub fn ingest(&mut self, frame: Option<&HandFrame>, state: &mut AnimationState) -> bool {
        let mut hands = Hands::default();
        let mut target_speed = 0.0;

        match frame {
            Some(frame) => {
                if self.last_timestamp == Some(frame.timestamp_ms) {
                    return false;
                }
                self.last_timestamp = Some(frame.timestamp_ms);

                for hand in &frame.hands {
                    if !hand.is_finite() {
                        continue;
                    }
                    let signal = classify(hand);
                    match hand.handedness {
                        Handedness::Left => hands.left = Some(signal),
                        Handedness::Right => {
                            hands.right = Some(signal);
                            target_speed = steering_target(hand.landmarks[WRIST].x);
                        }
                    }
                }
            }
            None => {
                self.last_timestamp = None;
            }
        }

        // Critically damp toward the target instead of snapping, so noisy
        // per-frame detections do not jerk the scene around.
        self.rotation_velocity += (target_speed - self.rotation_velocity) * ROTATION_SMOOTHING;

        state.hands = hands;
        state.hand_rotation_velocity = self.rotation_velocity;
        true
    }

    /// Current smoothed steering velocity.
    #[inline]
    pub fn rotation_velocity(&self) -> f32 {
        self.rotation_velocity
    }
}

impl Default for GestureExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Classify a single hand into its frame signals.
fn classify(hand: &TrackedHand) -> HandSignal {
    let landmarks = &hand.landmarks;
    let index_tip = landmarks[INDEX_TIP];

    let position = Vec3::new(
        (index_tip.x - 0.5) * HAND_SPAN_X,
        (0.5 - index_tip.y) * HAND_SPAN_Y,
        HAND_DEPTH,
    );

    let pinch_dist = landmarks[THUMB_TIP].distance(index_tip);
    let is_pinching = pinch_dist < PINCH_THRESHOLD;

    let extension_dist = index_tip.distance(landmarks[WRIST]);
    let is_open = extension_dist > OPEN_THRESHOLD && !is_pinching;

    HandSignal {
        position,
        is_pinching,
        is_open,
    }
}

/// Map the right wrist's horizontal image position to a yaw target speed.
///
/// Zero inside the central dead zone, then linear out to the maximum at
/// either image edge, signed to match the side.
fn steering_target(wrist_x: f32) -> f32 {
    if wrist_x < ROTATION_DEAD_ZONE_MIN {
        let factor = (ROTATION_DEAD_ZONE_MIN - wrist_x) / ROTATION_DEAD_ZONE_MIN;
        -ROTATION_MAX_SPEED * factor
    } else if wrist_x > ROTATION_DEAD_ZONE_MAX {
        let factor = (wrist_x - ROTATION_DEAD_ZONE_MAX) / (1.0 - ROTATION_DEAD_ZONE_MAX);
        ROTATION_MAX_SPEED * factor
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A hand with every landmark at the wrist, then selected keypoints
    /// moved where the test needs them.
    pub(crate) fn hand_at(
        handedness: Handedness,
        wrist: Vec3,
        thumb_tip: Vec3,
        index_tip: Vec3,
    ) -> TrackedHand {
        let mut landmarks = [wrist; LANDMARK_COUNT];
        landmarks[THUMB_TIP] = thumb_tip;
        landmarks[INDEX_TIP] = index_tip;
        TrackedHand {
            handedness,
            landmarks,
        }
    }

    fn frame(timestamp_ms: f64, hands: Vec<TrackedHand>) -> HandFrame {
        HandFrame {
            timestamp_ms,
            hands,
        }
    }

    #[test]
    fn test_pinch_classification() {
        let hand = hand_at(
            Handedness::Left,
            Vec3::new(0.5, 0.8, 0.0),
            Vec3::new(0.50, 0.50, 0.0),
            Vec3::new(0.52, 0.50, 0.0),
        );
        let signal = classify(&hand);
        assert!(signal.is_pinching);
        assert!(!signal.is_open, "pinch and open are mutually exclusive");
    }

    #[test]
    fn test_open_classification() {
        let hand = hand_at(
            Handedness::Right,
            Vec3::new(0.5, 0.9, 0.0),
            Vec3::new(0.3, 0.5, 0.0),
            Vec3::new(0.5, 0.5, 0.0),
        );
        let signal = classify(&hand);
        assert!(signal.is_open);
        assert!(!signal.is_pinching);
    }

    #[test]
    fn test_ambiguous_hand_sets_neither_flag() {
        // Thumb far from index (no pinch), index close to wrist (not open).
        let hand = hand_at(
            Handedness::Right,
            Vec3::new(0.5, 0.55, 0.0),
            Vec3::new(0.2, 0.2, 0.0),
            Vec3::new(0.5, 0.5, 0.0),
        );
        let signal = classify(&hand);
        assert!(!signal.is_pinching);
        assert!(!signal.is_open);
    }

    #[test]
    fn test_position_mapping() {
        let hand = hand_at(
            Handedness::Left,
            Vec3::ZERO,
            Vec3::new(0.9, 0.9, 0.0),
            Vec3::new(0.5, 0.5, 0.0),
        );
        let signal = classify(&hand);
        assert!(signal
            .position
            .abs_diff_eq(Vec3::new(0.0, 0.0, HAND_DEPTH), 1e-5));

        let hand = hand_at(
            Handedness::Left,
            Vec3::ZERO,
            Vec3::new(0.9, 0.9, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
        );
        let signal = classify(&hand);
        assert!(signal
            .position
            .abs_diff_eq(Vec3::new(17.5, 12.5, HAND_DEPTH), 1e-4));
    }

    #[test]
    fn test_steering_dead_zone_and_edges() {
        assert_eq!(steering_target(0.5), 0.0);
        assert_eq!(steering_target(0.4), 0.0);
        assert_eq!(steering_target(0.6), 0.0);
        assert!((steering_target(0.0) - (-ROTATION_MAX_SPEED)).abs() < 1e-5);
        assert!((steering_target(1.0) - ROTATION_MAX_SPEED).abs() < 1e-5);
        assert!(steering_target(0.8) > 0.0);
        assert!(steering_target(0.2) < 0.0);
    }

    #[test]
    fn test_missing_frame_clears_hands() {
        let mut extractor = GestureExtractor::new();
        let mut state = AnimationState::new();

        let hand = hand_at(
            Handedness::Left,
            Vec3::new(0.5, 0.8, 0.0),
            Vec3::new(0.5, 0.5, 0.0),
            Vec3::new(0.51, 0.5, 0.0),
        );
        extractor.ingest(Some(&frame(1.0, vec![hand])), &mut state);
        assert!(state.hands.left.is_some());

        extractor.ingest(None, &mut state);
        assert!(state.hands.left.is_none());
        assert!(state.hands.right.is_none());
    }

    #[test]
    fn test_stale_timestamp_skipped() {
        let mut extractor = GestureExtractor::new();
        let mut state = AnimationState::new();

        let hand = hand_at(
            Handedness::Right,
            Vec3::new(0.9, 0.5, 0.0),
            Vec3::new(0.2, 0.2, 0.0),
            Vec3::new(0.9, 0.1, 0.0),
        );
        assert!(extractor.ingest(Some(&frame(5.0, vec![hand.clone()])), &mut state));
        let velocity_after_first = state.hand_rotation_velocity;

        // Same timestamp: nothing moves, including the smoothing filter.
        assert!(!extractor.ingest(Some(&frame(5.0, vec![hand])), &mut state));
        assert_eq!(state.hand_rotation_velocity, velocity_after_first);
    }

    #[test]
    fn test_non_finite_hand_treated_as_absent() {
        let mut extractor = GestureExtractor::new();
        let mut state = AnimationState::new();

        let mut hand = hand_at(
            Handedness::Left,
            Vec3::new(0.5, 0.8, 0.0),
            Vec3::new(0.5, 0.5, 0.0),
            Vec3::new(0.51, 0.5, 0.0),
        );
        hand.landmarks[WRIST].x = f32::NAN;
        extractor.ingest(Some(&frame(1.0, vec![hand])), &mut state);
        assert!(state.hands.left.is_none());
    }

    #[test]
    fn test_rotation_velocity_converges_smoothly() {
        let mut extractor = GestureExtractor::new();
        let mut state = AnimationState::new();

        let hand = hand_at(
            Handedness::Right,
            Vec3::new(1.0, 0.5, 0.0),
            Vec3::new(0.2, 0.2, 0.0),
            Vec3::new(0.9, 0.1, 0.0),
        );
        for i in 0..200 {
            extractor.ingest(Some(&frame(i as f64, vec![hand.clone()])), &mut state);
        }
        assert!((state.hand_rotation_velocity - ROTATION_MAX_SPEED).abs() < 1e-3);

        // First tick never jumps straight to the target.
        let mut fresh = GestureExtractor::new();
        let mut fresh_state = AnimationState::new();
        fresh.ingest(Some(&frame(0.0, vec![hand])), &mut fresh_state);
        assert!(fresh_state.hand_rotation_velocity < ROTATION_MAX_SPEED * 0.1);
    }
}
