//! Scripted gesture replay
//!
//! Feeds the engine a synthetic recording of right-hand open/close cycles
//! through the capture channel and logs every mode step, showing the
//! hysteresis latch and the glyph rotation without a webcam.
//! Run with: cargo run --example gesture_replay

use gpde::gesture::{INDEX_TIP, LANDMARK_COUNT, THUMB_TIP};
use gpde::prelude::*;

/// A right hand at image center, open or fisted.
fn right_hand(open: bool) -> TrackedHand {
    let mut landmarks = [Vec3::new(0.5, 0.8, 0.0); LANDMARK_COUNT];
    if open {
        // Index tip far from the wrist, thumb far from the index.
        landmarks[INDEX_TIP] = Vec3::new(0.5, 0.3, 0.0);
        landmarks[THUMB_TIP] = Vec3::new(0.3, 0.5, 0.0);
    } else {
        landmarks[INDEX_TIP] = Vec3::new(0.5, 0.75, 0.0);
        landmarks[THUMB_TIP] = Vec3::new(0.45, 0.75, 0.0);
    }
    TrackedHand {
        handedness: Handedness::Right,
        landmarks,
    }
}

fn main() -> Result<(), gpde::EngineError> {
    let (publisher, frames) = channel();
    let mut engine = Engine::builder()
        .with_seed(7)
        .with_fixed_delta(1.0 / 60.0)
        .attach_capture(frames)
        .build()?;

    let mut last_mode = engine.mode();
    let mut timestamp = 0.0;

    // Three full open-close cycles, two seconds per phase.
    for cycle in 0..3 {
        for phase in [true, false] {
            for _ in 0..120 {
                timestamp += 1000.0 / 60.0;
                publisher.publish(HandFrame {
                    timestamp_ms: timestamp,
                    hands: vec![right_hand(phase)],
                });
                engine.tick();

                let mode = engine.mode();
                if mode != last_mode {
                    println!(
                        "cycle {} | chaos {:.2} -> {:?} (glyph '{}')",
                        cycle,
                        engine.state().chaos_factor(),
                        mode,
                        engine.active_glyph(),
                    );
                    last_mode = mode;
                }
            }
        }
    }

    engine.shutdown();
    assert!(!publisher.is_open());
    Ok(())
}
