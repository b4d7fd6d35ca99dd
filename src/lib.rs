//! # GPDE - Gesture Particle Display Engine
//!
//! Hand-gesture-driven morphing particle scenes with a simple, declarative API.
//!
//! GPDE runs the full simulation on the CPU and hands you GPU-ready instance
//! buffers each tick, so you can focus on composing the scene while any
//! renderer (wgpu, terminal, test harness) does the drawing.
//!
//! ## Quick Start
//!
//! ```ignore
//! use gpde::prelude::*;
//!
//! fn main() -> Result<(), gpde::EngineError> {
//!     let (publisher, frames) = gpde::latest::channel();
//!     // A capture thread publishes HandFrames into `publisher`.
//!
//!     let mut engine = Engine::builder()
//!         .with_glyph_sequence(vec!['2', '0', '2', '6'])
//!         .attach_capture(frames)
//!         .build()?;
//!
//!     loop {
//!         engine.tick();
//!         let frame = engine.render_frame();
//!         // upload frame.foliage / frame.ornaments / frame.ribbon,
//!         // draw frame.notes as textured quads
//!     }
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Chaos factor
//!
//! One scalar in `[0, 1]` drives the whole scene. An open right hand pulls
//! it toward 1 (scattered), closing the hand lets it fall back to 0
//! (assembled). Every layer blends its shape against a scatter target by
//! this factor, with an outward burst peaking mid-transition.
//!
//! ### Modes and glyphs
//!
//! Each full open-close cycle of the right hand advances the display one
//! step: tree, glyph, tree, next glyph, and so on through the configured
//! sequence. The switch is a hysteresis latch, so holding the hand open
//! never skips ahead.
//!
//! ### Gestures
//!
//! | Gesture | Effect |
//! |---------|--------|
//! | Right hand open | raise chaos (scatter; steps the mode on the way) |
//! | Right hand closed / absent | lower chaos (assemble) |
//! | Right wrist left/right of center | steer scene rotation |
//! | Left hand pinch near a note | focus the note in front of the viewer |
//!
//! ### Layers
//!
//! - **Foliage**: 20k points forming the cone body; never leaves the tree.
//! - **Ornaments**: phyllotaxis-placed spheres; morph into glyph clouds.
//! - **Ribbon**: a spiral of flat shards that tumble with chaos.
//! - **Notes**: textured wish quads with exclusive pinch-to-focus.

pub mod animator;
pub mod chaos;
pub mod config;
pub mod error;
pub mod gesture;
pub mod glyph;
pub mod latest;
pub mod notes;
pub mod render;
pub mod shapes;
pub mod state;
pub mod texture;
pub mod time;
pub mod viewer;

mod engine;

pub use chaos::Mode;
pub use engine::{Engine, EngineBuilder};
pub use error::{EngineError, TextureError};
pub use gesture::{HandFrame, Handedness, TrackedHand};
pub use glam::{Quat, Vec2, Vec3, Vec4};
pub use render::{GlobalUniforms, HandCursor, NoteInstance, RenderFrame, RenderInstance};
pub use state::{AnimationState, HandSignal, NoteId};
pub use viewer::Viewer;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use gpde::prelude::*;
/// ```
pub mod prelude {
    pub use crate::chaos::Mode;
    pub use crate::config::{OrnamentLayerConfig, SceneConfig};
    pub use crate::engine::{Engine, EngineBuilder};
    pub use crate::gesture::{HandFrame, Handedness, TrackedHand};
    pub use crate::glyph::{BuiltinFont, GlyphRaster};
    pub use crate::latest::{channel, Latest, Publisher};
    pub use crate::render::{RenderFrame, RenderInstance};
    pub use crate::state::{AnimationState, HandSignal};
    pub use crate::viewer::Viewer;
    pub use crate::{Vec2, Vec3, Vec4};
}
