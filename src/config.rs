//! Scene configuration.
//!
//! Every tuning value of the engine lives here as a named constant or a
//! config struct with sensible defaults. Nothing is read from files or the
//! environment; callers override fields through the [`Engine`](crate::Engine)
//! builder before construction.

use std::f32::consts::PI;

// ========== Tree geometry ==========

/// Height of the cone the tree silhouette is built on.
pub const TREE_HEIGHT: f32 = 16.0;
/// Base radius of the cone.
pub const TREE_RADIUS: f32 = 6.0;
/// World-space scale applied to normalized glyph points.
pub const GLYPH_SCALE: f32 = 15.0;

// ========== Smoothing factors (per tick) ==========

/// Exponential smoothing factor for the chaos factor.
pub const CHAOS_SMOOTHING: f32 = 0.1;
/// Exponential smoothing factor for the hand rotation velocity.
pub const ROTATION_SMOOTHING: f32 = 0.05;
/// Exponential smoothing factor for entity positions.
pub const POSITION_SMOOTHING: f32 = 0.08;

// ========== Gesture thresholds (normalized image space) ==========

/// Thumb-tip to index-tip distance below which a hand is pinching.
pub const PINCH_THRESHOLD: f32 = 0.08;
/// Index-tip to wrist distance above which a hand is open.
pub const OPEN_THRESHOLD: f32 = 0.15;

// ========== Mode-switch hysteresis ==========

/// Rising chaos threshold that triggers a mode step.
pub const SWITCH_UP_THRESHOLD: f32 = 0.8;
/// Falling chaos threshold that re-arms the mode switch.
pub const SWITCH_DOWN_THRESHOLD: f32 = 0.1;

// ========== Focus ==========

/// World distance within which a pinching left hand can grab a note.
pub const FOCUS_DISTANCE: f32 = 5.0;
/// How far in front of the viewer a focused note hovers.
pub const FOCUS_FORWARD_OFFSET: f32 = 8.0;

// ========== Hand-to-world mapping ==========

/// Horizontal span covered by the normalized image x axis, in world units.
pub const HAND_SPAN_X: f32 = 35.0;
/// Vertical span covered by the normalized image y axis, in world units.
pub const HAND_SPAN_Y: f32 = 25.0;
/// Fixed depth at which hand cursors sit in front of the camera.
pub const HAND_DEPTH: f32 = 8.0;

// ========== Rotation steering ==========

/// Left edge of the rotation dead zone (normalized image x).
pub const ROTATION_DEAD_ZONE_MIN: f32 = 0.4;
/// Right edge of the rotation dead zone.
pub const ROTATION_DEAD_ZONE_MAX: f32 = 0.6;
/// Maximum steering speed at either image edge.
pub const ROTATION_MAX_SPEED: f32 = 0.8;

/// Fraction of the steering velocity applied to scene yaw per second.
pub const ROTATION_APPLY_FACTOR: f32 = 0.2;
/// Constant idle drift of the scene yaw, radians per second.
pub const ROTATION_IDLE_DRIFT: f32 = 0.005;
/// Per-tick decay of the inner group yaw while a glyph is readable.
pub const GLYPH_HOLD_DAMPING: f32 = 0.95;

// ========== Glyph sampling ==========

/// Side length of the square glyph mask, in cells.
pub const GLYPH_MASK_SIZE: u32 = 128;
/// Mask intensity a cell must exceed to become a candidate point.
pub const GLYPH_INTENSITY_THRESHOLD: u8 = 150;
/// Half-range of the random Z jitter added to sampled glyph points.
pub const GLYPH_Z_JITTER: f32 = 0.25;

/// Default glyph rotation. Characters the active raster backend cannot
/// draw degrade to blank clouds, so the default sticks to ASCII.
pub const DEFAULT_GLYPH_SEQUENCE: [char; 5] = ['H', 'A', 'P', 'P', 'Y'];

// ========== Scatter shell ==========

/// Inner radius of the scatter shell for shape entities.
pub const SCATTER_RADIUS_MIN: f32 = 15.0;
/// Outer radius of the scatter shell for shape entities.
pub const SCATTER_RADIUS_MAX: f32 = 35.0;
/// Inner radius of the (closer) scatter shell used by notes.
pub const NOTE_SCATTER_RADIUS_MIN: f32 = 10.0;
/// Radial spread of the note scatter shell.
pub const NOTE_SCATTER_RADIUS_SPREAD: f32 = 4.0;
/// Notes only scatter partially; their blend is `chaos * this`.
pub const NOTE_CHAOS_ATTENUATION: f32 = 0.3;

/// Position follow factor for unfocused notes.
pub const NOTE_FOLLOW_FACTOR: f32 = 0.1;
/// Position follow factor while a note is focused.
pub const NOTE_FOCUS_FOLLOW_FACTOR: f32 = 0.2;

/// Default wish texts, one note each.
pub const DEFAULT_NOTE_TEXTS: [&str; 10] = [
    "Health first ^^",
    "Winter will pass",
    "It's okay\nI'm getting there",
    "Dear self\nthere is always a way",
    "A quiet day\nis a perfect day",
    "Ate something great\nstill sad?\neat again!",
    "Hot pot\nstraight to my heart",
    "Give the world\na little smile",
    "Made it through\nanother year!",
    "See you\nnext spring",
];

/// Configuration for one ornament layer.
#[derive(Debug, Clone)]
pub struct OrnamentLayerConfig {
    /// Number of ornaments in the layer.
    pub count: usize,
    /// Base scale of each ornament.
    pub scale: f32,
    /// Added to the cone base radius for this layer.
    pub radius_offset: f32,
    /// Phase offset of the phyllotaxis spiral.
    pub angle_offset: f32,
    /// Pin the last ornament to the cone apex.
    pub apex: bool,
    /// RGBA color handed to the renderer.
    pub color: [f32; 4],
}

/// Full scene composition: one foliage cloud, any number of ornament
/// layers, one ribbon, one board of notes.
#[derive(Debug, Clone)]
pub struct SceneConfig {
    pub tree_height: f32,
    pub tree_radius: f32,
    pub glyph_scale: f32,
    pub foliage_count: usize,
    pub ornament_layers: Vec<OrnamentLayerConfig>,
    pub ribbon_count: usize,
    /// Full turns of the ribbon spiral.
    pub ribbon_turns: f32,
    /// Outward burst distances per entity kind.
    pub foliage_explode_magnitude: f32,
    pub ornament_explode_magnitude: f32,
    pub ribbon_explode_magnitude: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            tree_height: TREE_HEIGHT,
            tree_radius: TREE_RADIUS,
            glyph_scale: GLYPH_SCALE,
            foliage_count: 20_000,
            ornament_layers: vec![
                OrnamentLayerConfig {
                    count: 1500,
                    scale: 0.18,
                    radius_offset: 0.0,
                    angle_offset: 0.0,
                    apex: true,
                    color: [0.90, 0.0, 0.07, 1.0],
                },
                OrnamentLayerConfig {
                    count: 400,
                    scale: 0.15,
                    radius_offset: 0.5,
                    angle_offset: 0.0,
                    apex: false,
                    color: [1.0, 0.84, 0.0, 1.0],
                },
                OrnamentLayerConfig {
                    count: 400,
                    scale: 0.15,
                    radius_offset: 0.5,
                    angle_offset: PI,
                    apex: false,
                    color: [0.13, 0.55, 0.13, 1.0],
                },
            ],
            ribbon_count: 2000,
            ribbon_turns: 3.0,
            foliage_explode_magnitude: 12.0,
            ornament_explode_magnitude: 12.0,
            ribbon_explode_magnitude: 20.0,
        }
    }
}
