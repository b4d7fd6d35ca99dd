//! The engine: construction, the tick loop, and frame snapshots.
//!
//! An [`Engine`] owns every layer and advances them in a fixed order each
//! tick:
//!
//! 1. pull the newest hand frame and extract gesture signals,
//! 2. smooth the chaos factor and run the mode-switch latch (retargeting
//!    glyph layers when the active glyph changed),
//! 3. integrate scene rotation from the steering velocity,
//! 4. step the foliage, ornament and ribbon kinematics,
//! 5. resolve note focus and move the notes,
//!
//! after which [`Engine::render_frame`] snapshots everything a renderer
//! needs. The engine never draws and never opens a camera; both sit on the
//! far side of [`RenderFrame`] and the hand-frame channel.
//!
//! # Example
//!
//! ```ignore
//! use gpde::prelude::*;
//!
//! let (publisher, frames) = gpde::latest::channel();
//! let mut engine = Engine::builder()
//!     .with_glyph_sequence(vec!['2', '0', '2', '6'])
//!     .attach_capture(frames)
//!     .build()?;
//!
//! loop {
//!     engine.tick();
//!     let frame = engine.render_frame();
//!     // hand `frame` to the renderer
//! }
//! ```

use crate::animator::{FoliageLayer, OrnamentLayer, RibbonLayer};
use crate::chaos::{ChaosMachine, Mode};
use crate::config::{
    SceneConfig, DEFAULT_GLYPH_SEQUENCE, DEFAULT_NOTE_TEXTS, GLYPH_HOLD_DAMPING,
    ROTATION_APPLY_FACTOR, ROTATION_IDLE_DRIFT,
};
use crate::error::EngineError;
use crate::gesture::{GestureExtractor, HandFrame};
use crate::glyph::{GlyphRaster, GlyphSampler};
use crate::latest::Latest;
use crate::notes::NoteBoard;
use crate::render::{GlobalUniforms, HandCursor, RenderFrame};
use crate::shapes::TreeShape;
use crate::state::AnimationState;
use crate::texture::TextureAtlas;
use crate::time::TickClock;
use crate::viewer::Viewer;
use rand::rngs::SmallRng;
use rand::SeedableRng;

/// Configures and validates an [`Engine`].
pub struct EngineBuilder {
    config: SceneConfig,
    glyphs: Vec<char>,
    note_texts: Vec<String>,
    raster: Option<Box<dyn GlyphRaster>>,
    seed: Option<u64>,
    fixed_delta: Option<f32>,
    capture: Option<Latest<HandFrame>>,
    viewer: Viewer,
}

impl EngineBuilder {
    fn new() -> Self {
        Self {
            config: SceneConfig::default(),
            glyphs: DEFAULT_GLYPH_SEQUENCE.to_vec(),
            note_texts: DEFAULT_NOTE_TEXTS.iter().map(|s| s.to_string()).collect(),
            raster: None,
            seed: None,
            fixed_delta: None,
            capture: None,
            viewer: Viewer::default(),
        }
    }

    /// Replace the whole scene composition.
    pub fn with_scene_config(mut self, config: SceneConfig) -> Self {
        self.config = config;
        self
    }

    /// The characters the display cycles through. Must not be empty.
    pub fn with_glyph_sequence(mut self, glyphs: Vec<char>) -> Self {
        self.glyphs = glyphs;
        self
    }

    /// Texts of the wish notes, one note per entry.
    pub fn with_note_texts(mut self, texts: Vec<String>) -> Self {
        self.note_texts = texts;
        self
    }

    /// Plug in a font backend (required for glyphs beyond ASCII).
    pub fn with_glyph_raster(mut self, raster: Box<dyn GlyphRaster>) -> Self {
        self.raster = Some(raster);
        self
    }

    /// Seed the layout RNG for reproducible scenes.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Fixed per-tick delta in seconds, for deterministic runs.
    pub fn with_fixed_delta(mut self, delta: f32) -> Self {
        self.fixed_delta = Some(delta);
        self
    }

    /// Connect the hand-frame channel fed by the capture side.
    pub fn attach_capture(mut self, capture: Latest<HandFrame>) -> Self {
        self.capture = Some(capture);
        self
    }

    /// Initial viewer pose.
    pub fn with_viewer(mut self, viewer: Viewer) -> Self {
        self.viewer = viewer;
        self
    }

    /// Build all layers and place every entity.
    pub fn build(self) -> Result<Engine, EngineError> {
        if self.glyphs.is_empty() {
            return Err(EngineError::EmptyGlyphSequence);
        }

        let mut rng = match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let sampler = match self.raster {
            Some(raster) => GlyphSampler::with_raster(raster),
            None => GlyphSampler::new(),
        };
        let chaos = ChaosMachine::new(self.glyphs);
        let tree = TreeShape::new(self.config.tree_height, self.config.tree_radius);

        let foliage = FoliageLayer::new(
            self.config.foliage_count,
            &tree,
            self.config.foliage_explode_magnitude,
            &mut rng,
        );
        let ornaments = self
            .config
            .ornament_layers
            .iter()
            .map(|layer| {
                OrnamentLayer::new(
                    layer.clone(),
                    &tree,
                    self.config.glyph_scale,
                    self.config.ornament_explode_magnitude,
                    &sampler,
                    chaos.active_glyph(),
                    &mut rng,
                )
            })
            .collect();
        let ribbon = RibbonLayer::new(
            self.config.ribbon_count,
            self.config.tree_height,
            self.config.ribbon_turns,
            self.config.ribbon_explode_magnitude,
            &mut rng,
        );
        let notes = NoteBoard::new(&self.note_texts, &mut rng);

        Ok(Engine {
            config: self.config,
            state: AnimationState::new(),
            clock: match self.fixed_delta {
                Some(delta) => TickClock::fixed(delta),
                None => TickClock::new(),
            },
            extractor: GestureExtractor::new(),
            chaos,
            sampler,
            foliage,
            ornaments,
            ribbon,
            notes,
            atlas: TextureAtlas::new(),
            viewer: self.viewer,
            capture: self.capture,
            rng,
            inner_yaw: 0.0,
            outer_yaw: 0.0,
        })
    }
}

/// The full display: all layers, shared state, and the tick loop.
pub struct Engine {
    config: SceneConfig,
    state: AnimationState,
    clock: TickClock,
    extractor: GestureExtractor,
    chaos: ChaosMachine,
    sampler: GlyphSampler,
    foliage: FoliageLayer,
    ornaments: Vec<OrnamentLayer>,
    ribbon: RibbonLayer,
    notes: NoteBoard,
    atlas: TextureAtlas,
    viewer: Viewer,
    capture: Option<Latest<HandFrame>>,
    rng: SmallRng,
    inner_yaw: f32,
    outer_yaw: f32,
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Advance one tick, pulling the newest frame off the capture channel.
    pub fn tick(&mut self) {
        let frame = self.capture.as_ref().and_then(|capture| capture.latest());
        self.tick_with_frame(frame.as_ref());
    }

    /// Advance one tick against an explicit frame (or its absence). This is
    /// the path replay tools and tests use.
    pub fn tick_with_frame(&mut self, frame: Option<&HandFrame>) {
        let (delta, _) = self.clock.tick();

        self.extractor.ingest(frame, &mut self.state);

        if let Some(glyph) = self.chaos.update(&mut self.state) {
            for layer in &mut self.ornaments {
                layer.retarget_glyph(&self.sampler, glyph, &mut self.rng);
            }
        }
        let chaos = self.state.chaos_factor();
        let mode = self.chaos.mode();

        // Yaw integration. The outer group never stops drifting; the inner
        // group damps to a halt while a glyph is on display and readable.
        let advance = self.state.hand_rotation_velocity * delta * ROTATION_APPLY_FACTOR
            + ROTATION_IDLE_DRIFT * delta;
        self.outer_yaw += advance;
        if mode == Mode::Glyph && chaos < 0.5 {
            self.inner_yaw *= GLYPH_HOLD_DAMPING;
        } else {
            self.inner_yaw += advance;
        }

        self.foliage.update(chaos);
        for layer in &mut self.ornaments {
            layer.update(mode, chaos);
        }
        self.ribbon.update(chaos);

        self.notes.update(&mut self.state, &self.viewer, chaos);
    }

    /// Snapshot everything a renderer needs for the current tick.
    pub fn render_frame(&mut self) -> RenderFrame {
        let chaos = self.state.chaos_factor();
        let mut frame = RenderFrame {
            uniforms: GlobalUniforms {
                chaos_factor: chaos,
                elapsed: self.clock.elapsed(),
                _pad: [0.0; 2],
            },
            inner_yaw: self.inner_yaw,
            outer_yaw: self.outer_yaw,
            ..RenderFrame::default()
        };

        self.foliage.instances(&mut frame.foliage);
        for layer in &self.ornaments {
            layer.instances(chaos, &mut frame.ornaments);
        }
        self.ribbon.instances(chaos, &mut frame.ribbon);
        self.notes
            .instances(&mut self.atlas, self.state.focused_note, &mut frame.notes);

        for hand in [self.state.hands.left, self.state.hands.right]
            .into_iter()
            .flatten()
        {
            frame.hand_cursor.push(HandCursor {
                position: hand.position,
                pinching: hand.is_pinching,
            });
        }
        frame
    }

    /// Signal the capture side to stop producing frames.
    pub fn shutdown(&mut self) {
        if let Some(capture) = self.capture.take() {
            capture.close();
        }
    }

    /// Update the viewer pose used for note focus.
    pub fn set_viewer(&mut self, viewer: Viewer) {
        self.viewer = viewer;
    }

    // ========== Inspection ==========

    #[inline]
    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.chaos.mode()
    }

    #[inline]
    pub fn active_glyph(&self) -> char {
        self.chaos.active_glyph()
    }

    #[inline]
    pub fn viewer(&self) -> Viewer {
        self.viewer
    }

    #[inline]
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    #[inline]
    pub fn inner_yaw(&self) -> f32 {
        self.inner_yaw
    }

    #[inline]
    pub fn outer_yaw(&self) -> f32 {
        self.outer_yaw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> SceneConfig {
        let mut config = SceneConfig::default();
        config.foliage_count = 50;
        for layer in &mut config.ornament_layers {
            layer.count = 20;
        }
        config.ribbon_count = 30;
        config
    }

    fn small_engine() -> Engine {
        Engine::builder()
            .with_scene_config(small_config())
            .with_seed(42)
            .with_fixed_delta(1.0 / 60.0)
            .build()
            .unwrap()
    }

    #[test]
    fn test_empty_glyph_sequence_rejected() {
        let result = Engine::builder().with_glyph_sequence(Vec::new()).build();
        assert!(matches!(result, Err(EngineError::EmptyGlyphSequence)));
    }

    #[test]
    fn test_render_frame_counts_match_config() {
        let mut engine = small_engine();
        engine.tick_with_frame(None);
        let frame = engine.render_frame();
        assert_eq!(frame.foliage.len(), 50);
        assert_eq!(frame.ornaments.len(), 60);
        assert_eq!(frame.ribbon.len(), 30);
        assert_eq!(frame.notes.len(), DEFAULT_NOTE_TEXTS.len());
        assert!(frame.hand_cursor.is_empty());
    }

    #[test]
    fn test_seeded_engines_agree() {
        let mut a = small_engine();
        let mut b = small_engine();
        for _ in 0..10 {
            a.tick_with_frame(None);
            b.tick_with_frame(None);
        }
        assert_eq!(a.render_frame().foliage, b.render_frame().foliage);
    }

    #[test]
    fn test_idle_drift_advances_yaw() {
        let mut engine = small_engine();
        for _ in 0..60 {
            engine.tick_with_frame(None);
        }
        let expected = ROTATION_IDLE_DRIFT;
        assert!((engine.outer_yaw() - expected).abs() < 1e-4);
        assert!((engine.inner_yaw() - expected).abs() < 1e-4);
    }

    #[test]
    fn test_shutdown_closes_capture() {
        let (publisher, latest) = crate::latest::channel();
        let mut engine = Engine::builder()
            .with_scene_config(small_config())
            .with_seed(1)
            .attach_capture(latest)
            .build()
            .unwrap();
        assert!(publisher.is_open());
        engine.shutdown();
        assert!(!publisher.is_open());
    }
}
