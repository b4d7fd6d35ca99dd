//! Per-entity kinematics and the three shape layers.
//!
//! Every visible particle is an [`Entity`] with a handful of fixed targets
//! (tree shape, glyph shape, scatter point, explosion direction) and one
//! moving position. Each tick blends the shape and scatter targets by the
//! chaos factor, pushes outward along the explosion direction by a
//! sine envelope that peaks at chaos = 0.5, and eases the position a fixed
//! fraction toward the result. All apparent motion is this easing chasing a
//! moving target; nothing integrates velocity.
//!
//! Layers differ only in placement and rendering:
//! - foliage: dense cone cloud, tree-only, color and size varied per point,
//! - ornaments: phyllotaxis spiral, the only glyph-capable layer,
//! - ribbon: conical spiral of flat shards that tumble with chaos.

use crate::chaos::Mode;
use crate::config::{OrnamentLayerConfig, POSITION_SMOOTHING};
use crate::glyph::GlyphSampler;
use crate::render::RenderInstance;
use crate::shapes::{self, TreeShape};
use glam::{EulerRot, Quat, Vec3, Vec4};
use rand::Rng;
use std::f32::consts::PI;

/// Outward displacement envelope: zero at both rest states, peaking
/// mid-transition so entities fly apart and regather.
#[inline]
pub fn explode_envelope(chaos: f32) -> f32 {
    (chaos * PI).sin().max(0.0)
}

/// One particle with its precomputed targets.
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: usize,
    pub shape_target_tree: Vec3,
    pub shape_target_glyph: Vec3,
    pub scatter_target: Vec3,
    pub explode_direction: Vec3,
    pub current_position: Vec3,
}

impl Entity {
    fn new<R: Rng>(id: usize, shape_target: Vec3, rng: &mut R) -> Self {
        Self {
            id,
            shape_target_tree: shape_target,
            shape_target_glyph: shape_target,
            scatter_target: shapes::scatter_position(rng),
            explode_direction: shapes::random_direction(rng),
            current_position: shape_target,
        }
    }

    /// Advance one tick toward the blended target.
    ///
    /// A non-finite result (bad upstream data) leaves the position where it
    /// was; the entity freezes for a tick instead of vanishing.
    pub fn step(&mut self, shape_target: Vec3, chaos: f32, magnitude: f32) {
        let blended = shape_target.lerp(self.scatter_target, chaos);
        let target = blended + self.explode_direction * explode_envelope(chaos) * magnitude;
        let next = self.current_position.lerp(target, POSITION_SMOOTHING);
        if next.is_finite() {
            self.current_position = next;
        }
    }
}

// ========== Foliage ==========

const FOLIAGE_DARK: Vec3 = Vec3::new(0.20, 0.0, 0.0);
const FOLIAGE_BRIGHT: Vec3 = Vec3::new(1.0, 0.84, 0.0);

/// Dense point cloud forming the cone body. Never targets a glyph.
pub struct FoliageLayer {
    entities: Vec<Entity>,
    /// Per-point brightness/size variation in [0, 1].
    variation: Vec<f32>,
    magnitude: f32,
}

impl FoliageLayer {
    pub fn new<R: Rng>(count: usize, tree: &TreeShape, magnitude: f32, rng: &mut R) -> Self {
        let mut entities = Vec::with_capacity(count);
        let mut variation = Vec::with_capacity(count);
        for id in 0..count {
            // Bias toward the base so the cone reads dense at the bottom.
            let ratio = rng.gen::<f32>().powf(0.8);
            let target = tree.position(ratio, None, 0.0, rng);
            entities.push(Entity::new(id, target, rng));
            variation.push(rng.gen());
        }
        Self {
            entities,
            variation,
            magnitude,
        }
    }

    pub fn update(&mut self, chaos: f32) {
        for entity in &mut self.entities {
            let shape = entity.shape_target_tree;
            entity.step(shape, chaos, self.magnitude);
        }
    }

    pub fn instances(&self, out: &mut Vec<RenderInstance>) {
        out.clear();
        for (entity, &v) in self.entities.iter().zip(&self.variation) {
            let color = FOLIAGE_DARK.lerp(FOLIAGE_BRIGHT, v * 0.5 + 0.2);
            let scale = 0.05 + 0.25 * v;
            out.push(RenderInstance::point(
                entity.current_position,
                scale,
                color.extend(1.0),
            ));
        }
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }
}

// ========== Ornaments ==========

/// Phyllotaxis-placed spheres; the only layer that morphs into glyphs.
pub struct OrnamentLayer {
    entities: Vec<Entity>,
    config: OrnamentLayerConfig,
    glyph_scale: f32,
    magnitude: f32,
}

impl OrnamentLayer {
    pub fn new<R: Rng>(
        config: OrnamentLayerConfig,
        tree: &TreeShape,
        glyph_scale: f32,
        magnitude: f32,
        sampler: &GlyphSampler,
        active_glyph: char,
        rng: &mut R,
    ) -> Self {
        let mut entities = Vec::with_capacity(config.count);
        for id in 0..config.count {
            let target = if config.apex && id == config.count - 1 {
                tree.apex()
            } else {
                tree.phyllotaxis_position(
                    id,
                    config.count,
                    config.angle_offset,
                    config.radius_offset,
                )
            };
            entities.push(Entity::new(id, target, rng));
        }
        let mut layer = Self {
            entities,
            config,
            glyph_scale,
            magnitude,
        };
        layer.retarget_glyph(sampler, active_glyph, rng);
        layer
    }

    /// Resample glyph targets for a newly active glyph. Scatter targets and
    /// explosion directions are left untouched so the scatter phase looks
    /// identical across glyph changes.
    pub fn retarget_glyph<R: Rng>(&mut self, sampler: &GlyphSampler, glyph: char, rng: &mut R) {
        let points = sampler.sample(glyph, self.entities.len(), rng);
        for (entity, p) in self.entities.iter_mut().zip(points) {
            entity.shape_target_glyph =
                Vec3::new(p.x * self.glyph_scale, p.y * self.glyph_scale, p.z);
        }
    }

    pub fn update(&mut self, mode: Mode, chaos: f32) {
        for entity in &mut self.entities {
            let shape = match mode {
                Mode::Tree => entity.shape_target_tree,
                Mode::Glyph => entity.shape_target_glyph,
            };
            entity.step(shape, chaos, self.magnitude);
        }
    }

    pub fn instances(&self, chaos: f32, out: &mut Vec<RenderInstance>) {
        let pulse = 1.0 + chaos * 0.1;
        let color = Vec3::from_slice(&self.config.color[..3]).extend(self.config.color[3]);
        let last = self.entities.len().saturating_sub(1);
        for entity in &self.entities {
            let base = if self.config.apex && entity.id == last {
                0.8
            } else {
                self.config.scale
            };
            out.push(RenderInstance::sphere(
                entity.current_position,
                base * pulse,
                color,
            ));
        }
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }
}

// ========== Ribbon ==========

const RIBBON_COLOR: Vec4 = Vec4::new(0.94, 0.94, 0.94, 0.8);

/// Spiral of flat shards wrapping the cone. Tree-only, like foliage, but
/// each shard carries a base orientation that tilts further with chaos.
pub struct RibbonLayer {
    entities: Vec<Entity>,
    base_rotation: Vec<Vec3>,
    scale: Vec<f32>,
    magnitude: f32,
}

impl RibbonLayer {
    pub fn new<R: Rng>(
        count: usize,
        tree_height: f32,
        turns: f32,
        magnitude: f32,
        rng: &mut R,
    ) -> Self {
        let mut entities = Vec::with_capacity(count);
        let mut base_rotation = Vec::with_capacity(count);
        let mut scale = Vec::with_capacity(count);
        let denom = (count.saturating_sub(1)).max(1) as f32;
        for id in 0..count {
            let t = id as f32 / denom;
            let target = shapes::ribbon_position(t, tree_height, turns);
            entities.push(Entity::new(id, target, rng));
            base_rotation.push(Vec3::new(
                rng.gen_range(0.0..PI),
                rng.gen_range(0.0..PI),
                rng.gen_range(0.0..PI),
            ));
            scale.push(0.8 + 0.4 * rng.gen::<f32>());
        }
        Self {
            entities,
            base_rotation,
            scale,
            magnitude,
        }
    }

    pub fn update(&mut self, chaos: f32) {
        for entity in &mut self.entities {
            let shape = entity.shape_target_tree;
            entity.step(shape, chaos, self.magnitude);
        }
    }

    pub fn instances(&self, chaos: f32, out: &mut Vec<RenderInstance>) {
        out.clear();
        for ((entity, base), &s) in self.entities.iter().zip(&self.base_rotation).zip(&self.scale)
        {
            let rotation =
                Quat::from_euler(EulerRot::XYZ, base.x + chaos, base.y + chaos, base.z);
            out.push(RenderInstance::shard(
                entity.current_position,
                rotation,
                s * 0.05,
                RIBBON_COLOR,
            ));
        }
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneConfig;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn tree() -> TreeShape {
        TreeShape::new(16.0, 6.0)
    }

    #[test]
    fn test_envelope_endpoints_and_peak() {
        assert_eq!(explode_envelope(0.0), 0.0);
        assert!(explode_envelope(1.0).abs() < 1e-6);
        assert!((explode_envelope(0.5) - 1.0).abs() < 1e-6);
        assert!(explode_envelope(0.25) > 0.5);
    }

    #[test]
    fn test_entity_converges_to_shape_at_zero_chaos() {
        let mut rng = SmallRng::seed_from_u64(1);
        let target = Vec3::new(3.0, -2.0, 1.0);
        let mut entity = Entity::new(0, target, &mut rng);
        entity.current_position = Vec3::new(30.0, 30.0, 30.0);
        for _ in 0..400 {
            entity.step(target, 0.0, 12.0);
        }
        assert!(entity.current_position.abs_diff_eq(target, 1e-2));
    }

    #[test]
    fn test_entity_converges_to_scatter_at_full_chaos() {
        let mut rng = SmallRng::seed_from_u64(2);
        let target = Vec3::ZERO;
        let mut entity = Entity::new(0, target, &mut rng);
        let scatter = entity.scatter_target;
        for _ in 0..400 {
            entity.step(target, 1.0, 12.0);
        }
        assert!(entity.current_position.abs_diff_eq(scatter, 1e-2));
    }

    #[test]
    fn test_entity_overshoots_at_half_chaos() {
        let mut rng = SmallRng::seed_from_u64(3);
        let target = Vec3::ZERO;
        let mut entity = Entity::new(0, target, &mut rng);
        let blended = target.lerp(entity.scatter_target, 0.5);
        for _ in 0..400 {
            entity.step(target, 0.5, 12.0);
        }
        let displacement = entity.current_position - blended;
        assert!((displacement.length() - 12.0).abs() < 0.1);
    }

    #[test]
    fn test_non_finite_step_freezes_entity() {
        let mut rng = SmallRng::seed_from_u64(4);
        let mut entity = Entity::new(0, Vec3::ONE, &mut rng);
        let before = entity.current_position;
        entity.step(Vec3::splat(f32::NAN), 0.3, 12.0);
        assert_eq!(entity.current_position, before);
    }

    #[test]
    fn test_foliage_within_cone_bounds() {
        let mut rng = SmallRng::seed_from_u64(5);
        let layer = FoliageLayer::new(1000, &tree(), 12.0, &mut rng);
        for entity in layer.entities() {
            let p = entity.shape_target_tree;
            assert!(p.y >= -8.0 - 1e-4 && p.y <= 8.0 + 1e-4);
        }
    }

    #[test]
    fn test_ornament_glyph_retarget_leaves_scatter_alone() {
        let mut rng = SmallRng::seed_from_u64(6);
        let sampler = GlyphSampler::new();
        let config = SceneConfig::default().ornament_layers[0].clone();
        let mut layer = OrnamentLayer::new(config, &tree(), 15.0, 12.0, &sampler, 'A', &mut rng);

        let scatter_before: Vec<_> =
            layer.entities().iter().map(|e| e.scatter_target).collect();
        let glyph_before: Vec<_> =
            layer.entities().iter().map(|e| e.shape_target_glyph).collect();

        layer.retarget_glyph(&sampler, 'B', &mut rng);

        let scatter_after: Vec<_> =
            layer.entities().iter().map(|e| e.scatter_target).collect();
        let glyph_after: Vec<_> =
            layer.entities().iter().map(|e| e.shape_target_glyph).collect();
        assert_eq!(scatter_before, scatter_after);
        assert_ne!(glyph_before, glyph_after);
    }

    #[test]
    fn test_apex_ornament_pinned_and_enlarged() {
        let mut rng = SmallRng::seed_from_u64(7);
        let sampler = GlyphSampler::new();
        let config = SceneConfig::default().ornament_layers[0].clone();
        let layer = OrnamentLayer::new(config, &tree(), 15.0, 12.0, &sampler, 'A', &mut rng);

        let last = layer.entities().last().unwrap();
        assert!(last.shape_target_tree.abs_diff_eq(tree().apex(), 1e-5));

        let mut out = Vec::new();
        layer.instances(0.0, &mut out);
        assert!((out.last().unwrap().scale - 0.8).abs() < 1e-5);
        assert!((out[0].scale - 0.18).abs() < 1e-5);
    }
}
