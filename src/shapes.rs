//! Procedural placement for every entity layer.
//!
//! All functions here are pure given a random source: seed the `SmallRng`
//! and the whole layout reproduces exactly. Nothing in this module touches
//! shared state.
//!
//! Three distributions do the real work:
//! - a cone for the tree silhouette (linear height, radius shrinking to the
//!   apex),
//! - a golden-angle phyllotaxis spiral over the cone surface for ornaments
//!   (the sunflower-seed packing trick: equal-area height mapping plus the
//!   golden angle gives even coverage with no angular overlaps),
//! - a spherical shell for scatter targets, sampled with the
//!   inverse-cosine-latitude method so points do not cluster at the poles.

use glam::Vec3;
use rand::Rng;
use std::f32::consts::{PI, TAU};

/// The golden angle, `pi * (3 - sqrt(5))`.
pub const GOLDEN_ANGLE: f32 = PI * (3.0 - 2.236_068);

/// Bottom radius of the ribbon spiral.
pub const RIBBON_RADIUS_BOTTOM: f32 = 10.0;
/// Top radius of the ribbon spiral.
pub const RIBBON_RADIUS_TOP: f32 = 2.0;
/// Extra height the ribbon extends past the tree cone.
pub const RIBBON_HEIGHT_PADDING: f32 = 4.0;

/// Base radius of the note anchor shell.
pub const NOTE_ANCHOR_RADIUS: f32 = 7.5;

/// The cone the tree silhouette lives on.
#[derive(Debug, Clone, Copy)]
pub struct TreeShape {
    /// Total cone height; the cone is centered on y = 0.
    pub height: f32,
    /// Radius at the cone base.
    pub radius: f32,
}

impl TreeShape {
    pub fn new(height: f32, radius: f32) -> Self {
        Self { height, radius }
    }

    /// Point on the cone at height fraction `ratio` (0 = base, 1 = apex).
    ///
    /// `azimuth` picks the angle around the trunk; `None` draws a uniformly
    /// random one. `radius_offset` widens the cone for outer layers.
    pub fn position<R: Rng>(
        &self,
        ratio: f32,
        azimuth: Option<f32>,
        radius_offset: f32,
        rng: &mut R,
    ) -> Vec3 {
        let y = -self.height / 2.0 + ratio * self.height;
        let r = (1.0 - ratio) * (self.radius + radius_offset);
        let theta = azimuth.unwrap_or_else(|| rng.gen_range(0.0..TAU));
        Vec3::new(r * theta.cos(), y, r * theta.sin())
    }

    /// The exact cone apex.
    pub fn apex(&self) -> Vec3 {
        Vec3::new(0.0, self.height / 2.0, 0.0)
    }

    /// Phyllotaxis placement for ornament `index` of `count`.
    ///
    /// Height uses the equal-area mapping `1 - sqrt(1 - area_ratio)` so the
    /// spiral covers the cone surface evenly instead of bunching at the
    /// narrow top.
    pub fn phyllotaxis_position(
        &self,
        index: usize,
        count: usize,
        angle_offset: f32,
        radius_offset: f32,
    ) -> Vec3 {
        let area_ratio = (index as f32 + 0.5) / count as f32;
        let h = 1.0 - (1.0 - area_ratio).sqrt();
        let theta = index as f32 * GOLDEN_ANGLE + angle_offset;
        let y = -self.height / 2.0 + h * self.height;
        let r = (1.0 - h) * (self.radius + radius_offset);
        Vec3::new(r * theta.cos(), y, r * theta.sin())
    }
}

/// Cartesian point from spherical coordinates (y-up, matching the
/// renderer's convention: `phi` from +Y, `theta` around Y from +Z).
pub fn from_spherical(radius: f32, phi: f32, theta: f32) -> Vec3 {
    let sin_phi = phi.sin();
    Vec3::new(
        radius * sin_phi * theta.sin(),
        radius * phi.cos(),
        radius * sin_phi * theta.cos(),
    )
}

/// Uniform point on a shell of random radius in `[r_min, r_min + spread]`.
///
/// Latitude uses `cos(phi) = 2u - 1` to stay uniform over the sphere.
pub fn scatter_on_shell<R: Rng>(r_min: f32, spread: f32, rng: &mut R) -> Vec3 {
    let radius = r_min + rng.gen::<f32>() * spread;
    let phi = (2.0 * rng.gen::<f32>() - 1.0).acos();
    let theta = rng.gen_range(0.0..TAU);
    from_spherical(radius, phi, theta)
}

/// Scatter target for shape entities, on the outer shell.
pub fn scatter_position<R: Rng>(rng: &mut R) -> Vec3 {
    scatter_on_shell(
        crate::config::SCATTER_RADIUS_MIN,
        crate::config::SCATTER_RADIUS_MAX - crate::config::SCATTER_RADIUS_MIN,
        rng,
    )
}

/// Random unit vector, used for per-entity explosion directions.
pub fn random_direction<R: Rng>(rng: &mut R) -> Vec3 {
    loop {
        let v = Vec3::new(
            rng.gen::<f32>() - 0.5,
            rng.gen::<f32>() - 0.5,
            rng.gen::<f32>() - 0.5,
        );
        if v.length_squared() > 1e-6 {
            return v.normalize();
        }
    }
}

/// Point on the conical ribbon spiral at parameter `t` in [0, 1].
pub fn ribbon_position(t: f32, tree_height: f32, turns: f32) -> Vec3 {
    let theta = t * turns * TAU;
    let extent = tree_height + RIBBON_HEIGHT_PADDING;
    let y = -extent / 2.0 + t * extent;
    let r = RIBBON_RADIUS_BOTTOM + (RIBBON_RADIUS_TOP - RIBBON_RADIUS_BOTTOM) * t;
    Vec3::new(r * theta.cos(), y, r * theta.sin())
}

/// Anchor point for note `index` of `count`, wound loosely around the tree.
///
/// Notes climb a shallow spiral from below the equator (`y_progress`
/// sweeps -0.3 → 1.0) with a slight random radial spread.
pub fn note_anchor<R: Rng>(index: usize, count: usize, rng: &mut R) -> Vec3 {
    let denom = (count.saturating_sub(1)).max(1) as f32;
    let y_progress = (-0.3 + 1.3 * index as f32 / denom).clamp(-1.0, 1.0);
    let phi = y_progress.acos();
    let theta = (count as f32 * PI).sqrt() * phi * 5.0;
    let radius = NOTE_ANCHOR_RADIUS + rng.gen::<f32>() + 0.5;
    from_spherical(radius, phi, theta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3Swizzles;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_tree_position_base_and_apex() {
        let tree = TreeShape::new(16.0, 6.0);
        let mut rng = SmallRng::seed_from_u64(1);

        let base = tree.position(0.0, Some(0.0), 0.0, &mut rng);
        assert!((base.y - (-8.0)).abs() < 1e-5);
        assert!((base.xz().length() - 6.0).abs() < 1e-5);

        let top = tree.position(1.0, Some(0.0), 0.0, &mut rng);
        assert!((top.y - 8.0).abs() < 1e-5);
        assert!(top.xz().length() < 1e-5);
    }

    #[test]
    fn test_tree_position_deterministic_with_seed() {
        let tree = TreeShape::new(16.0, 6.0);
        let a = tree.position(0.4, None, 0.0, &mut SmallRng::seed_from_u64(7));
        let b = tree.position(0.4, None, 0.0, &mut SmallRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_scatter_radius_in_range() {
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..200 {
            let r = scatter_position(&mut rng).length();
            assert!((15.0..=35.0).contains(&r), "radius {} out of shell", r);
        }
    }

    #[test]
    fn test_phyllotaxis_azimuths_distinct() {
        // 1500 ornaments: the golden angle never lands two of them on
        // bitwise-equal azimuths.
        let mut seen = HashSet::new();
        for i in 0..1500usize {
            let theta = (i as f32 * GOLDEN_ANGLE).rem_euclid(TAU);
            assert!(seen.insert(theta.to_bits()), "duplicate azimuth at {}", i);
        }
    }

    #[test]
    fn test_phyllotaxis_covers_cone_height() {
        let tree = TreeShape::new(16.0, 6.0);
        let count = 1000;
        let lowest = tree.phyllotaxis_position(0, count, 0.0, 0.0);
        let highest = tree.phyllotaxis_position(count - 1, count, 0.0, 0.0);
        assert!(lowest.y < -7.0);
        assert!(highest.y > 5.0);
        assert!(lowest.xz().length() > highest.xz().length());
    }

    #[test]
    fn test_random_direction_unit_length() {
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..100 {
            let d = random_direction(&mut rng);
            assert!((d.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_ribbon_endpoints() {
        let bottom = ribbon_position(0.0, 16.0, 3.0);
        let top = ribbon_position(1.0, 16.0, 3.0);
        assert!((bottom.y - (-10.0)).abs() < 1e-5);
        assert!((top.y - 10.0).abs() < 1e-5);
        assert!((bottom.xz().length() - RIBBON_RADIUS_BOTTOM).abs() < 1e-4);
        assert!((top.xz().length() - RIBBON_RADIUS_TOP).abs() < 1e-3);
    }

    #[test]
    fn test_note_anchor_radius_band() {
        let mut rng = SmallRng::seed_from_u64(5);
        for i in 0..10 {
            let len = note_anchor(i, 10, &mut rng).length();
            assert!((8.0..=9.0).contains(&len), "anchor radius {}", len);
        }
    }
}
