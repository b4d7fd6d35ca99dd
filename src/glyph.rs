//! Glyph sampling: character → binary mask → point cloud.
//!
//! A [`GlyphSampler`] rasterizes a character into a fixed-resolution
//! grayscale mask, collects every cell brighter than a threshold into a
//! candidate list in normalized `[-0.5, 0.5]²` coordinates (image rows map
//! to negative Y so the glyph reads upright in a y-up world), then fills
//! each requested output slot with an independently drawn candidate.
//! Sampling is with replacement on purpose: two calls for the same glyph
//! yield different but statistically similar clouds.
//!
//! Rasterization is pluggable through [`GlyphRaster`]. The built-in backend
//! upscales the 8×8 bitmap font, which covers ASCII; characters outside the
//! backend's coverage produce an empty mask and therefore a zero-filled
//! cloud, never an error.

use crate::config::{GLYPH_INTENSITY_THRESHOLD, GLYPH_MASK_SIZE, GLYPH_Z_JITTER};
use font8x8::legacy::BASIC_LEGACY;
use glam::{Vec2, Vec3};
use image::GrayImage;
use rand::Rng;

/// Renders one character into a square grayscale mask.
///
/// Implement this to plug a real font backend in; the engine only ever
/// calls it through [`GlyphSampler`].
pub trait GlyphRaster: Send + Sync {
    /// Render `glyph` into a `size`×`size` mask. Unsupported characters
    /// must return a blank (all-zero) mask rather than fail.
    fn rasterize(&self, glyph: char, size: u32) -> GrayImage;
}

/// Default raster backend: the 8×8 bitmap font, nearest-upscaled.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinFont;

impl GlyphRaster for BuiltinFont {
    fn rasterize(&self, glyph: char, size: u32) -> GrayImage {
        let mut mask = GrayImage::new(size, size);
        let code = glyph as usize;
        if code >= BASIC_LEGACY.len() {
            return mask;
        }
        let bitmap = BASIC_LEGACY[code];
        let cell = (size / 8).max(1);
        for (row, bits) in bitmap.iter().enumerate() {
            for col in 0..8u32 {
                if bits & (1 << col) == 0 {
                    continue;
                }
                for dy in 0..cell {
                    for dx in 0..cell {
                        let x = col * cell + dx;
                        let y = row as u32 * cell + dy;
                        if x < size && y < size {
                            mask.put_pixel(x, y, image::Luma([255]));
                        }
                    }
                }
            }
        }
        mask
    }
}

/// Samples point clouds from rasterized glyphs.
pub struct GlyphSampler {
    resolution: u32,
    threshold: u8,
    z_jitter: f32,
    raster: Box<dyn GlyphRaster>,
}

impl GlyphSampler {
    /// Sampler with the built-in font backend and reference settings.
    pub fn new() -> Self {
        Self::with_raster(Box::new(BuiltinFont))
    }

    /// Sampler with a custom raster backend.
    pub fn with_raster(raster: Box<dyn GlyphRaster>) -> Self {
        Self {
            resolution: GLYPH_MASK_SIZE,
            threshold: GLYPH_INTENSITY_THRESHOLD,
            z_jitter: GLYPH_Z_JITTER,
            raster,
        }
    }

    /// Draw `count` points from the glyph's filled cells.
    ///
    /// Points are in normalized `[-0.5, 0.5]²` with a small random Z
    /// jitter so the cloud is not perfectly flat. A glyph with no filled
    /// cells yields `count` zero vectors.
    pub fn sample<R: Rng>(&self, glyph: char, count: usize, rng: &mut R) -> Vec<Vec3> {
        let candidates = self.candidates(glyph);
        if candidates.is_empty() {
            return vec![Vec3::ZERO; count];
        }
        (0..count)
            .map(|_| {
                let p = candidates[rng.gen_range(0..candidates.len())];
                let z = rng.gen_range(-self.z_jitter..self.z_jitter);
                Vec3::new(p.x, p.y, z)
            })
            .collect()
    }

    /// All mask cells above the brightness threshold, normalized.
    pub fn candidates(&self, glyph: char) -> Vec<Vec2> {
        let mask = self.raster.rasterize(glyph, self.resolution);
        let size = self.resolution as f32;
        let mut points = Vec::new();
        for (x, y, pixel) in mask.enumerate_pixels() {
            if pixel.0[0] > self.threshold {
                points.push(Vec2::new(x as f32 / size - 0.5, 0.5 - y as f32 / size));
            }
        }
        points
    }
}

impl Default for GlyphSampler {
    fn default() -> Self {
        Self::new()
    }
}
