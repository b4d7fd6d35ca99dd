//! Note texture generation.
//!
//! Each note is a textured quad: a soft radial-gradient disc with its wish
//! text drawn over the center. Textures are built lazily and cached by
//! text, so notes sharing a message share one image, and the renderer can
//! key GPU uploads off the `Arc` pointer.
//!
//! Text uses the same 8x8 bitmap font as the glyph sampler, scaled up and
//! centered, one line per `\n`. Characters outside the font's coverage
//! render as blank cells rather than failing.

use crate::error::TextureError;
use font8x8::legacy::BASIC_LEGACY;
use image::{Rgba, RgbaImage};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Side length of every note texture, in pixels.
pub const NOTE_TEXTURE_SIZE: u32 = 512;
/// Upscaling factor applied to the 8x8 font cells.
const TEXT_SCALE: u32 = 4;

// Gradient stops: sky blue core fading to transparent at the rim.
const DISC_INNER: [f32; 4] = [186.0, 230.0, 253.0, 242.0];
const DISC_MID: [f32; 4] = [224.0, 242.0, 254.0, 204.0];
const DISC_MID_STOP: f32 = 0.6;
/// Deep blue ink for the wish text.
const TEXT_COLOR: Rgba<u8> = Rgba([30, 58, 138, 255]);

/// Builds and caches note textures.
pub struct TextureAtlas {
    cache: HashMap<String, Arc<RgbaImage>>,
}

impl TextureAtlas {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
        }
    }

    /// Texture for `text`, building it on first request.
    pub fn texture(&mut self, text: &str) -> Arc<RgbaImage> {
        if let Some(texture) = self.cache.get(text) {
            return texture.clone();
        }
        let texture = Arc::new(render_note(text));
        self.cache.insert(text.to_owned(), texture.clone());
        texture
    }

    /// Number of distinct textures built so far.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

impl Default for TextureAtlas {
    fn default() -> Self {
        Self::new()
    }
}

/// Write a note texture out as a PNG, for debugging or asset baking.
pub fn save_png(texture: &RgbaImage, path: &Path) -> Result<(), TextureError> {
    texture.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}

/// Render the full note: gradient disc plus centered text.
fn render_note(text: &str) -> RgbaImage {
    let mut image = RgbaImage::new(NOTE_TEXTURE_SIZE, NOTE_TEXTURE_SIZE);
    paint_disc(&mut image);
    paint_text(&mut image, text);
    image
}

/// Radial gradient: inner color to mid color to fully transparent rim.
fn paint_disc(image: &mut RgbaImage) {
    let size = NOTE_TEXTURE_SIZE as f32;
    let center = size / 2.0;
    let radius = size / 2.0;
    for (x, y, pixel) in image.enumerate_pixels_mut() {
        let dx = x as f32 + 0.5 - center;
        let dy = y as f32 + 0.5 - center;
        let t = (dx * dx + dy * dy).sqrt() / radius;
        let color = if t <= DISC_MID_STOP {
            mix(DISC_INNER, DISC_MID, t / DISC_MID_STOP)
        } else if t <= 1.0 {
            let fade = (t - DISC_MID_STOP) / (1.0 - DISC_MID_STOP);
            let mut c = DISC_MID;
            c[3] *= 1.0 - fade;
            c
        } else {
            [0.0; 4]
        };
        *pixel = Rgba([
            color[0] as u8,
            color[1] as u8,
            color[2] as u8,
            color[3] as u8,
        ]);
    }
}

fn mix(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
        a[3] + (b[3] - a[3]) * t,
    ]
}

/// Draw `text` centered, one line per `\n`.
fn paint_text(image: &mut RgbaImage, text: &str) {
    let lines: Vec<&str> = text.split('\n').collect();
    let cell = 8 * TEXT_SCALE;
    let line_gap = cell / 2;
    let block_height = lines.len() as u32 * cell + lines.len().saturating_sub(1) as u32 * line_gap;
    let mut y = NOTE_TEXTURE_SIZE.saturating_sub(block_height) / 2;

    for line in lines {
        let width = line.chars().count() as u32 * cell;
        let mut x = NOTE_TEXTURE_SIZE.saturating_sub(width) / 2;
        for glyph in line.chars() {
            paint_glyph(image, glyph, x, y);
            x += cell;
        }
        y += cell + line_gap;
    }
}

fn paint_glyph(image: &mut RgbaImage, glyph: char, origin_x: u32, origin_y: u32) {
    let code = glyph as usize;
    if code >= BASIC_LEGACY.len() {
        return;
    }
    let bitmap = BASIC_LEGACY[code];
    for (row, bits) in bitmap.iter().enumerate() {
        for col in 0..8u32 {
            if bits & (1 << col) == 0 {
                continue;
            }
            for dy in 0..TEXT_SCALE {
                for dx in 0..TEXT_SCALE {
                    let x = origin_x + col * TEXT_SCALE + dx;
                    let y = origin_y + row as u32 * TEXT_SCALE + dy;
                    if x < NOTE_TEXTURE_SIZE && y < NOTE_TEXTURE_SIZE {
                        image.put_pixel(x, y, TEXT_COLOR);
                    }
                }
            }
        }
    }
}
