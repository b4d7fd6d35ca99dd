//! Error types for GPDE.
//!
//! This module provides error types for engine construction and note
//! texture generation.

use std::fmt;

/// Errors that can occur when building an engine.
#[derive(Debug)]
pub enum EngineError {
    /// The glyph rotation was configured empty.
    EmptyGlyphSequence,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::EmptyGlyphSequence => write!(
                f,
                "Glyph sequence is empty. Use .with_glyph_sequence() with at least one character."
            ),
        }
    }
}

impl std::error::Error for EngineError {}

/// Errors that can occur when generating or exporting note textures.
#[derive(Debug)]
pub enum TextureError {
    /// Failed to write texture file to disk.
    Io(std::io::Error),
    /// Failed to encode texture image.
    Encode(image::ImageError),
}

impl fmt::Display for TextureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureError::Io(e) => write!(f, "Failed to write texture file: {}", e),
            TextureError::Encode(e) => write!(f, "Failed to encode texture: {}", e),
        }
    }
}

impl std::error::Error for TextureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TextureError::Io(e) => Some(e),
            TextureError::Encode(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for TextureError {
    fn from(e: std::io::Error) -> Self {
        TextureError::Io(e)
    }
}

impl From<image::ImageError> for TextureError {
    fn from(e: image::ImageError) -> Self {
        TextureError::Encode(e)
    }
}
