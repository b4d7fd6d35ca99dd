//! Note texture export
//!
//! Renders one wish-note texture and writes it next to the working
//! directory as a PNG, for eyeballing the gradient and text layout.
//! Run with: cargo run --example note_texture -- "your text here"

use gpde::texture::{save_png, TextureAtlas};
use std::path::Path;

fn main() -> Result<(), gpde::TextureError> {
    let text = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Winter will pass".to_string());

    let mut atlas = TextureAtlas::new();
    let texture = atlas.texture(&text);

    let path = Path::new("note.png");
    save_png(&texture, path)?;
    println!(
        "wrote {} ({}x{})",
        path.display(),
        texture.width(),
        texture.height()
    );
    Ok(())
}
