//! Headless engine run
//!
//! Drives the engine without any renderer or camera and prints a few frame
//! statistics, useful for smoke-testing the simulation on a machine with
//! no GPU. Run with: cargo run --example headless

use gpde::prelude::*;

fn main() -> Result<(), gpde::EngineError> {
    let mut engine = Engine::builder()
        .with_seed(7)
        .with_fixed_delta(1.0 / 60.0)
        .build()?;

    // Two seconds of idle, then snapshot.
    for _ in 0..120 {
        engine.tick();
    }
    let frame = engine.render_frame();

    println!("mode:            {:?}", engine.mode());
    println!("active glyph:    {}", engine.active_glyph());
    println!("chaos:           {:.3}", frame.uniforms.chaos_factor);
    println!("outer yaw:       {:.4} rad", frame.outer_yaw);
    println!("foliage points:  {}", frame.foliage.len());
    println!("ornaments:       {}", frame.ornaments.len());
    println!("ribbon shards:   {}", frame.ribbon.len());
    println!("notes:           {}", frame.notes.len());

    let bytes: &[u8] = gpde::render::instance_bytes(&frame.foliage);
    println!("foliage buffer:  {} bytes", bytes.len());
    Ok(())
}
