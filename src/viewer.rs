//! Viewer pose.
//!
//! The engine does not own a camera; the renderer does. It still needs to
//! know where the viewer is so a focused note can fly to a point in front
//! of them. The renderer pushes its pose in through
//! [`Engine::set_viewer`](crate::Engine::set_viewer) whenever it moves.

use glam::Vec3;

/// Where the viewer stands and what they look at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewer {
    pub position: Vec3,
    pub target: Vec3,
}

impl Viewer {
    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self { position, target }
    }

    /// Unit view direction; +Z fallback when position and target coincide.
    pub fn look_dir(&self) -> Vec3 {
        let dir = self.target - self.position;
        if dir.length_squared() > 1e-6 {
            dir.normalize()
        } else {
            Vec3::Z
        }
    }
}

impl Default for Viewer {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 30.0),
            target: Vec3::ZERO,
        }
    }
}
