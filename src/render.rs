//! Render-facing data types.
//!
//! The engine never draws; it produces one [`RenderFrame`] per tick and a
//! renderer (GPU, terminal, test harness) consumes it. Instance and uniform
//! structs are `#[repr(C)]` + `Pod` so a GPU renderer can upload the
//! buffers with a single `bytemuck::cast_slice`.

use bytemuck::{Pod, Zeroable};
use glam::{Quat, Vec3, Vec4};
use image::RgbaImage;
use std::sync::Arc;

use crate::state::NoteId;

/// One drawable instance: 48 bytes, directly uploadable.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct RenderInstance {
    pub position: Vec3,
    pub scale: f32,
    /// Rotation quaternion as xyzw.
    pub rotation: Vec4,
    pub color: Vec4,
}

impl RenderInstance {
    /// Unoriented point sprite.
    pub fn point(position: Vec3, scale: f32, color: Vec4) -> Self {
        Self {
            position,
            scale,
            rotation: Vec4::new(0.0, 0.0, 0.0, 1.0),
            color,
        }
    }

    /// Orientation-free sphere (same encoding as a point; the renderer
    /// picks the mesh per layer).
    pub fn sphere(position: Vec3, scale: f32, color: Vec4) -> Self {
        Self::point(position, scale, color)
    }

    /// Oriented flat shard, used by the ribbon.
    pub fn shard(position: Vec3, rotation: Quat, scale: f32, color: Vec4) -> Self {
        Self {
            position,
            scale,
            rotation: Vec4::from(rotation),
            color,
        }
    }
}

/// Raw bytes of an instance slice, ready for a single buffer upload.
pub fn instance_bytes(instances: &[RenderInstance]) -> &[u8] {
    bytemuck::cast_slice(instances)
}

/// Per-frame scalars shared by every layer's shader.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct GlobalUniforms {
    pub chaos_factor: f32,
    /// Seconds since engine start.
    pub elapsed: f32,
    pub _pad: [f32; 2],
}

impl Default for GlobalUniforms {
    fn default() -> Self {
        Self {
            chaos_factor: 0.0,
            elapsed: 0.0,
            _pad: [0.0; 2],
        }
    }
}

/// One note, drawn as a textured quad facing its rotation.
#[derive(Clone, Debug)]
pub struct NoteInstance {
    pub id: NoteId,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: f32,
    pub focused: bool,
    /// Shared with the texture cache; renderers upload it once per text.
    pub texture: Arc<RgbaImage>,
}

/// Hand cursor overlay for one detected hand.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandCursor {
    pub position: Vec3,
    pub pinching: bool,
}

/// Everything a renderer needs for one frame.
#[derive(Clone, Debug, Default)]
pub struct RenderFrame {
    pub uniforms: GlobalUniforms,
    /// Yaw of the inner group (ornaments, focusable content).
    pub inner_yaw: f32,
    /// Yaw of the outer group (foliage, ribbon, notes).
    pub outer_yaw: f32,
    pub foliage: Vec<RenderInstance>,
    pub ornaments: Vec<RenderInstance>,
    pub ribbon: Vec<RenderInstance>,
    pub notes: Vec<NoteInstance>,
    pub hand_cursor: Vec<HandCursor>,
}
