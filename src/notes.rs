//! Wish notes and exclusive focus.
//!
//! Notes are textured quads wound loosely around the tree. They ride the
//! chaos factor only partially (attenuated blend toward a close-in scatter
//! shell) so their text stays readable even mid-scatter.
//!
//! Focus is exclusive: a pinching left hand close enough to a note claims
//! it, the claimed note flies to a point in front of the viewer and turns
//! to face them, and no other note can be claimed until the pinch is
//! released. When several notes qualify in the same tick the lowest id
//! wins, deterministically.

use crate::config::{
    FOCUS_DISTANCE, FOCUS_FORWARD_OFFSET, NOTE_CHAOS_ATTENUATION, NOTE_FOCUS_FOLLOW_FACTOR,
    NOTE_FOLLOW_FACTOR, NOTE_SCATTER_RADIUS_MIN, NOTE_SCATTER_RADIUS_SPREAD,
};
use crate::render::NoteInstance;
use crate::shapes;
use crate::state::{AnimationState, HandSignal, NoteId};
use crate::texture::TextureAtlas;
use crate::viewer::Viewer;
use glam::{Quat, Vec3};
use rand::Rng;

const NOTE_SCALE: f32 = 1.8;
const NOTE_FOCUS_SCALE: f32 = 2.4;

/// One wish note.
#[derive(Debug, Clone)]
pub struct Note {
    pub id: NoteId,
    pub text: String,
    anchor: Vec3,
    scatter_target: Vec3,
    position: Vec3,
    rotation: Quat,
}

impl Note {
    fn new<R: Rng>(id: NoteId, text: String, count: usize, rng: &mut R) -> Self {
        let anchor = shapes::note_anchor(id, count, rng);
        let scatter_target =
            shapes::scatter_on_shell(NOTE_SCATTER_RADIUS_MIN, NOTE_SCATTER_RADIUS_SPREAD, rng);
        Self {
            id,
            text,
            anchor,
            scatter_target,
            position: anchor,
            rotation: face_center_rotation(anchor),
        }
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    pub fn anchor(&self) -> Vec3 {
        self.anchor
    }
}

/// Quad orientation that faces the trunk from the note's position.
fn face_center_rotation(position: Vec3) -> Quat {
    let inward = Vec3::new(-position.x, 0.0, -position.z);
    if inward.length_squared() > 1e-6 {
        Quat::from_rotation_arc(Vec3::Z, inward.normalize())
    } else {
        Quat::IDENTITY
    }
}

/// All notes plus the focus logic that arbitrates between them.
pub struct NoteBoard {
    notes: Vec<Note>,
}

impl NoteBoard {
    pub fn new<R: Rng>(texts: &[String], rng: &mut R) -> Self {
        let count = texts.len();
        let notes = texts
            .iter()
            .enumerate()
            .map(|(id, text)| Note::new(id, text.clone(), count, rng))
            .collect();
        Self { notes }
    }

    /// Resolve focus for this tick, then move every note.
    pub fn update(&mut self, state: &mut AnimationState, viewer: &Viewer, chaos: f32) {
        self.resolve_focus(state);
        let focused = state.focused_note;

        for note in &mut self.notes {
            if focused == Some(note.id) {
                let target = viewer.position + viewer.look_dir() * FOCUS_FORWARD_OFFSET;
                note.position = note.position.lerp(target, NOTE_FOCUS_FOLLOW_FACTOR);

                let to_viewer = viewer.position - note.position;
                if to_viewer.length_squared() > 1e-6 {
                    let facing = Quat::from_rotation_arc(Vec3::Z, to_viewer.normalize());
                    note.rotation = note.rotation.slerp(facing, NOTE_FOCUS_FOLLOW_FACTOR);
                }
            } else {
                let blend = chaos * NOTE_CHAOS_ATTENUATION;
                let target = note.anchor.lerp(note.scatter_target, blend);
                note.position = note.position.lerp(target, NOTE_FOLLOW_FACTOR);
                note.rotation = note
                    .rotation
                    .slerp(face_center_rotation(note.position), NOTE_FOLLOW_FACTOR);
            }
        }
    }

    /// Claim or release the focus slot based on the left hand.
    ///
    /// A held claim persists while the pinch lasts even if the hand drifts
    /// out of grab range; the distance check gates claiming only.
    fn resolve_focus(&self, state: &mut AnimationState) {
        let pinching_hand = state
            .hands
            .left
            .filter(|hand: &HandSignal| hand.is_pinching);

        let hand = match pinching_hand {
            Some(hand) => hand,
            None => {
                state.focused_note = None;
                return;
            }
        };

        if state.focused_note.is_some() {
            return;
        }

        // Lowest id wins among all notes in range this tick.
        state.focused_note = self
            .notes
            .iter()
            .find(|note| note.position.distance(hand.position) < FOCUS_DISTANCE)
            .map(|note| note.id);
    }

    /// Render instances for every note, resolving textures through `atlas`.
    pub fn instances(
        &self,
        atlas: &mut TextureAtlas,
        focused: Option<NoteId>,
        out: &mut Vec<NoteInstance>,
    ) {
        out.clear();
        for note in &self.notes {
            let is_focused = focused == Some(note.id);
            out.push(NoteInstance {
                id: note.id,
                position: note.position,
                rotation: note.rotation,
                scale: if is_focused {
                    NOTE_FOCUS_SCALE
                } else {
                    NOTE_SCALE
                },
                focused: is_focused,
                texture: atlas.texture(&note.text),
            });
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }
}
