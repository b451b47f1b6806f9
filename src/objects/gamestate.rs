//! Gamestate.rs
//!
//! Resources the rendering side reads between frames.

use crate::objects::movables::BodyId;
use crate::objects::simulation::FrameReport;
use bevy::prelude::*;

/// LastFrame struct: Resource
///
/// Report of the most recent frame. Camera and UI systems look at it to
/// notice merges and splits.
#[derive(Resource, Debug, Default)]
pub struct LastFrame(pub FrameReport);

/// Selection struct: Resource
///
/// Body the user follows, if any. Remapped after every frame, so it keeps
/// pointing at whatever absorbed or replaced the selected body.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Selection(pub Option<BodyId>);

impl Selection {
    pub fn select(&mut self, id: BodyId) {
        self.0 = Some(id);
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }

    pub fn get(&self) -> Option<BodyId> {
        self.0
    }
}
