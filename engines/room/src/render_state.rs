use std::{ops::Range, sync::Arc};

use lib_geometry::Camera;
use lib_gltf_model::Model;

use crate::game_state::GameState;

/// Contains every game information that is required to render the scene.
pub struct RenderState {
    pub(crate) camera: Camera,
    pub(crate) view_range: Range<f32>,
    /// Value of [`GameState::room_generation`] when `room` was copied.
    pub(crate) room_generation: u64,
    pub(crate) room: Option<Arc<Model>>,
}

impl RenderState {
    #[must_use]
    pub fn new(game_state: &GameState) -> Self {
        Self {
            camera: game_state.camera,
            view_range: game_state.view_range.clone(),
            room_generation: game_state.room_generation,
            room: game_state.room.clone(),
        }
    }

    /// Copies the current view from `game_state`.
    ///
    /// Returns `true` if a different room has been loaded since the last update.
    pub fn update(&mut self, game_state: &GameState) -> bool {
        self.camera = game_state.camera;
        self.view_range.clone_from(&game_state.view_range);

        if game_state.room_generation == self.room_generation {
            return false;
        }
        self.room_generation = game_state.room_generation;
        self.room.clone_from(&game_state.room);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use lib_geometry::Aabb;

    #[test]
    fn room_is_picked_up_once() {
        let mut game_state = GameState::default();
        let mut render_state = RenderState::new(&game_state);
        assert!(render_state.room.is_none(), "nothing loaded yet");

        game_state.apply_room(Model {
            meshes: Vec::new(),
            bounds: Some(Aabb::new(Vec3::splat(-2.0), Vec3::splat(2.0))),
        });

        assert!(render_state.update(&game_state), "new room");
        assert!(render_state.room.is_some(), "room copied");
        assert_eq!(render_state.camera, game_state.camera, "camera copied");
        assert!(!render_state.update(&game_state), "same room again");
    }
}
