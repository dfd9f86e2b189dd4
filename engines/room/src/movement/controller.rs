use glam::{Vec2, Vec3};

use super::{FrameInput, MovementConfig, RoomBounds};

/// Below this squared length the input vector is used as is.
const NORMALIZE_THRESHOLD: f32 = 1e-4;

/// Walks the player through the room, keeping them inside its bounds and at eye height.
#[derive(Clone, Debug)]
pub struct PlayerController {
    config: MovementConfig,
    bounds: RoomBounds,
    floor_height: f32,
    position: Vec3,
}

impl PlayerController {
    /// Starts at the origin at eye height inside the placeholder bounds.
    #[must_use]
    pub fn new(config: MovementConfig) -> Self {
        Self {
            position: Vec3::new(0.0, config.eye_height, 0.0),
            config,
            bounds: RoomBounds::PLACEHOLDER,
            floor_height: 0.0,
        }
    }

    #[must_use]
    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    #[must_use]
    pub fn bounds(&self) -> &RoomBounds {
        &self.bounds
    }

    #[must_use]
    pub fn floor_height(&self) -> f32 {
        self.floor_height
    }

    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Height of the player's eyes above world zero.
    #[must_use]
    pub fn eye_level(&self) -> f32 {
        self.floor_height + self.config.eye_height
    }

    /// Replaces the walkable area and moves the player to its center.
    ///
    /// Returns the new position.
    pub fn place_in_room(&mut self, bounds: RoomBounds, floor_height: f32) -> Vec3 {
        self.bounds = bounds;
        self.floor_height = floor_height;
        self.position = bounds.center(self.eye_level());
        self.position
    }

    /// Puts the player back at eye level without moving horizontally.
    ///
    /// Returns the new position.
    pub fn pin_to_eye_height(&mut self) -> Vec3 {
        self.position.y = self.eye_level();
        self.position
    }

    /// Advances the player by `delta` seconds of `input` while looking along `look_direction`.
    ///
    /// Returns the new position or `None` if the player didn't move.
    pub fn update(
        &mut self,
        delta: f32,
        input: &FrameInput<'_>,
        look_direction: Vec3,
    ) -> Option<Vec3> {
        let mut input = input.input_vector(&self.config);
        if input == Vec2::ZERO {
            return None;
        }
        if input.length_squared() > NORMALIZE_THRESHOLD {
            input = input.normalize();
        }

        // looking straight up or down leaves no horizontal heading to walk along
        let displacement = Vec3::new(look_direction.x, 0.0, look_direction.z)
            .try_normalize()
            .map_or(Vec3::ZERO, |forward| {
                let right = forward.cross(Vec3::Y);
                (forward * -input.y + right * input.x) * self.config.speed * delta
            });

        let mut candidate = self.bounds.clamp(self.position + displacement);
        candidate.y = self.eye_level();

        self.position = candidate;
        Some(candidate)
    }
}

impl Default for PlayerController {
    fn default() -> Self {
        Self::new(MovementConfig::default())
    }
}
