/// Tuning values of the player movement. All lengths are in meters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MovementConfig {
    /// Walking speed in m/s.
    pub speed: f32,
    /// Radius of the cylinder around the player that must not intersect the walls.
    pub collision_radius: f32,
    /// Extra distance kept from the walls on top of `collision_radius`.
    pub wall_margin: f32,
    /// Distance between the floor and the eyes.
    pub eye_height: f32,
    /// Thumbstick deflections up to this magnitude are ignored.
    pub stick_deadzone: f32,
    /// Added to the forward input while the primary controller button is held.
    pub forward_assist: f32,
}

impl MovementConfig {
    /// How far the walkable area stays away from the room's bounding box.
    #[must_use]
    pub fn wall_offset(&self) -> f32 {
        self.collision_radius + self.wall_margin
    }
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            speed: 1.3,
            collision_radius: 0.35,
            wall_margin: 0.15,
            eye_height: 1.6,
            stick_deadzone: 0.15,
            forward_assist: 0.8,
        }
    }
}
