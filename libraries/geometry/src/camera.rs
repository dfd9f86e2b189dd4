use glam::{Mat4, Vec3};

/// A viewer placed at `position` and looking towards `look_at`.
///
/// The world is y-up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub look_at: Vec3,
    pub up: Vec3,
}

impl Camera {
    #[must_use]
    pub fn new(eye: Vec3, center: Vec3) -> Self {
        Self {
            position: eye,
            look_at: center,
            up: Vec3::Y,
        }
    }

    /// Unit vector pointing from the eye towards the look-at point.
    ///
    /// Falls back to -z when both points coincide.
    #[must_use]
    pub fn look_direction(&self) -> Vec3 {
        (self.look_at - self.position)
            .try_normalize()
            .unwrap_or(Vec3::NEG_Z)
    }

    /// Moves the eye to `position` while keeping the current look direction.
    pub fn move_to(&mut self, position: Vec3) {
        let direction = self.look_direction();
        self.position = position;
        self.look_at = position + direction;
    }

    /// Turns the camera to look along `direction` from its current position.
    pub fn look_along(&mut self, direction: Vec3) {
        self.look_at = self.position + direction;
    }

    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.look_at, self.up)
    }
}
