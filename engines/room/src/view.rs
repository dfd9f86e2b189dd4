use std::f32::consts::{PI, TAU};

use glam::Vec3;

/// Pitch stays this far away from looking straight up or down.
const MAX_PITCH: f32 = 85.0 * PI / 180.0;

/// Radians per pixel of mouse motion.
const DEFAULT_SENSITIVITY: f32 = 0.004;

/// Turns the view while the left mouse button is held down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LookControl {
    /// Rotation around the y axis; zero looks along -z, positive turns towards +x.
    yaw: f32,
    /// Rotation above the horizon; positive looks up.
    pitch: f32,
    dragging: bool,
    sensitivity: f32,
}

impl LookControl {
    /// Starts out looking along `direction`.
    #[must_use]
    pub fn looking_along(direction: Vec3) -> Self {
        let mut look = Self::default();
        look.set_direction(direction);
        look
    }

    pub fn set_direction(&mut self, direction: Vec3) {
        let Some(direction) = direction.try_normalize() else {
            return;
        };
        self.yaw = direction.x.atan2(-direction.z);
        self.pitch = direction.y.asin().clamp(-MAX_PITCH, MAX_PITCH);
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
    }

    /// Applies a mouse motion of (`dx`, `dy`) pixels if a drag is in progress.
    ///
    /// Dragging to the right turns right, dragging down looks down.
    /// Returns whether the direction changed.
    pub fn rotate(&mut self, dx: f64, dy: f64) -> bool {
        if !self.dragging {
            return false;
        }
        #[expect(
            clippy::cast_possible_truncation,
            reason = "mouse deltas are small pixel counts"
        )]
        let (dx, dy) = (dx as f32, dy as f32);
        self.yaw = (self.yaw + dx * self.sensitivity).rem_euclid(TAU);
        self.pitch = (self.pitch - dy * self.sensitivity).clamp(-MAX_PITCH, MAX_PITCH);
        true
    }

    /// Unit vector of the current viewing direction.
    #[must_use]
    pub fn direction(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Vec3::new(sin_yaw * cos_pitch, sin_pitch, -cos_yaw * cos_pitch)
    }
}

impl Default for LookControl {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            dragging: false,
            sensitivity: DEFAULT_SENSITIVITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_looks_along_negative_z() {
        assert!(
            LookControl::default()
                .direction()
                .abs_diff_eq(Vec3::NEG_Z, 1e-6),
            "yaw and pitch zero"
        );
    }

    #[test]
    fn direction_survives_a_round_trip() {
        let direction = Vec3::new(1.0, -0.3, -1.0).normalize();
        let look = LookControl::looking_along(direction);

        assert!(
            look.direction().abs_diff_eq(direction, 1e-5),
            "{} != {direction}",
            look.direction()
        );
    }

    #[test]
    fn motion_without_drag_is_ignored() {
        let mut look = LookControl::default();

        assert!(!look.rotate(100.0, 0.0), "not dragging");
        assert!(look.direction().abs_diff_eq(Vec3::NEG_Z, 1e-6), "unchanged");
    }

    #[test]
    fn dragging_right_turns_right() {
        let mut look = LookControl::default();
        look.set_dragging(true);

        assert!(look.rotate(50.0, 0.0), "dragging");
        let direction = look.direction();
        assert!(direction.x > 0.0, "turned towards +x: {direction}");
        assert!(direction.y.abs() < 1e-6, "still level: {direction}");
    }

    #[test]
    fn pitch_is_clamped() {
        let mut look = LookControl::default();
        look.set_dragging(true);

        look.rotate(0.0, -100_000.0);
        let direction = look.direction();
        assert!(direction.y < 1.0, "never straight up: {direction}");
        assert!(
            (direction.y - MAX_PITCH.sin()).abs() < 1e-5,
            "stops at the limit: {direction}"
        );
    }
}
