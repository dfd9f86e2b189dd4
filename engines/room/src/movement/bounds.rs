use glam::Vec3;
use lib_geometry::Aabb;
use log::warn;

/// Walkable area of a room on the horizontal plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoomBounds {
    pub x_min: f32,
    pub x_max: f32,
    pub z_min: f32,
    pub z_max: f32,
}

impl RoomBounds {
    /// Used until a room has been loaded.
    pub const PLACEHOLDER: Self = Self {
        x_min: -2.0,
        x_max: 2.0,
        z_min: -2.0,
        z_max: 2.0,
    };

    /// Shrinks the horizontal extent of `room` by `wall_offset` on every side.
    ///
    /// An axis narrower than twice the offset collapses to the room's center on that axis.
    #[must_use]
    pub fn from_aabb(room: &Aabb, wall_offset: f32) -> Self {
        let center = room.center();
        let shrink = |axis: &str, min: f32, max: f32, center: f32| {
            let (inner_min, inner_max) = (min + wall_offset, max - wall_offset);
            if inner_min <= inner_max {
                (inner_min, inner_max)
            } else {
                warn!(
                    "room is too narrow along {axis} ({:.2}), pinning the player to {center:.2}",
                    max - min
                );
                (center, center)
            }
        };

        let (x_min, x_max) = shrink("x", room.min.x, room.max.x, center.x);
        let (z_min, z_max) = shrink("z", room.min.z, room.max.z, center.z);
        Self {
            x_min,
            x_max,
            z_min,
            z_max,
        }
    }

    /// Clamps x and z of `position` into the bounds; y passes through.
    #[must_use]
    pub fn clamp(&self, position: Vec3) -> Vec3 {
        Vec3::new(
            position.x.clamp(self.x_min, self.x_max),
            position.y,
            position.z.clamp(self.z_min, self.z_max),
        )
    }

    #[must_use]
    pub fn contains(&self, position: Vec3) -> bool {
        (self.x_min..=self.x_max).contains(&position.x)
            && (self.z_min..=self.z_max).contains(&position.z)
    }

    /// Center of the walkable area at height `y`.
    #[must_use]
    pub fn center(&self, y: f32) -> Vec3 {
        Vec3::new(
            (self.x_min + self.x_max) * 0.5,
            y,
            (self.z_min + self.z_max) * 0.5,
        )
    }
}

impl Default for RoomBounds {
    fn default() -> Self {
        Self::PLACEHOLDER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_is_shrunk_by_wall_offset() {
        let room = Aabb::new(Vec3::new(-3.0, 0.0, -4.0), Vec3::new(3.0, 2.5, 4.0));
        let bounds = RoomBounds::from_aabb(&room, 0.5);

        assert_eq!(
            bounds,
            RoomBounds {
                x_min: -2.5,
                x_max: 2.5,
                z_min: -3.5,
                z_max: 3.5,
            },
            "half a unit off every wall"
        );
    }

    #[test]
    fn narrow_axis_collapses_to_center() {
        let room = Aabb::new(Vec3::new(1.0, 0.0, -4.0), Vec3::new(1.6, 2.5, 4.0));
        let bounds = RoomBounds::from_aabb(&room, 0.5);

        assert!((bounds.x_min - 1.3).abs() < 1e-6, "x_min at center");
        assert!((bounds.x_max - 1.3).abs() < 1e-6, "x_max at center");
        assert!(bounds.z_min <= bounds.z_max, "z untouched");
    }

    #[test]
    fn clamp_leaves_height_alone() {
        let bounds = RoomBounds::PLACEHOLDER;
        let clamped = bounds.clamp(Vec3::new(5.0, 7.0, -5.0));

        assert_eq!(clamped, Vec3::new(2.0, 7.0, -2.0), "x and z clamped, y kept");
        assert!(bounds.contains(clamped), "clamped point is inside");
        assert!(!bounds.contains(Vec3::new(2.1, 0.0, 0.0)), "outside along x");
    }

    #[test]
    fn center_uses_given_height() {
        let bounds = RoomBounds {
            x_min: 0.0,
            x_max: 4.0,
            z_min: -2.0,
            z_max: 0.0,
        };
        assert_eq!(bounds.center(1.6), Vec3::new(2.0, 1.6, -1.0), "center");
    }
}
