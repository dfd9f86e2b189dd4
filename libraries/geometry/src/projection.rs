use std::ops::Range;

use glam::Mat4;

#[derive(Clone, Debug)]
pub enum Projection {
    Perspective {
        surface_width: u32,
        surface_height: u32,
        fov: f32,
        z_range: Range<f32>,
    },
}

impl Projection {
    #[must_use]
    pub fn new_perspective(
        (surface_width, surface_height): (u32, u32),
        fov: f32,
        z_range: Range<f32>,
    ) -> Self {
        Self::Perspective {
            surface_width,
            surface_height,
            fov,
            z_range,
        }
    }

    fn surface_width(&self) -> u32 {
        match *self {
            Projection::Perspective { surface_width, .. } => surface_width,
        }
    }

    fn surface_height(&self) -> u32 {
        match *self {
            Projection::Perspective { surface_height, .. } => surface_height,
        }
    }

    #[must_use]
    pub fn near(&self) -> f32 {
        match *self {
            Projection::Perspective { ref z_range, .. } => z_range.start,
        }
    }

    #[must_use]
    pub fn far(&self) -> f32 {
        match *self {
            Projection::Perspective { ref z_range, .. } => z_range.end,
        }
    }

    fn fov(&self) -> f32 {
        match *self {
            Projection::Perspective { fov, .. } => fov,
        }
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "surface sizes are far below the precision limit of f32"
    )]
    fn aspect_ratio(&self) -> f32 {
        // a minimized window reports a height of zero
        self.surface_width() as f32 / self.surface_height().max(1) as f32
    }

    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov(), self.aspect_ratio(), self.near(), self.far())
    }

    pub fn set_surface_dimensions(&mut self, (new_surface_width, new_surface_height): (u32, u32)) {
        match *self {
            Projection::Perspective {
                ref mut surface_width,
                ref mut surface_height,
                ..
            } => {
                *surface_width = new_surface_width;
                *surface_height = new_surface_height;
            }
        }
    }

    pub fn set_z_range(&mut self, new_z_range: Range<f32>) {
        match *self {
            Projection::Perspective {
                ref mut z_range, ..
            } => {
                *z_range = new_z_range;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn z_range_can_be_replaced() {
        let mut projection =
            Projection::new_perspective((800, 600), 75_f32.to_radians(), 0.1..100.0);
        projection.set_z_range(0.05..42.0);

        assert!((projection.near() - 0.05).abs() < f32::EPSILON, "near plane");
        assert!((projection.far() - 42.0).abs() < f32::EPSILON, "far plane");
    }

    #[test]
    fn zero_height_surface_yields_finite_matrix() {
        let projection = Projection::new_perspective((800, 0), 75_f32.to_radians(), 0.1..100.0);
        assert!(projection.matrix().is_finite(), "matrix must stay finite");
    }
}
