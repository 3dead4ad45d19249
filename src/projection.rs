//! Perspective projection onto the canvas.
//!
//! Camera-space points are divided by depth onto a projection plane at
//! `z = projection_z`, then the viewport window on that plane is scaled to the
//! canvas size. The result is a centered canvas coordinate: `(0, 0)` is the
//! middle of the screen and `y` grows upward.

use crate::math::{Vec2, Vec2i, Vec3};

/// Perspective projection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Distance from the camera to the projection plane.
    projection_z: f32,
    /// Side length of the square viewport window on the projection plane.
    viewport_size: f32,
    width: u32,
    height: u32,
}

impl Projection {
    pub const DEFAULT_PROJECTION_Z: f32 = 1.0;
    pub const DEFAULT_VIEWPORT_SIZE: f32 = 1.0;

    /// Creates a projection for a `width` x `height` canvas with the default
    /// projection plane and viewport.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_params(
            width,
            height,
            Self::DEFAULT_PROJECTION_Z,
            Self::DEFAULT_VIEWPORT_SIZE,
        )
    }

    pub fn with_params(width: u32, height: u32, projection_z: f32, viewport_size: f32) -> Self {
        Self {
            projection_z,
            viewport_size,
            width,
            height,
        }
    }

    pub fn projection_z(&self) -> f32 {
        self.projection_z
    }

    pub fn viewport_size(&self) -> f32 {
        self.viewport_size
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Projects a camera-space point to canvas coordinates.
    ///
    /// `v.z` must be non-zero. Clipped geometry always has `z >= 1`.
    #[inline]
    pub fn project(&self, v: Vec3) -> Vec2i {
        let on_plane = Vec2::new(
            v.x * self.projection_z / v.z,
            v.y * self.projection_z / v.z,
        );
        self.viewport_to_canvas(on_plane)
    }

    /// Scales a point on the viewport window to canvas coordinates.
    /// Fractions are truncated toward zero.
    #[inline]
    pub fn viewport_to_canvas(&self, p: Vec2) -> Vec2i {
        Vec2i::new(
            (p.x * self.width as f32 / self.viewport_size) as i32,
            (p.y * self.height as f32 / self.viewport_size) as i32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_maps_to_origin() {
        let proj = Projection::new(200, 100);
        assert_eq!(proj.project(Vec3::new(0.0, 0.0, 4.0)), Vec2i::ZERO);
    }

    #[test]
    fn perspective_divide_shrinks_distant_points() {
        let proj = Projection::new(200, 200);
        assert_eq!(proj.project(Vec3::new(1.0, 1.0, 4.0)), Vec2i::new(50, 50));
        assert_eq!(proj.project(Vec3::new(1.0, -1.0, 2.0)), Vec2i::new(100, -100));
    }

    #[test]
    fn viewport_scales_by_canvas_size() {
        let proj = Projection::new(640, 480);
        assert_eq!(
            proj.viewport_to_canvas(Vec2::new(0.5, 0.5)),
            Vec2i::new(320, 240)
        );
    }

    #[test]
    fn truncates_toward_zero() {
        let proj = Projection::new(10, 10);
        assert_eq!(
            proj.viewport_to_canvas(Vec2::new(0.19, -0.19)),
            Vec2i::new(1, -1)
        );
    }

    #[test]
    fn custom_plane_and_viewport() {
        let proj = Projection::with_params(100, 100, 2.0, 4.0);
        // x' = 1 * 2 / 2 = 1, then 1 * 100 / 4 = 25.
        assert_eq!(proj.project(Vec3::new(1.0, 0.0, 2.0)), Vec2i::new(25, 0));
        assert_eq!(proj.projection_z(), 2.0);
        assert_eq!(proj.viewport_size(), 4.0);
    }
}
