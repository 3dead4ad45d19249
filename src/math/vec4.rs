//! 4D vector for homogeneous coordinates.
//!
//! Only used at the boundary of [`Mat4`](super::Mat4) products: points carry
//! `w = 1` and pick up translation, directions carry `w = 0` and do not.

use super::vec3::Vec3;

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// A point (w=1).
    pub const fn point(x: f32, y: f32, z: f32) -> Self {
        Self::new(x, y, z, 1.0)
    }

    /// A direction (w=0).
    pub const fn direction(x: f32, y: f32, z: f32) -> Self {
        Self::new(x, y, z, 0.0)
    }

    /// Drops `w` without dividing by it. Every transform here is affine, so
    /// `w` stays 1 for points.
    pub const fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

impl From<Vec3> for Vec4 {
    fn from(v: Vec3) -> Self {
        Self::point(v.x, v.y, v.z)
    }
}

impl From<Vec4> for Vec3 {
    fn from(v: Vec4) -> Self {
        v.to_vec3()
    }
}
