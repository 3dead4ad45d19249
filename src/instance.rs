//! Placement of a shared mesh in the world.
//!
//! A [`ModelInstance`] borrows its [`Mesh`]; many instances can draw the same
//! mesh at different places and the borrow checker keeps the mesh alive for
//! as long as any of them exists.

use crate::math::{Mat4, Vec3};
use crate::mesh::Mesh;

/// A mesh placed in the world by translation, uniform scale and an
/// axis-angle rotation.
///
/// The composed transform `translation * scale * rotation` is cached and
/// recomputed by every setter, so it always matches the placement fields.
#[derive(Clone, Debug)]
pub struct ModelInstance<'a> {
    mesh: &'a Mesh,
    translation: Vec3,
    scale: f32,
    rotation_angle: f32,
    rotation_axis: Vec3,
    transform: Mat4,
}

impl<'a> ModelInstance<'a> {
    /// Places `mesh` at the origin, unscaled and unrotated.
    pub fn new(mesh: &'a Mesh) -> Self {
        Self::with_placement(mesh, Vec3::ZERO, 1.0, 0.0, Vec3::X)
    }

    /// Places `mesh` with the given translation, scale and rotation
    /// (`rotation_angle` in radians around `rotation_axis`).
    pub fn with_placement(
        mesh: &'a Mesh,
        translation: Vec3,
        scale: f32,
        rotation_angle: f32,
        rotation_axis: Vec3,
    ) -> Self {
        let mut instance = Self {
            mesh,
            translation,
            scale,
            rotation_angle,
            rotation_axis,
            transform: Mat4::identity(),
        };
        instance.compute_transform();
        instance
    }

    fn compute_transform(&mut self) {
        if self.rotation_axis.magnitude() < f32::EPSILON && self.rotation_angle != 0.0 {
            log::warn!(
                "rotation axis {:?} has no direction; rotation of {} rad ignored",
                self.rotation_axis,
                self.rotation_angle
            );
        }
        self.transform = Mat4::translation(self.translation)
            * Mat4::scaling_uniform(self.scale)
            * Mat4::rotation_axis(self.rotation_angle, self.rotation_axis);
    }

    pub fn mesh(&self) -> &'a Mesh {
        self.mesh
    }

    /// The model-to-world transform.
    pub fn transform(&self) -> &Mat4 {
        &self.transform
    }

    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    pub fn set_translation(&mut self, translation: Vec3) -> &mut Self {
        self.translation = translation;
        self.compute_transform();
        self
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f32) -> &mut Self {
        self.scale = scale;
        self.compute_transform();
        self
    }

    pub fn rotation_angle(&self) -> f32 {
        self.rotation_angle
    }

    pub fn rotation_axis(&self) -> Vec3 {
        self.rotation_axis
    }

    /// Sets the rotation to `angle` radians around `axis`.
    pub fn set_rotation(&mut self, angle: f32, axis: Vec3) -> &mut Self {
        self.rotation_angle = angle;
        self.rotation_axis = axis;
        self.compute_transform();
        self
    }
}
