//! Scene camera.
//!
//! # Coordinate System
//!
//! Camera space is **left-handed**:
//! - X: positive right
//! - Y: positive up
//! - Z: positive forward (into the screen)
//!
//! # Orientation
//!
//! Orientation is stored as yaw/pitch/roll angles and converted to a rotation
//! matrix when needed. The world-to-camera transform is the transposed
//! orientation applied after moving the camera position to the origin.
//!
//! - **Yaw**: Rotation around Y-axis (horizontal look, positive = look right)
//! - **Pitch**: Rotation around X-axis (vertical look)
//! - **Roll**: Rotation around Z-axis (tilt, positive = tilt right)

use crate::math::{Mat4, Vec3, Vec4};

/// Pitch stays strictly inside +-90 degrees so forward never lines up with Y.
const PITCH_LIMIT: f32 = 89.0 * std::f32::consts::PI / 180.0;

/// Camera with a position and yaw/pitch/roll orientation.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: Vec3,
    yaw: f32,   // Rotation around Y-axis (radians)
    pitch: f32, // Rotation around X-axis (radians)
    roll: f32,  // Rotation around Z-axis (radians)
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

impl Camera {
    /// Creates a camera at the given position, looking along +Z.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
            roll: 0.0,
        }
    }

    /// Creates a camera from angles in radians. Pitch is clamped to the limits.
    pub fn with_angles(position: Vec3, yaw: f32, pitch: f32, roll: f32) -> Self {
        let mut camera = Self::new(position);
        camera.rotate_yaw(yaw);
        camera.rotate_pitch(pitch);
        camera.rotate_roll(roll);
        camera
    }

    // =========================================================================
    // Transforms
    // =========================================================================

    /// Camera-to-world rotation.
    ///
    /// Order: Yaw (Y) * Pitch (X) * Roll (Z), so roll is applied first.
    /// Yaw and roll are negated so that positive values turn right.
    pub fn orientation(&self) -> Mat4 {
        Mat4::rotation_y(-self.yaw) * Mat4::rotation_x(self.pitch) * Mat4::rotation_z(-self.roll)
    }

    /// World-to-camera transform.
    pub fn transform(&self) -> Mat4 {
        Mat4::camera(self.position, &self.orientation())
    }

    // =========================================================================
    // Orientation
    // =========================================================================

    /// Rotates the camera horizontally (around Y-axis).
    pub fn rotate_yaw(&mut self, delta: f32) {
        self.yaw = (self.yaw + delta).rem_euclid(std::f32::consts::TAU);
    }

    /// Rotates the camera vertically (around X-axis), clamped to the pitch limits.
    pub fn rotate_pitch(&mut self, delta: f32) {
        self.pitch = (self.pitch + delta).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Rolls the camera around its forward axis. Kept in (-PI, PI].
    pub fn rotate_roll(&mut self, delta: f32) {
        self.roll = (self.roll + delta).rem_euclid(std::f32::consts::TAU);
        if self.roll > std::f32::consts::PI {
            self.roll -= std::f32::consts::TAU;
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn roll(&self) -> f32 {
        self.roll
    }

    /// The camera's forward direction in world space.
    pub fn forward(&self) -> Vec3 {
        (self.orientation() * Vec4::direction(0.0, 0.0, 1.0)).to_vec3()
    }

    /// The camera's right direction in world space.
    pub fn right(&self) -> Vec3 {
        (self.orientation() * Vec4::direction(1.0, 0.0, 0.0)).to_vec3()
    }
}
