//! Oriented planes used as clipping half-spaces.

use super::vec3::Vec3;

/// A plane `dot(normal, p) + distance = 0`.
///
/// The normal is unit length and points into the half-space that counts as
/// inside: a point is inside when its signed distance is strictly positive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub distance: f32,
}

impl Plane {
    pub const fn new(normal: Vec3, distance: f32) -> Self {
        Self { normal, distance }
    }

    /// Returns the signed distance from a point to this plane.
    /// Positive = inside (same side as normal), Negative = outside.
    #[inline]
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }

    /// Returns true if `point` lies strictly on the inside of the plane.
    #[inline]
    pub fn contains(&self, point: Vec3) -> bool {
        self.signed_distance(point) > 0.0
    }

    /// Intersects the segment `from -> to` with this plane.
    ///
    /// The segment must cross the plane. A segment parallel to the plane makes
    /// the parameter divide by zero and the result is non-finite.
    pub fn intersect_segment(&self, from: Vec3, to: Vec3) -> Vec3 {
        let direction = to - from;
        let t = (-self.distance - self.normal.dot(from)) / self.normal.dot(direction);
        from + direction * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn signed_distance_sign_follows_normal() {
        let plane = Plane::new(Vec3::Z, -1.0);
        assert_relative_eq!(plane.signed_distance(Vec3::new(0.0, 0.0, 3.0)), 2.0);
        assert_relative_eq!(plane.signed_distance(Vec3::new(5.0, 5.0, 0.0)), -1.0);
        assert!(plane.contains(Vec3::new(0.0, 0.0, 1.5)));
    }

    #[test]
    fn point_on_plane_is_outside() {
        let plane = Plane::new(Vec3::Z, -1.0);
        assert!(!plane.contains(Vec3::new(3.0, -2.0, 1.0)));
    }

    #[test]
    fn segment_intersection_lies_on_plane() {
        let plane = Plane::new(Vec3::new(1.0, 0.0, 1.0).normalize(), 0.0);
        let hit = plane.intersect_segment(Vec3::new(0.0, 0.0, 2.0), Vec3::new(-4.0, 0.0, 2.0));
        assert_relative_eq!(plane.signed_distance(hit), 0.0, epsilon = 1e-6);
        assert_relative_eq!(hit.x, -2.0, epsilon = 1e-6);
        assert_relative_eq!(hit.z, 2.0, epsilon = 1e-6);
    }
}
