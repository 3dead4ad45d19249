//! View-space frustum clipping.
//!
//! Geometry is clipped in camera space, before projection, against five
//! planes: near, left, right, top and bottom. There is no far plane.
//!
//! Clipping works on indexed triangles. A triangle that crosses a plane is
//! replaced by one or two triangles bounded by that plane; the intersection
//! points are appended to the vertex list so every index stays valid.

use std::f32::consts::FRAC_1_SQRT_2;

use crate::instance::ModelInstance;
use crate::math::{Mat4, Plane, Vec3};
use crate::mesh::{Mesh, Triangle};

/// Distance of the near plane from the camera.
pub const NEAR_DISTANCE: f32 = 1.0;

/// The five clipping planes, in the order they are applied.
///
/// The side planes bound a 45 degree half-angle cone (90 degree field of view).
pub const FRUSTUM_PLANES: [Plane; 5] = [
    // Near: z > 1
    Plane::new(Vec3::new(0.0, 0.0, 1.0), -NEAR_DISTANCE),
    // Left: x > -z
    Plane::new(Vec3::new(FRAC_1_SQRT_2, 0.0, FRAC_1_SQRT_2), 0.0),
    // Right: x < z
    Plane::new(Vec3::new(-FRAC_1_SQRT_2, 0.0, FRAC_1_SQRT_2), 0.0),
    // Top: y < z
    Plane::new(Vec3::new(0.0, -FRAC_1_SQRT_2, FRAC_1_SQRT_2), 0.0),
    // Bottom: y > -z
    Plane::new(Vec3::new(0.0, FRAC_1_SQRT_2, FRAC_1_SQRT_2), 0.0),
];

/// Counters describing what the clipper did during a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClipStats {
    /// Instances that reached the per-triangle clipping stage.
    pub instances_clipped: usize,
    /// Instances rejected by the bounding-sphere test.
    pub instances_culled: usize,
    /// Triangles handed to the clipper.
    pub triangles_in: usize,
    /// Triangles that survived clipping (including split pieces).
    pub triangles_out: usize,
    /// Intersection vertices created by clipping.
    pub vertices_added: usize,
}

/// The view frustum as a fixed set of clipping planes.
#[derive(Clone, Debug)]
pub struct ViewFrustum {
    planes: [Plane; 5],
}

impl Default for ViewFrustum {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewFrustum {
    /// The standard frustum: near plane at `z = 1`, 90 degree field of view.
    pub fn new() -> Self {
        Self {
            planes: FRUSTUM_PLANES,
        }
    }

    /// Same cone with the near plane moved to `z = near`.
    pub fn with_near(near: f32) -> Self {
        let mut planes = FRUSTUM_PLANES;
        planes[0] = Plane::new(Vec3::Z, -near);
        Self { planes }
    }

    pub fn planes(&self) -> &[Plane; 5] {
        &self.planes
    }

    /// Returns true if the sphere lies entirely outside at least one plane.
    ///
    /// Conservative: a sphere that passes may still have every triangle clipped
    /// away, but a rejected sphere is never visible.
    pub fn is_sphere_outside(&self, center: Vec3, radius: f32) -> bool {
        self.planes
            .iter()
            .any(|plane| plane.signed_distance(center) < -radius)
    }

    /// Transforms an instance into camera space and clips it to the frustum.
    ///
    /// `transform` is the full model-to-camera transform (camera transform
    /// composed with the instance transform). Returns `None` if the instance's
    /// bounding sphere is entirely outside the frustum; otherwise a new mesh
    /// with camera-space vertices holding only the visible geometry.
    pub fn clip_instance(&self, instance: &ModelInstance<'_>, transform: &Mat4) -> Option<Mesh> {
        self.clip_instance_with_stats(instance, transform, &mut ClipStats::default())
    }

    /// [`clip_instance`](Self::clip_instance), accumulating counters into `stats`.
    pub fn clip_instance_with_stats(
        &self,
        instance: &ModelInstance<'_>,
        transform: &Mat4,
        stats: &mut ClipStats,
    ) -> Option<Mesh> {
        let mesh = instance.mesh();
        let sphere = mesh.bounding_sphere();
        let center = *transform * sphere.center;
        let radius = sphere.radius * instance.scale().abs();

        if self.is_sphere_outside(center, radius) {
            log::trace!(
                "instance culled: sphere center {:?} radius {} outside frustum",
                center,
                radius
            );
            stats.instances_culled += 1;
            return None;
        }

        let mut vertices: Vec<Vec3> = mesh.vertices().iter().map(|&v| *transform * v).collect();
        let vertex_count_before = vertices.len();

        let mut triangles = mesh.triangles().to_vec();
        for plane in &self.planes {
            if triangles.is_empty() {
                break;
            }
            triangles = clip_triangles_against_plane(plane, &triangles, &mut vertices);
        }

        stats.instances_clipped += 1;
        stats.triangles_in += mesh.triangles().len();
        stats.triangles_out += triangles.len();
        stats.vertices_added += vertices.len() - vertex_count_before;

        Some(Mesh::new(vertices, triangles))
    }
}

/// Clips every triangle against one plane.
///
/// Intersection points are appended to `vertices`; the returned triangles
/// index into the extended list. Output order follows input order.
pub fn clip_triangles_against_plane(
    plane: &Plane,
    triangles: &[Triangle],
    vertices: &mut Vec<Vec3>,
) -> Vec<Triangle> {
    let mut clipped = Vec::with_capacity(triangles.len());
    for triangle in triangles {
        clip_triangle(plane, triangle, vertices, &mut clipped);
    }
    clipped
}

fn clip_triangle(plane: &Plane, triangle: &Triangle, vertices: &mut Vec<Vec3>, out: &mut Vec<Triangle>) {
    let [a, b, c] = triangle.indices;
    let inside = [a, b, c].map(|i| plane.contains(vertices[i]));

    // Indices are rotated, never reflected, so the winding is preserved.
    match inside {
        [true, true, true] => out.push(*triangle),
        [false, false, false] => {}
        [true, false, false] => clip_one_inside(plane, [a, b, c], triangle, vertices, out),
        [false, true, false] => clip_one_inside(plane, [b, c, a], triangle, vertices, out),
        [false, false, true] => clip_one_inside(plane, [c, a, b], triangle, vertices, out),
        [true, true, false] => clip_two_inside(plane, [a, b, c], triangle, vertices, out),
        [false, true, true] => clip_two_inside(plane, [b, c, a], triangle, vertices, out),
        [true, false, true] => clip_two_inside(plane, [c, a, b], triangle, vertices, out),
    }
}

/// `a` is inside; `b` and `c` are outside. The triangle shrinks to one.
fn clip_one_inside(
    plane: &Plane,
    [a, b, c]: [usize; 3],
    triangle: &Triangle,
    vertices: &mut Vec<Vec3>,
    out: &mut Vec<Triangle>,
) {
    let b_prime = push_intersection(plane, vertices, a, b);
    let c_prime = push_intersection(plane, vertices, a, c);
    out.push(Triangle::new(a, b_prime, c_prime, triangle.color));
}

/// `a` and `b` are inside; `c` is outside. The remaining quad becomes two triangles.
fn clip_two_inside(
    plane: &Plane,
    [a, b, c]: [usize; 3],
    triangle: &Triangle,
    vertices: &mut Vec<Vec3>,
    out: &mut Vec<Triangle>,
) {
    let a_prime = push_intersection(plane, vertices, a, c);
    let b_prime = push_intersection(plane, vertices, b, c);
    out.push(Triangle::new(a, b, a_prime, triangle.color));
    out.push(Triangle::new(a_prime, b, b_prime, triangle.color));
}

fn push_intersection(plane: &Plane, vertices: &mut Vec<Vec3>, inside: usize, outside: usize) -> usize {
    let point = plane.intersect_segment(vertices[inside], vertices[outside]);
    vertices.push(point);
    vertices.len() - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::Color;
    use approx::assert_relative_eq;

    const COLOR: Color = Color::GOLD;

    fn single_triangle(points: [Vec3; 3]) -> Mesh {
        Mesh::new(points.to_vec(), vec![Triangle::new(0, 1, 2, COLOR)])
    }

    fn clip(mesh: &Mesh) -> Option<Mesh> {
        let instance = ModelInstance::new(mesh);
        ViewFrustum::new().clip_instance(&instance, &Mat4::identity())
    }

    fn near_plane() -> Plane {
        FRUSTUM_PLANES[0]
    }

    #[test]
    fn planes_are_unit_length() {
        for plane in FRUSTUM_PLANES {
            assert_relative_eq!(plane.normal.magnitude(), 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn cone_boundaries() {
        let frustum = ViewFrustum::new();
        let inside = |p: Vec3| frustum.planes().iter().all(|plane| plane.contains(p));
        assert!(inside(Vec3::new(0.0, 0.0, 2.0)));
        assert!(inside(Vec3::new(1.9, 1.9, 2.0)));
        assert!(!inside(Vec3::new(2.1, 0.0, 2.0)));
        assert!(!inside(Vec3::new(0.0, -2.1, 2.0)));
        assert!(!inside(Vec3::new(0.0, 0.0, 0.5)));
        assert!(!inside(Vec3::new(0.0, 0.0, -5.0)));
    }

    #[test]
    fn triangle_inside_is_unchanged() {
        let mesh = single_triangle([
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::new(1.0, 0.0, 5.0),
            Vec3::new(0.0, 1.0, 5.0),
        ]);
        let clipped = clip(&mesh).expect("visible");
        assert_eq!(clipped.triangles(), mesh.triangles());
        assert_eq!(clipped.vertices(), mesh.vertices());
    }

    #[test]
    fn triangle_outside_one_plane_is_discarded() {
        let mut vertices = vec![
            Vec3::new(0.0, 0.0, 0.5),
            Vec3::new(0.1, 0.0, 0.5),
            Vec3::new(0.0, 0.1, 0.5),
        ];
        let triangles = [Triangle::new(0, 1, 2, COLOR)];
        let clipped = clip_triangles_against_plane(&near_plane(), &triangles, &mut vertices);
        assert!(clipped.is_empty());
        assert_eq!(vertices.len(), 3);
    }

    #[test]
    fn instance_behind_camera_is_rejected_by_sphere() {
        let mesh = single_triangle([
            Vec3::new(0.0, 0.0, -5.0),
            Vec3::new(1.0, 0.0, -5.0),
            Vec3::new(0.0, 1.0, -5.0),
        ]);
        let mut stats = ClipStats::default();
        let instance = ModelInstance::new(&mesh);
        let result = ViewFrustum::new().clip_instance_with_stats(&instance, &Mat4::identity(), &mut stats);
        assert!(result.is_none());
        assert_eq!(stats.instances_culled, 1);
    }

    #[test]
    fn one_vertex_inside_yields_one_triangle() {
        let mesh = single_triangle([
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::new(0.1, 0.0, 0.5),
            Vec3::new(0.0, 0.1, 0.5),
        ]);
        let clipped = clip(&mesh).expect("partially visible");

        assert_eq!(clipped.triangles().len(), 1);
        assert_eq!(clipped.vertices().len(), 5);
        assert_eq!(clipped.triangles()[0], Triangle::new(0, 3, 4, COLOR));

        let new_b = clipped.vertices()[3];
        let new_c = clipped.vertices()[4];
        assert_relative_eq!(new_b.z, 1.0, epsilon = 1e-6);
        assert_relative_eq!(new_b.x, 0.1 * 2.0 / 3.0, epsilon = 1e-6);
        assert_relative_eq!(new_c.z, 1.0, epsilon = 1e-6);
        assert_relative_eq!(new_c.y, 0.1 * 2.0 / 3.0, epsilon = 1e-6);
    }

    #[test]
    fn one_vertex_inside_rotates_to_the_inside_vertex() {
        let mut vertices = vec![
            Vec3::new(0.1, 0.0, 0.5),
            Vec3::new(0.0, 0.1, 0.5),
            Vec3::new(0.0, 0.0, 2.0),
        ];
        let triangles = [Triangle::new(0, 1, 2, COLOR)];
        let clipped = clip_triangles_against_plane(&near_plane(), &triangles, &mut vertices);
        assert_eq!(clipped, vec![Triangle::new(2, 3, 4, COLOR)]);
        assert_eq!(vertices.len(), 5);
    }

    #[test]
    fn two_vertices_inside_yield_two_triangles() {
        let mesh = single_triangle([
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::new(0.1, 0.0, 2.0),
            Vec3::new(0.0, 0.1, 0.5),
        ]);
        let clipped = clip(&mesh).expect("partially visible");

        assert_eq!(clipped.triangles().len(), 2);
        assert_eq!(clipped.vertices().len(), 5);
        assert_eq!(
            clipped.triangles(),
            &[Triangle::new(0, 1, 3, COLOR), Triangle::new(3, 1, 4, COLOR)]
        );
        for v in &clipped.vertices()[3..] {
            assert_relative_eq!(v.z, 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn two_vertices_inside_rotate_the_outside_vertex_last() {
        let mut vertices = vec![
            Vec3::new(0.0, 0.1, 0.5),
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::new(0.1, 0.0, 2.0),
        ];
        let triangles = [Triangle::new(0, 1, 2, COLOR)];
        let clipped = clip_triangles_against_plane(&near_plane(), &triangles, &mut vertices);
        assert_eq!(
            clipped,
            vec![Triangle::new(1, 2, 3, COLOR), Triangle::new(3, 2, 4, COLOR)]
        );
    }

    #[test]
    fn vertex_on_plane_counts_as_outside() {
        let mut vertices = vec![
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.1, 0.0, 1.0),
            Vec3::new(0.0, 0.1, 1.0),
        ];
        let triangles = [Triangle::new(0, 1, 2, COLOR)];
        let clipped = clip_triangles_against_plane(&near_plane(), &triangles, &mut vertices);
        assert!(clipped.is_empty());
    }

    #[test]
    fn stats_count_clipping_work() {
        let mesh = single_triangle([
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::new(0.1, 0.0, 2.0),
            Vec3::new(0.0, 0.1, 0.5),
        ]);
        let instance = ModelInstance::new(&mesh);
        let mut stats = ClipStats::default();
        ViewFrustum::new().clip_instance_with_stats(&instance, &Mat4::identity(), &mut stats);
        assert_eq!(
            stats,
            ClipStats {
                instances_clipped: 1,
                instances_culled: 0,
                triangles_in: 1,
                triangles_out: 2,
                vertices_added: 2,
            }
        );
    }

    #[test]
    fn cube_straddling_the_near_plane_keeps_indices_valid() {
        let cube = Mesh::cube();
        let instance = ModelInstance::with_placement(&cube, Vec3::new(0.0, 0.0, 1.5), 1.0, 0.3, Vec3::Y);
        let clipped = ViewFrustum::new()
            .clip_instance(&instance, instance.transform())
            .expect("cube is partially visible");
        assert!(!clipped.triangles().is_empty());
        for t in clipped.triangles() {
            for &i in &t.indices {
                assert!(i < clipped.vertices().len());
                assert!(clipped.vertices()[i].z >= 1.0 - 1e-5);
            }
        }
    }

    #[test]
    fn with_near_moves_only_the_near_plane() {
        let frustum = ViewFrustum::with_near(3.0);
        assert!(!frustum.planes()[0].contains(Vec3::new(0.0, 0.0, 2.5)));
        assert!(frustum.planes()[0].contains(Vec3::new(0.0, 0.0, 3.5)));
        assert_eq!(&frustum.planes()[1..], &FRUSTUM_PLANES[1..]);
    }
}
