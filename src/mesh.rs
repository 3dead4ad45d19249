//! Immutable triangle meshes.
//!
//! A [`Mesh`] owns its vertex and triangle buffers. Placement in the world is
//! not part of the mesh; see [`crate::instance::ModelInstance`].

use crate::colors::Color;
use crate::math::vec3::Vec3;

/// A triangle: three indices into the owning mesh's vertex list plus a flat color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Triangle {
    pub indices: [usize; 3],
    pub color: Color,
}

impl Triangle {
    pub const fn new(a: usize, b: usize, c: usize, color: Color) -> Self {
        Self {
            indices: [a, b, c],
            color,
        }
    }
}

/// A sphere enclosing every vertex of a mesh.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    pub const fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Vertex list, indexed colored triangles and a bounding sphere.
///
/// Immutable after construction: the bounding sphere is computed once in
/// [`Mesh::new`] and always describes the stored vertices.
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vec3>,
    triangles: Vec<Triangle>,
    bounding_sphere: Sphere,
}

// OWNERSHIP: static data compiled into the binary; copied into an owned Mesh by `Mesh::cube`.
pub const CUBE_VERTICES: [Vec3; 8] = [
    Vec3::new(1.0, 1.0, 1.0),
    Vec3::new(-1.0, 1.0, 1.0),
    Vec3::new(-1.0, -1.0, 1.0),
    Vec3::new(1.0, -1.0, 1.0),
    Vec3::new(1.0, 1.0, -1.0),
    Vec3::new(-1.0, 1.0, -1.0),
    Vec3::new(-1.0, -1.0, -1.0),
    Vec3::new(1.0, -1.0, -1.0),
];

pub const CUBE_TRIANGLES: [Triangle; 12] = [
    // Back face (+Z)
    Triangle::new(0, 1, 2, Color::RED),
    Triangle::new(0, 2, 3, Color::RED),
    // Right face (+X)
    Triangle::new(4, 0, 3, Color::GREEN),
    Triangle::new(4, 3, 7, Color::GREEN),
    // Front face (-Z)
    Triangle::new(5, 4, 7, Color::BLUE),
    Triangle::new(5, 7, 6, Color::BLUE),
    // Left face (-X)
    Triangle::new(1, 5, 6, Color::YELLOW),
    Triangle::new(1, 6, 2, Color::YELLOW),
    // Top face (+Y)
    Triangle::new(4, 5, 1, Color::PURPLE),
    Triangle::new(4, 1, 0, Color::PURPLE),
    // Bottom face (-Y)
    Triangle::new(2, 6, 7, Color::CYAN),
    Triangle::new(2, 7, 3, Color::CYAN),
];

impl Mesh {
    /// Builds a mesh and computes its bounding sphere.
    ///
    /// # Panics
    ///
    /// Every triangle index must be a valid position in `vertices`. This is
    /// only checked in debug builds; in release a bad index panics later,
    /// when the mesh is clipped. Use [`Mesh::try_new`] for indices that come
    /// from outside the program.
    pub fn new(vertices: Vec<Vec3>, triangles: Vec<Triangle>) -> Self {
        debug_assert!(
            first_bad_index(&vertices, &triangles).is_none(),
            "triangle index out of range for {} vertices",
            vertices.len()
        );
        let bounding_sphere = compute_bounding_sphere(&vertices);
        Self {
            vertices,
            triangles,
            bounding_sphere,
        }
    }

    /// Builds a mesh after checking every triangle index against the vertex
    /// list.
    pub fn try_new(vertices: Vec<Vec3>, triangles: Vec<Triangle>) -> Result<Self, IndexOutOfRange> {
        match first_bad_index(&vertices, &triangles) {
            Some(err) => Err(err),
            None => Ok(Self::new(vertices, triangles)),
        }
    }

    /// The 2x2x2 cube centered on the origin, one color per face.
    pub fn cube() -> Self {
        Self::new(CUBE_VERTICES.to_vec(), CUBE_TRIANGLES.to_vec())
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn bounding_sphere(&self) -> Sphere {
        self.bounding_sphere
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}

/// A triangle refers to a vertex the mesh does not have.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexOutOfRange {
    /// Position of the offending triangle in the triangle list.
    pub triangle: usize,
    pub index: usize,
    pub vertex_count: usize,
}

impl std::fmt::Display for IndexOutOfRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "triangle {} references vertex {} but the mesh has {} vertices",
            self.triangle, self.index, self.vertex_count
        )
    }
}

impl std::error::Error for IndexOutOfRange {}

fn first_bad_index(vertices: &[Vec3], triangles: &[Triangle]) -> Option<IndexOutOfRange> {
    triangles.iter().enumerate().find_map(|(triangle, t)| {
        t.indices
            .iter()
            .find(|&&i| i >= vertices.len())
            .map(|&index| IndexOutOfRange {
                triangle,
                index,
                vertex_count: vertices.len(),
            })
    })
}

/// Sphere around the axis-aligned bounding box: centered on the box midpoint,
/// reaching the farthest of its eight corners.
fn compute_bounding_sphere(vertices: &[Vec3]) -> Sphere {
    let Some((&first, rest)) = vertices.split_first() else {
        return Sphere::new(Vec3::ZERO, 0.0);
    };

    let (mins, maxs) = rest
        .iter()
        .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let center = (mins + maxs) * 0.5;

    let corners = [
        mins,
        maxs,
        Vec3::new(mins.x, mins.y, maxs.z),
        Vec3::new(mins.x, maxs.y, maxs.z),
        Vec3::new(mins.x, maxs.y, mins.z),
        Vec3::new(maxs.x, mins.y, mins.z),
        Vec3::new(maxs.x, mins.y, maxs.z),
        Vec3::new(maxs.x, maxs.y, mins.z),
    ];
    let radius_squared = corners
        .iter()
        .map(|&corner| corner.distance_squared(center))
        .fold(0.0f32, f32::max);

    Sphere::new(center, radius_squared.sqrt())
}
