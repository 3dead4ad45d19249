//! Mesh loading from disk.
//!
//! Two formats are understood:
//!
//! - **A3DB**: a whitespace separated text format made of `vertex x y z` and
//!   `triangle i j k r g b` records. Keywords are case-insensitive, indices
//!   are zero-based, color channels are 0-255. Any other token is skipped.
//! - **Wavefront OBJ** (via `tobj`): every object in the file is merged into a
//!   single mesh painted with one color.
//!
//! Loading either succeeds with a complete [`Mesh`] or fails with a
//! [`LoadError`]; a partially populated mesh is never returned.

use std::fmt;
use std::io;
use std::path::Path;
use std::str::FromStr;

use crate::colors::Color;
use crate::math::vec3::Vec3;
use crate::mesh::{IndexOutOfRange, Mesh, Triangle};

/// Error type for mesh loading.
#[derive(Debug)]
pub enum LoadError {
    /// The file could not be read.
    Io(io::Error),
    /// A record was malformed.
    Parse { line: usize, message: String },
    /// A triangle refers to a vertex that does not exist.
    IndexOutOfRange {
        triangle: usize,
        index: usize,
        vertex_count: usize,
    },
    /// The OBJ reader rejected the file.
    Obj(tobj::LoadError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(err) => write!(f, "mesh IO error: {}", err),
            LoadError::Parse { line, message } => {
                write!(f, "mesh parse error on line {}: {}", line, message)
            }
            LoadError::IndexOutOfRange {
                triangle,
                index,
                vertex_count,
            } => write!(
                f,
                "triangle {} references vertex {} but the mesh has {} vertices",
                triangle, index, vertex_count
            ),
            LoadError::Obj(err) => write!(f, "OBJ load error: {}", err),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(err) => Some(err),
            LoadError::Obj(err) => Some(err),
            LoadError::Parse { .. } | LoadError::IndexOutOfRange { .. } => None,
        }
    }
}

impl From<IndexOutOfRange> for LoadError {
    fn from(err: IndexOutOfRange) -> Self {
        LoadError::IndexOutOfRange {
            triangle: err.triangle,
            index: err.index,
            vertex_count: err.vertex_count,
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(err: io::Error) -> Self {
        LoadError::Io(err)
    }
}

impl From<tobj::LoadError> for LoadError {
    fn from(err: tobj::LoadError) -> Self {
        LoadError::Obj(err)
    }
}

/// Loads a mesh, picking the format from the file extension.
///
/// `.obj` files go through the OBJ reader and are painted with `color`;
/// anything else is read as A3DB, which carries its own colors.
pub fn load_mesh<P: AsRef<Path>>(path: P, color: Color) -> Result<Mesh, LoadError> {
    let path = path.as_ref();
    let is_obj = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("obj"));

    if is_obj {
        load_obj(path, color)
    } else {
        load_a3db(path)
    }
}

/// Reads an A3DB file.
pub fn load_a3db<P: AsRef<Path>>(path: P) -> Result<Mesh, LoadError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let mesh = parse_a3db(&text)?;
    log::info!(
        "loaded {} vertices and {} triangles from {}",
        mesh.vertices().len(),
        mesh.triangles().len(),
        path.display()
    );
    Ok(mesh)
}

/// Parses A3DB text into a mesh.
pub fn parse_a3db(text: &str) -> Result<Mesh, LoadError> {
    let mut tokens = text
        .lines()
        .enumerate()
        .flat_map(|(n, line)| line.split_whitespace().map(move |token| (n + 1, token)));

    let mut vertices = Vec::new();
    let mut triangles = Vec::new();

    while let Some((line, keyword)) = tokens.next() {
        if keyword.eq_ignore_ascii_case("vertex") {
            let x = next_value(&mut tokens, line, "vertex x")?;
            let y = next_value(&mut tokens, line, "vertex y")?;
            let z = next_value(&mut tokens, line, "vertex z")?;
            vertices.push(Vec3::new(x, y, z));
        } else if keyword.eq_ignore_ascii_case("triangle") {
            let a = next_value(&mut tokens, line, "triangle index")?;
            let b = next_value(&mut tokens, line, "triangle index")?;
            let c = next_value(&mut tokens, line, "triangle index")?;
            let r = next_value(&mut tokens, line, "red channel")?;
            let g = next_value(&mut tokens, line, "green channel")?;
            let bl = next_value(&mut tokens, line, "blue channel")?;
            triangles.push(Triangle::new(a, b, c, Color::new(r, g, bl)));
        } else {
            log::trace!("skipping unknown token `{}` on line {}", keyword, line);
        }
    }

    Mesh::try_new(vertices, triangles).map_err(LoadError::from)
}

fn next_value<'a, T, I>(tokens: &mut I, line: usize, what: &str) -> Result<T, LoadError>
where
    T: FromStr,
    I: Iterator<Item = (usize, &'a str)>,
{
    let (line, token) = tokens.next().ok_or_else(|| LoadError::Parse {
        line,
        message: format!("missing {}", what),
    })?;
    token.parse().map_err(|_| LoadError::Parse {
        line,
        message: format!("invalid {} `{}`", what, token),
    })
}

/// Reads an OBJ file, merging all of its objects into one mesh.
pub fn load_obj<P: AsRef<Path>>(path: P, color: Color) -> Result<Mesh, LoadError> {
    let path = path.as_ref();
    let options = tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    };
    let (models, _materials) = tobj::load_obj(path, &options)?;

    let mut vertices = Vec::new();
    let mut triangles = Vec::new();
    for model in &models {
        let base = vertices.len();
        vertices.extend(
            model
                .mesh
                .positions
                .chunks_exact(3)
                .map(|p| Vec3::new(p[0], p[1], p[2])),
        );
        triangles.extend(model.mesh.indices.chunks_exact(3).map(|i| {
            Triangle::new(
                base + i[0] as usize,
                base + i[1] as usize,
                base + i[2] as usize,
                color,
            )
        }));
    }

    let mesh = Mesh::try_new(vertices, triangles)?;
    log::info!(
        "loaded {} objects ({} vertices, {} triangles) from {}",
        models.len(),
        mesh.vertices().len(),
        mesh.triangles().len(),
        path.display()
    );
    Ok(mesh)
}
