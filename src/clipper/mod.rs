//! Geometry clipping.
//!
//! Clipping happens in camera space, before projection, so every vertex that
//! reaches the projector has `z >= 1` and the perspective divide is safe.

pub mod view_space;

pub use view_space::{clip_triangles_against_plane, ClipStats, ViewFrustum, FRUSTUM_PLANES, NEAR_DISTANCE};
