//! A CPU software rasterizer for flat-colored triangle meshes.
//!
//! Meshes are placed in the world as instances, transformed into camera
//! space, clipped against a fixed five-plane frustum, projected onto a
//! canvas and scan-converted with a per-pixel inverse-depth test. Output goes
//! to any [`OutputSink`](render::OutputSink): an in-memory buffer, numbered
//! PNG files, or an SDL2 window.
//!
//! # Quick Start
//!
//! ```no_run
//! use rastrum::prelude::*;
//!
//! let cube = Mesh::cube();
//! let instance = ModelInstance::with_placement(&cube, Vec3::new(0.0, 0.0, 5.0), 1.0, 0.5, Vec3::Y);
//! let mut renderer = Renderer::new(FrameBuffer::new(600, 600));
//!
//! renderer.clear();
//! renderer.draw_instance(&instance, &Camera::default());
//! renderer.present()?;
//! # Ok::<(), rastrum::PresentError>(())
//! ```

pub mod camera;
pub mod clipper;
pub mod colors;
pub mod config;
pub mod error;
pub mod instance;
pub mod loader;
pub mod logging;
pub mod math;
pub mod mesh;
pub mod projection;
pub mod render;
pub mod scene;
pub mod window;

// Re-export commonly needed types at crate root for convenience
pub use camera::Camera;
pub use colors::Color;
pub use error::PresentError;
pub use instance::ModelInstance;
pub use loader::LoadError;
pub use mesh::{Mesh, Triangle};
pub use projection::Projection;
pub use render::{RenderMode, Renderer};

/// Prelude module for convenient imports.
///
/// # Example
/// ```
/// use rastrum::prelude::*;
/// ```
pub mod prelude {
    // Scene
    pub use crate::camera::Camera;
    pub use crate::colors::Color;
    pub use crate::instance::ModelInstance;
    pub use crate::mesh::{IndexOutOfRange, Mesh, Sphere, Triangle};

    // Loading
    pub use crate::loader::{load_mesh, LoadError};

    // Clipping & projection
    pub use crate::clipper::ViewFrustum;
    pub use crate::projection::Projection;

    // Math
    pub use crate::math::{Mat4, Plane, Vec2, Vec2i, Vec3, Vec4};

    // Rendering
    pub use crate::error::PresentError;
    pub use crate::render::{
        DepthBuffer, FrameBuffer, FrameStats, ImageSink, OutputSink, RenderMode, Renderer,
    };

    // Window
    pub use crate::window::{FrameLimiter, Window};
}

/// Module exposing internals for benchmarking. Not part of the stable API.
pub mod bench {
    pub use crate::clipper::ViewFrustum;
    pub use crate::render::{DepthBuffer, FrameBuffer, ScanlineRasterizer, ScreenTriangle};
}
