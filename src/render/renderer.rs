//! The render context.
//!
//! [`Renderer`] owns everything a frame mutates: the output sink, the depth
//! buffer and the frame counters. Drawing calls borrow it mutably, so only one
//! frame can be in flight and nothing is shared behind the caller's back.
//!
//! Frame lifecycle: [`clear`](Renderer::clear), any number of draw calls,
//! then [`present`](Renderer::present).

use super::framebuffer::DepthBuffer;
use super::rasterizer::{self, ScanlineRasterizer, ScreenTriangle};
use super::sink::OutputSink;
use crate::camera::Camera;
use crate::clipper::{ClipStats, ViewFrustum};
use crate::colors::Color;
use crate::error::PresentError;
use crate::instance::ModelInstance;
use crate::math::{Mat4, Vec2i, Vec3};
use crate::mesh::Mesh;
use crate::projection::Projection;

/// How clipped instance triangles are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Depth-tested flat fill.
    #[default]
    Filled,
    /// Triangle outlines, no depth test.
    Wireframe,
}

impl std::fmt::Display for RenderMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderMode::Filled => write!(f, "Filled"),
            RenderMode::Wireframe => write!(f, "Wireframe"),
        }
    }
}

/// Counters for the frame in progress. Reset by [`Renderer::clear`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub clip: ClipStats,
    pub triangles_drawn: usize,
    pub pixels_written: usize,
}

pub struct Renderer<S: OutputSink> {
    sink: S,
    depth_buffer: DepthBuffer,
    projection: Projection,
    frustum: ViewFrustum,
    rasterizer: ScanlineRasterizer,
    render_mode: RenderMode,
    stats: FrameStats,
}

impl<S: OutputSink> Renderer<S> {
    /// Creates a render context sized to `sink`, with the default projection
    /// and frustum.
    pub fn new(sink: S) -> Self {
        let (width, height) = (sink.width(), sink.height());
        Self {
            sink,
            depth_buffer: DepthBuffer::new(width, height),
            projection: Projection::new(width, height),
            frustum: ViewFrustum::new(),
            rasterizer: ScanlineRasterizer::new(),
            render_mode: RenderMode::default(),
            stats: FrameStats::default(),
        }
    }

    /// Replaces the projection. Its canvas size should match the sink.
    pub fn with_projection(mut self, projection: Projection) -> Self {
        debug_assert_eq!(
            (projection.width(), projection.height()),
            (self.sink.width(), self.sink.height()),
            "projection canvas does not match the sink"
        );
        self.projection = projection;
        self
    }

    pub fn with_frustum(mut self, frustum: ViewFrustum) -> Self {
        self.frustum = frustum;
        self
    }

    // =========================================================================
    // Frame lifecycle
    // =========================================================================

    /// Starts a frame: clears the sink and the depth buffer, resets stats.
    pub fn clear(&mut self) {
        self.sink.clear();
        self.depth_buffer.clear();
        self.stats = FrameStats::default();
    }

    /// Finishes the frame and hands it to the sink.
    pub fn present(&mut self) -> Result<(), PresentError> {
        log::debug!(
            "frame: {} triangles, {} pixels, {} instances culled, {} clip vertices",
            self.stats.triangles_drawn,
            self.stats.pixels_written,
            self.stats.clip.instances_culled,
            self.stats.clip.vertices_added
        );
        self.sink.present()
    }

    pub fn poll_quit(&mut self) -> bool {
        self.sink.poll_quit()
    }

    // =========================================================================
    // 2D primitives (canvas coordinates)
    // =========================================================================

    pub fn draw_line_2d(&mut self, p0: Vec2i, p1: Vec2i, color: Color) {
        self.stats.pixels_written += rasterizer::draw_line(&mut self.sink, p0, p1, color);
    }

    /// Flat-filled triangle without depth testing.
    pub fn draw_triangle_2d(&mut self, p0: Vec2i, p1: Vec2i, p2: Vec2i, color: Color) {
        self.stats.pixels_written += self
            .rasterizer
            .fill_triangle_flat([p0, p1, p2], color, &mut self.sink);
        self.stats.triangles_drawn += 1;
    }

    pub fn draw_triangle_outline_2d(&mut self, p0: Vec2i, p1: Vec2i, p2: Vec2i, color: Color) {
        self.stats.pixels_written +=
            rasterizer::draw_triangle_outline(&mut self.sink, [p0, p1, p2], color);
        self.stats.triangles_drawn += 1;
    }

    // =========================================================================
    // 3D primitives (camera space, unclipped)
    // =========================================================================

    /// Projects and draws a camera-space line. Both points must have `z > 0`.
    pub fn draw_line_3d(&mut self, v0: Vec3, v1: Vec3, color: Color) {
        let p0 = self.projection.project(v0);
        let p1 = self.projection.project(v1);
        self.draw_line_2d(p0, p1, color);
    }

    /// Projects and outlines a camera-space triangle. All points must have `z > 0`.
    pub fn draw_triangle_3d(&mut self, v0: Vec3, v1: Vec3, v2: Vec3, color: Color) {
        let p0 = self.projection.project(v0);
        let p1 = self.projection.project(v1);
        let p2 = self.projection.project(v2);
        self.draw_triangle_outline_2d(p0, p1, p2, color);
    }

    /// Draws a mesh as a wireframe after applying `transform`, with no
    /// clipping. Every transformed vertex must lie in front of the camera.
    pub fn draw_simple_model(&mut self, mesh: &Mesh, transform: &Mat4) {
        let vertices: Vec<Vec3> = mesh.vertices().iter().map(|&v| *transform * v).collect();
        for triangle in mesh.triangles() {
            let [a, b, c] = triangle.indices;
            self.draw_triangle_3d(vertices[a], vertices[b], vertices[c], triangle.color);
        }
    }

    // =========================================================================
    // Instances (clipped)
    // =========================================================================

    /// Clips and rasterizes one instance as seen from `camera`.
    ///
    /// Returns false if the instance was culled by its bounding sphere.
    pub fn draw_instance(&mut self, instance: &ModelInstance<'_>, camera: &Camera) -> bool {
        self.draw_instance_with(instance, &camera.transform())
    }

    /// Draws every instance from `camera`. Returns how many were not culled.
    pub fn draw_instances<'i, 'm: 'i, I>(&mut self, instances: I, camera: &Camera) -> usize
    where
        I: IntoIterator<Item = &'i ModelInstance<'m>>,
    {
        let camera_transform = camera.transform();
        instances
            .into_iter()
            .filter(|instance| self.draw_instance_with(instance, &camera_transform))
            .count()
    }

    fn draw_instance_with(&mut self, instance: &ModelInstance<'_>, camera_transform: &Mat4) -> bool {
        let transform = *camera_transform * *instance.transform();
        let Some(clipped) =
            self.frustum
                .clip_instance_with_stats(instance, &transform, &mut self.stats.clip)
        else {
            return false;
        };

        let vertices = clipped.vertices();
        for triangle in clipped.triangles() {
            let corners = triangle.indices.map(|i| vertices[i]);
            let points = corners.map(|v| self.projection.project(v));

            match self.render_mode {
                RenderMode::Filled => {
                    let screen = ScreenTriangle::new(points, corners.map(|v| 1.0 / v.z), triangle.color);
                    self.stats.pixels_written +=
                        self.rasterizer
                            .fill_triangle(&screen, &mut self.depth_buffer, &mut self.sink);
                    self.stats.triangles_drawn += 1;
                }
                RenderMode::Wireframe => {
                    let [p0, p1, p2] = points;
                    self.draw_triangle_outline_2d(p0, p1, p2, triangle.color);
                }
            }
        }
        true
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn width(&self) -> u32 {
        self.sink.width()
    }

    pub fn height(&self) -> u32 {
        self.sink.height()
    }

    pub fn depth_buffer(&self) -> &DepthBuffer {
        &self.depth_buffer
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn frustum(&self) -> &ViewFrustum {
        &self.frustum
    }

    pub fn render_mode(&self) -> RenderMode {
        self.render_mode
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.render_mode = mode;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::framebuffer::FrameBuffer;

    fn renderer() -> Renderer<FrameBuffer> {
        Renderer::new(FrameBuffer::with_background(100, 100, Color::BLACK))
    }

    #[test]
    fn clear_resets_depth_and_stats() {
        let mut r = renderer();
        r.draw_triangle_2d(Vec2i::new(0, 0), Vec2i::new(10, 0), Vec2i::new(0, 10), Color::RED);
        assert!(r.stats().pixels_written > 0);

        let cube = Mesh::cube();
        let instance = ModelInstance::with_placement(&cube, Vec3::new(0.0, 0.0, 5.0), 1.0, 0.0, Vec3::Y);
        r.draw_instance(&instance, &Camera::default());
        assert!(r.depth_buffer().covered_pixels() > 0);

        r.clear();
        assert_eq!(*r.stats(), FrameStats::default());
        assert_eq!(r.depth_buffer().covered_pixels(), 0);
        assert_eq!(r.sink().get_pixel(0, 0), Some(Color::BLACK));
    }

    #[test]
    fn culled_instance_draws_nothing() {
        let mut r = renderer();
        let cube = Mesh::cube();
        let behind = ModelInstance::with_placement(&cube, Vec3::new(0.0, 0.0, -10.0), 1.0, 0.0, Vec3::Y);
        assert!(!r.draw_instance(&behind, &Camera::default()));
        assert_eq!(r.stats().clip.instances_culled, 1);
        assert_eq!(r.stats().pixels_written, 0);
    }

    #[test]
    fn nearer_instance_hides_farther_one() {
        let mut r = renderer();
        let cube = Mesh::cube();
        let mut near = ModelInstance::new(&cube);
        near.set_translation(Vec3::new(0.0, 0.0, 6.0));
        let far = ModelInstance::with_placement(&cube, Vec3::new(0.0, 0.0, 12.0), 3.0, 0.0, Vec3::Y);

        // Near cube's front face is blue; the far cube is bigger but behind it.
        let drawn = r.draw_instances([&far, &near], &Camera::default());
        assert_eq!(drawn, 2);
        assert_eq!(r.sink().get_pixel(0, 0), Some(Color::BLUE));
        assert_eq!(r.depth_buffer().get(0, 0), Some(1.0 / 5.0));
    }

    #[test]
    fn camera_transform_is_applied() {
        let mut r = renderer();
        let cube = Mesh::cube();
        let instance = ModelInstance::new(&cube);
        let camera = Camera::new(Vec3::new(0.0, 0.0, -5.0));
        assert!(r.draw_instance(&instance, &camera));
        assert_eq!(r.sink().get_pixel(0, 0), Some(Color::BLUE));
    }

    #[test]
    fn wireframe_mode_skips_depth() {
        let mut r = renderer();
        r.set_render_mode(RenderMode::Wireframe);
        let cube = Mesh::cube();
        let instance = ModelInstance::with_placement(&cube, Vec3::new(0.0, 0.0, 5.0), 1.0, 0.0, Vec3::Y);
        r.draw_instance(&instance, &Camera::default());
        assert_eq!(r.depth_buffer().covered_pixels(), 0);
        assert!(r.stats().pixels_written > 0);
        // Interior of the front face stays empty.
        assert_eq!(r.sink().get_pixel(2, 3), Some(Color::BLACK));
    }

    #[test]
    fn draw_line_3d_projects_endpoints() {
        let mut r = renderer();
        r.draw_line_3d(Vec3::new(-0.2, 0.1, 1.0), Vec3::new(0.2, 0.1, 1.0), Color::WHITE);
        // Projects to (-20, 10) -> (20, 10).
        assert_eq!(r.sink().get_pixel(-20, 10), Some(Color::WHITE));
        assert_eq!(r.sink().get_pixel(19, 10), Some(Color::WHITE));
        assert_eq!(r.stats().pixels_written, 40);
    }

    #[test]
    fn simple_model_draws_outlines() {
        let mut r = renderer();
        let cube = Mesh::cube();
        r.draw_simple_model(&cube, &Mat4::translation(Vec3::new(0.0, 0.0, 8.0)));
        assert_eq!(r.stats().triangles_drawn, 12);
        assert_eq!(r.depth_buffer().covered_pixels(), 0);
    }

    #[test]
    fn extreme_2d_coordinates_are_clipped_to_the_canvas() {
        let mut r = renderer();
        r.draw_line_2d(
            Vec2i::new(-2_000_000_000, 0),
            Vec2i::new(2_000_000_000, 1),
            Color::WHITE,
        );
        assert_eq!(r.stats().pixels_written, 100);
        assert_eq!(r.sink().get_pixel(-50, 0), Some(Color::WHITE));

        r.clear();
        r.draw_triangle_2d(
            Vec2i::new(-1_000_000, -1_000_000),
            Vec2i::new(1_000_000, -1_000_000),
            Vec2i::new(0, 1_000_000),
            Color::RED,
        );
        // Every canvas pixel lies inside the triangle.
        assert_eq!(r.stats().pixels_written, 100 * 100);
        assert_eq!(r.sink().get_pixel(-50, -49), Some(Color::RED));
        assert_eq!(r.sink().get_pixel(49, 50), Some(Color::RED));

        r.clear();
        r.draw_triangle_outline_2d(
            Vec2i::new(i32::MIN, i32::MIN),
            Vec2i::new(i32::MAX, i32::MIN),
            Vec2i::new(0, i32::MAX),
            Color::WHITE,
        );
        assert!(r.stats().pixels_written <= 300);
    }

    #[test]
    fn configured_parts_are_kept() {
        let mut r = renderer().with_frustum(ViewFrustum::with_near(2.0));
        assert_eq!(r.frustum().planes()[0], crate::math::Plane::new(Vec3::Z, -2.0));

        assert_eq!(r.render_mode(), RenderMode::Filled);
        r.set_render_mode(RenderMode::Wireframe);
        assert_eq!(r.render_mode(), RenderMode::Wireframe);

        r.draw_line_2d(Vec2i::new(0, 0), Vec2i::new(5, 0), Color::WHITE);
        let frame = r.into_sink();
        assert_eq!(frame.get_pixel(2, 0), Some(Color::WHITE));
    }
}
