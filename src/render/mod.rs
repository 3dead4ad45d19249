//! Rasterization and frame output.

pub mod framebuffer;
pub mod rasterizer;
pub mod renderer;
pub mod sink;

pub use framebuffer::{DepthBuffer, FrameBuffer};
pub use rasterizer::{interpolate, interpolate_inclusive, ScanlineRasterizer, ScreenTriangle};
pub use renderer::{FrameStats, RenderMode, Renderer};
pub use sink::{ImageSink, OutputSink};
