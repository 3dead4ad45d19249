//! Per-frame pixel storage.
//!
//! Both buffers are addressed with centered canvas coordinates: `(0, 0)` is
//! the middle of the canvas and `y` grows upward. A coordinate maps to the
//! row-major offset of column `width / 2 + x` and row `height / 2 - y`.
//! Coordinates outside the canvas are ignored.
//!
//! # Depth Buffer
//!
//! The depth buffer stores `1/z` (camera-space depth) for each pixel. `1/z`
//! interpolates linearly in screen space and larger values are closer to the
//! camera. A cleared buffer holds 0.0, which is infinitely far away.

use super::sink::OutputSink;
use crate::colors::Color;
use crate::error::PresentError;

/// Maps a centered coordinate to a row-major buffer offset, or `None` if it
/// falls outside a `width` x `height` canvas.
#[inline]
pub(crate) fn buffer_offset(width: u32, height: u32, x: i32, y: i32) -> Option<usize> {
    let column = (width / 2) as i64 + x as i64;
    let row = (height / 2) as i64 - y as i64;
    if column < 0 || row < 0 || column >= width as i64 || row >= height as i64 {
        return None;
    }
    Some((row as usize) * width as usize + column as usize)
}

/// Inverse-depth buffer used for hidden surface removal.
///
/// Allocated once and cleared at the start of every frame.
#[derive(Debug, Clone)]
pub struct DepthBuffer {
    values: Vec<f32>,
    width: u32,
    height: u32,
}

impl DepthBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            values: vec![0.0; (width * height) as usize],
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Resets every pixel to infinitely far (0.0).
    #[inline]
    pub fn clear(&mut self) {
        self.values.fill(0.0);
    }

    /// Depth test at a centered coordinate.
    ///
    /// Returns true and stores `inv_depth` only if it is strictly greater than
    /// the stored value (closer wins, ties lose). Off-canvas coordinates are
    /// rejected without touching the buffer.
    #[inline]
    pub fn test_and_set(&mut self, x: i32, y: i32, inv_depth: f32) -> bool {
        let Some(offset) = buffer_offset(self.width, self.height, x, y) else {
            return false;
        };
        let stored = &mut self.values[offset];
        if inv_depth > *stored {
            *stored = inv_depth;
            true
        } else {
            false
        }
    }

    /// Stored inverse depth at a centered coordinate, or `None` if off-canvas.
    pub fn get(&self, x: i32, y: i32) -> Option<f32> {
        buffer_offset(self.width, self.height, x, y).map(|offset| self.values[offset])
    }

    /// Row-major values, top row first.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Number of pixels written since the last clear.
    pub fn covered_pixels(&self) -> usize {
        self.values.iter().filter(|&&v| v != 0.0).count()
    }
}

/// In-memory ARGB8888 color buffer.
///
/// Implements [`OutputSink`] directly, which makes it the headless target for
/// tests and benchmarks, and it is the backing store for the window and image
/// sinks.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    pixels: Vec<u32>,
    width: u32,
    height: u32,
    background: Color,
    frames_presented: u64,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_background(width, height, Color::BACKGROUND)
    }

    pub fn with_background(width: u32, height: u32, background: Color) -> Self {
        Self {
            pixels: vec![background.to_argb(); (width * height) as usize],
            width,
            height,
            background,
            frames_presented: 0,
        }
    }

    pub fn background(&self) -> Color {
        self.background
    }

    /// Color at a centered coordinate, or `None` if off-canvas.
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Color> {
        buffer_offset(self.width, self.height, x, y).map(|offset| Color::from_argb(self.pixels[offset]))
    }

    /// Packed pixels, row-major, top row first.
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Pixels as raw bytes for texture upload (`width * 4` bytes per row).
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }
}

impl OutputSink for FrameBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self) {
        self.pixels.fill(self.background.to_argb());
    }

    #[inline]
    fn put_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(offset) = buffer_offset(self.width, self.height, x, y) {
            self.pixels[offset] = color.to_argb();
        }
    }

    fn present(&mut self) -> Result<(), PresentError> {
        self.frames_presented += 1;
        Ok(())
    }

    fn poll_quit(&mut self) -> bool {
        false
    }
}
