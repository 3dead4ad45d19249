//! Scan conversion of lines and triangles.
//!
//! Everything here works on projected, integer canvas coordinates. Attributes
//! (x positions along an edge, inverse depth across a span) are produced by
//! stepping linearly between two integer positions with [`interpolate`].

mod line;
mod scanline;

pub use line::{draw_line, draw_triangle_outline};
pub use scanline::ScanlineRasterizer;

use crate::colors::Color;
use crate::math::Vec2i;

/// A triangle projected onto the canvas, ready for rasterization.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenTriangle {
    pub points: [Vec2i; 3],
    /// `1/z` of each vertex in camera space.
    pub inv_depth: [f32; 3],
    pub color: Color,
}

impl ScreenTriangle {
    pub fn new(points: [Vec2i; 3], inv_depth: [f32; 3], color: Color) -> Self {
        Self {
            points,
            inv_depth,
            color,
        }
    }
}

/// A value stepping linearly from `d0` at `i0` to `d1` at `i1`, sampled at
/// any integer position without building the whole list.
///
/// Positions are widened to `i64`, so any pair of `i32` endpoints is valid.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Ramp {
    i0: i64,
    d0: f32,
    i1: i64,
    d1: f32,
    slope: f32,
}

impl Ramp {
    pub(crate) fn new(i0: i32, d0: f32, i1: i32, d1: f32) -> Self {
        let (i0, i1) = (i64::from(i0), i64::from(i1));
        let slope = if i0 == i1 { 0.0 } else { (d1 - d0) / (i1 - i0) as f32 };
        Self { i0, d0, i1, d1, slope }
    }

    /// The value at `i`. The start position yields exactly `d0` and the end
    /// position exactly `d1`.
    pub(crate) fn at(&self, i: i64) -> f32 {
        if i == self.i0 {
            self.d0
        } else if i == self.i1 {
            self.d1
        } else {
            self.d0 + self.slope * (i - self.i0) as f32
        }
    }
}

/// Centered positions along one canvas axis that map into the buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct CanvasExtent {
    pub(crate) min: i64,
    pub(crate) max: i64,
}

impl CanvasExtent {
    /// Columns `x` with `0 <= width / 2 + x < width`.
    pub(crate) fn columns(width: u32) -> Self {
        let half = i64::from(width / 2);
        Self {
            min: -half,
            max: i64::from(width) - half - 1,
        }
    }

    /// Rows `y` with `0 <= height / 2 - y < height`.
    pub(crate) fn rows(height: u32) -> Self {
        let half = i64::from(height / 2);
        Self {
            min: half + 1 - i64::from(height),
            max: half,
        }
    }

    /// The part of `from..=to` on the canvas, as `i32` bounds.
    pub(crate) fn clip(&self, from: i64, to: i64) -> Option<(i32, i32)> {
        let from = from.max(self.min);
        let to = to.min(self.max);
        // Both ends now lie inside a u32-sized canvas, which fits in i32.
        (from <= to).then_some((from as i32, to as i32))
    }

    pub(crate) fn contains(&self, i: i64) -> bool {
        (self.min..=self.max).contains(&i)
    }
}

/// Steps a value linearly from `d0` at `i0` toward `d1` at `i1`.
///
/// Half-open: yields one value per integer in `i0..i1`, so the last value is
/// one step short of `d1`. A zero-length range yields `[d0]`; a reversed
/// range yields nothing.
pub fn interpolate(i0: i32, d0: f32, i1: i32, d1: f32) -> Vec<f32> {
    if i0 == i1 {
        return vec![d0];
    }
    let ramp = Ramp::new(i0, d0, i1, d1);
    (i64::from(i0)..i64::from(i1)).map(|i| ramp.at(i)).collect()
}

/// [`interpolate`] closed at both ends: one value per integer in `i0..=i1`,
/// ending exactly at `d1`.
pub fn interpolate_inclusive(i0: i32, d0: f32, i1: i32, d1: f32) -> Vec<f32> {
    let mut values = interpolate(i0, d0, i1, d1);
    if i1 > i0 {
        values.push(d1);
    }
    values
}
