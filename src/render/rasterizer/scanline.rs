//! Scanline triangle fill.
//!
//! # Algorithm Overview
//!
//! 1. **Sort vertices** by `y` with three compare-and-swaps, so
//!    `p0.y <= p1.y <= p2.y`.
//! 2. **Set up the sides**: x as a linear function of the row for the short
//!    side (`p0 -> p1 -> p2`, the row at `p1` taken from the lower half) and
//!    for the long side (`p0 -> p2`).
//! 3. **Pick left and right** by comparing the two sides once, at the middle
//!    row. The sides of a triangle cannot cross, so one comparison decides
//!    every row.
//! 4. **Fill rows** `p0.y..=p2.y`, columns `x_left..=x_right`, skipping
//!    whatever lies off the canvas. The side and span values are computed
//!    for the visible rows and columns only, so a triangle reaching far past
//!    the canvas costs no more than the part that is drawn.
//!
//! ```text
//!        p2
//!        /\
//!       /  \
//!  p1  /    \      short side: p0 -> p1 -> p2
//!      \     \     long side:  p0 -> p2
//!       \     \
//!        \_____\
//!       p0
//! ```
//!
//! The depth-tested fill interpolates `1/z` the same way: along both sides,
//! then across each row, testing every pixel against the depth buffer.

use super::{CanvasExtent, Ramp, ScreenTriangle};
use crate::colors::Color;
use crate::math::Vec2i;
use crate::render::framebuffer::DepthBuffer;
use crate::render::sink::OutputSink;

/// Scanline triangle rasterizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanlineRasterizer;

/// One attribute along the two sides of a sorted triangle.
///
/// The short side is two ramps joined at `p1`; the row of `p1` belongs to
/// the lower one.
struct Sides {
    split: i64,
    upper: Ramp,
    lower: Ramp,
    long: Ramp,
}

impl Sides {
    fn new(y: [i32; 3], values: [f32; 3]) -> Self {
        Self {
            split: i64::from(y[1]),
            upper: Ramp::new(y[0], values[0], y[1], values[1]),
            lower: Ramp::new(y[1], values[1], y[2], values[2]),
            long: Ramp::new(y[0], values[0], y[2], values[2]),
        }
    }

    fn short(&self, y: i64) -> f32 {
        if y < self.split {
            self.upper.at(y)
        } else {
            self.lower.at(y)
        }
    }

    fn long(&self, y: i64) -> f32 {
        self.long.at(y)
    }

    /// `(left, right)` values at row `y`.
    fn at(&self, y: i64, long_is_left: bool) -> (f32, f32) {
        if long_is_left {
            (self.long(y), self.short(y))
        } else {
            (self.short(y), self.long(y))
        }
    }
}

/// Rows of a sorted triangle that fall on the canvas, plus the row where
/// the sides are compared.
struct RowRange {
    first: i32,
    last: i32,
    middle: i64,
}

impl RowRange {
    fn new(top: i32, bottom: i32, rows: CanvasExtent) -> Option<Self> {
        let (top, bottom) = (i64::from(top), i64::from(bottom));
        let (first, last) = rows.clip(top, bottom)?;
        Some(Self {
            first,
            last,
            middle: top + (bottom - top) / 2,
        })
    }
}

impl ScanlineRasterizer {
    pub fn new() -> Self {
        Self
    }

    /// Sorts the vertices by ascending `y`, carrying their attributes along.
    ///
    /// Three fixed compares: `(1, 0)`, `(2, 0)`, `(2, 1)`. Equal `y` values
    /// are never swapped.
    fn sort_vertices(points: &mut [Vec2i; 3], inv_depth: &mut [f32; 3]) {
        if points[1].y < points[0].y {
            points.swap(1, 0);
            inv_depth.swap(1, 0);
        }
        if points[2].y < points[0].y {
            points.swap(2, 0);
            inv_depth.swap(2, 0);
        }
        if points[2].y < points[1].y {
            points.swap(2, 1);
            inv_depth.swap(2, 1);
        }
    }

    /// True if the long side is the left one, judged at the middle row
    /// `p0.y + (p2.y - p0.y) / 2`.
    fn long_side_is_left(x: &Sides, middle: i64) -> bool {
        x.long(middle) < x.short(middle)
    }

    /// Fills a triangle with a flat color, no depth test.
    ///
    /// Returns the number of pixels written.
    pub fn fill_triangle_flat<S: OutputSink + ?Sized>(
        &self,
        points: [Vec2i; 3],
        color: Color,
        sink: &mut S,
    ) -> usize {
        let mut points = points;
        Self::sort_vertices(&mut points, &mut [0.0; 3]);
        let [p0, _, p2] = points;
        let columns = CanvasExtent::columns(sink.width());
        let Some(rows) = RowRange::new(p0.y, p2.y, CanvasExtent::rows(sink.height())) else {
            return 0;
        };

        let x = Sides::new(points.map(|p| p.y), points.map(|p| p.x as f32));
        let long_is_left = Self::long_side_is_left(&x, rows.middle);

        let mut written = 0;
        for y in rows.first..=rows.last {
            let (left, right) = x.at(i64::from(y), long_is_left);
            let Some((start, end)) = columns.clip(left as i64, right as i64) else {
                continue;
            };
            for column in start..=end {
                sink.put_pixel(column, y, color);
                written += 1;
            }
        }
        written
    }

    /// Fills a triangle with a flat color, keeping only pixels that pass the
    /// inverse-depth test.
    ///
    /// Returns the number of pixels written.
    pub fn fill_triangle<S: OutputSink + ?Sized>(
        &self,
        triangle: &ScreenTriangle,
        depth: &mut DepthBuffer,
        sink: &mut S,
    ) -> usize {
        let mut points = triangle.points;
        let mut inv_depth = triangle.inv_depth;
        Self::sort_vertices(&mut points, &mut inv_depth);
        let [p0, _, p2] = points;
        let columns = CanvasExtent::columns(sink.width());
        let Some(rows) = RowRange::new(p0.y, p2.y, CanvasExtent::rows(sink.height())) else {
            return 0;
        };
        let ys = points.map(|p| p.y);

        let x = Sides::new(ys, points.map(|p| p.x as f32));
        let z = Sides::new(ys, inv_depth);
        // The depth sides follow the x sides.
        let long_is_left = Self::long_side_is_left(&x, rows.middle);

        let mut written = 0;
        for y in rows.first..=rows.last {
            let row = i64::from(y);
            let (x_left, x_right) = x.at(row, long_is_left);
            let (z_left, z_right) = z.at(row, long_is_left);
            let (start, end) = (x_left as i32, x_right as i32);
            let Some((first, last)) = columns.clip(i64::from(start), i64::from(end)) else {
                continue;
            };
            let span = Ramp::new(start, z_left, end, z_right);

            for column in first..=last {
                let iz = span.at(i64::from(column));
                if depth.test_and_set(column, y, iz) {
                    sink.put_pixel(column, y, triangle.color);
                    written += 1;
                }
            }
        }
        written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::framebuffer::FrameBuffer;

    fn canvas() -> (FrameBuffer, DepthBuffer) {
        (
            FrameBuffer::with_background(64, 64, Color::BLACK),
            DepthBuffer::new(64, 64),
        )
    }

    fn triangle(points: [(i32, i32); 3], inv_depth: f32, color: Color) -> ScreenTriangle {
        ScreenTriangle::new(points.map(Vec2i::from), [inv_depth; 3], color)
    }

    #[test]
    fn sort_orders_by_y_and_keeps_attributes_paired() {
        let mut points = [Vec2i::new(0, 9), Vec2i::new(1, 3), Vec2i::new(2, 5)];
        let mut inv_depth = [0.9, 0.3, 0.5];
        ScanlineRasterizer::sort_vertices(&mut points, &mut inv_depth);
        assert_eq!(points.map(|p| p.y), [3, 5, 9]);
        assert_eq!(inv_depth, [0.3, 0.5, 0.9]);
    }

    #[test]
    fn equal_y_is_not_reordered() {
        let mut points = [Vec2i::new(0, 2), Vec2i::new(5, 2), Vec2i::new(9, 2)];
        let mut inv_depth = [0.1, 0.2, 0.3];
        ScanlineRasterizer::sort_vertices(&mut points, &mut inv_depth);
        assert_eq!(points.map(|p| p.x), [0, 5, 9]);
    }

    #[test]
    fn fills_right_triangle_rows() {
        let (mut frame, mut depth) = canvas();
        let tri = triangle([(0, 0), (10, 0), (0, 10)], 0.5, Color::RED);
        let written = ScanlineRasterizer::new().fill_triangle(&tri, &mut depth, &mut frame);

        // Row y spans x in 0..=10-y: 11 + 10 + ... + 1 pixels.
        assert_eq!(written, 66);
        assert_eq!(depth.covered_pixels(), 66);
        assert_eq!(frame.get_pixel(0, 0), Some(Color::RED));
        assert_eq!(frame.get_pixel(10, 0), Some(Color::RED));
        assert_eq!(frame.get_pixel(0, 10), Some(Color::RED));
        assert_eq!(frame.get_pixel(6, 6), Some(Color::BLACK));
    }

    #[test]
    fn winding_does_not_change_coverage() {
        let rasterizer = ScanlineRasterizer::new();
        let (mut a, mut da) = canvas();
        let (mut b, mut db) = canvas();
        rasterizer.fill_triangle(&triangle([(-9, -4), (12, 3), (1, 15)], 0.5, Color::RED), &mut da, &mut a);
        rasterizer.fill_triangle(&triangle([(1, 15), (12, 3), (-9, -4)], 0.5, Color::RED), &mut db, &mut b);
        assert_eq!(a.pixels(), b.pixels());
    }

    #[test]
    fn closer_triangle_wins_regardless_of_order() {
        let rasterizer = ScanlineRasterizer::new();
        let near = triangle([(-10, -10), (10, -10), (0, 10)], 0.5, Color::GREEN);
        let far = triangle([(-10, 10), (10, 10), (0, -10)], 0.25, Color::BLUE);

        for order in [[near, far], [far, near]] {
            let (mut frame, mut depth) = canvas();
            for tri in &order {
                rasterizer.fill_triangle(tri, &mut depth, &mut frame);
            }
            assert_eq!(frame.get_pixel(0, 0), Some(Color::GREEN));
            assert_eq!(frame.get_pixel(8, 9), Some(Color::BLUE));
        }
    }

    #[test]
    fn depth_is_interpolated_across_rows() {
        let (mut frame, mut depth) = canvas();
        let tri = ScreenTriangle::new(
            [Vec2i::new(0, 0), Vec2i::new(20, 0), Vec2i::new(0, 20)],
            [0.2, 0.6, 0.2],
            Color::WHITE,
        );
        ScanlineRasterizer::new().fill_triangle(&tri, &mut depth, &mut frame);
        let left = depth.get(0, 0).unwrap();
        let middle = depth.get(10, 0).unwrap();
        let right = depth.get(20, 0).unwrap();
        assert!(left < middle && middle < right);
        approx::assert_relative_eq!(middle, 0.4, epsilon = 1e-4);
    }

    #[test]
    fn flat_triangle_is_one_row() {
        let (mut frame, _) = canvas();
        let written = ScanlineRasterizer::new().fill_triangle_flat(
            [Vec2i::new(-3, 4), Vec2i::new(3, 4), Vec2i::new(0, 4)],
            Color::GOLD,
            &mut frame,
        );
        assert!(written > 0);
        assert_eq!(frame.get_pixel(0, 4), Some(Color::GOLD));
        assert_eq!(frame.get_pixel(0, 5), Some(Color::BLACK));
        assert_eq!(frame.get_pixel(0, 3), Some(Color::BLACK));
    }

    #[test]
    fn flat_fill_matches_depth_fill_coverage() {
        let rasterizer = ScanlineRasterizer::new();
        let points = [(-20, -15), (25, 0), (-5, 30)];
        let (mut flat, _) = canvas();
        let (mut tested, mut depth) = canvas();
        rasterizer.fill_triangle_flat(points.map(Vec2i::from), Color::RED, &mut flat);
        rasterizer.fill_triangle(&triangle(points, 0.5, Color::RED), &mut depth, &mut tested);
        assert_eq!(flat.pixels(), tested.pixels());
    }

    #[test]
    fn off_canvas_triangle_is_dropped() {
        let (mut frame, mut depth) = canvas();
        let tri = triangle([(200, 200), (260, 200), (200, 260)], 0.5, Color::RED);
        let written = ScanlineRasterizer::new().fill_triangle(&tri, &mut depth, &mut frame);
        assert_eq!(written, 0);
        assert_eq!(depth.covered_pixels(), 0);
    }

    #[test]
    fn huge_triangle_fills_only_the_canvas() {
        let points = [(0, 0), (1_000_000, 0), (0, 1_000_000)];
        let rasterizer = ScanlineRasterizer::new();

        let (mut flat, _) = canvas();
        let written = rasterizer.fill_triangle_flat(points.map(Vec2i::from), Color::RED, &mut flat);
        // Visible quarter: columns 0..=31, rows 0..=32.
        assert_eq!(written, 32 * 33);
        assert_eq!(flat.get_pixel(31, 32), Some(Color::RED));
        assert_eq!(flat.get_pixel(-1, 0), Some(Color::BLACK));
        assert_eq!(flat.get_pixel(0, -1), Some(Color::BLACK));

        let (mut tested, mut depth) = canvas();
        let written = rasterizer.fill_triangle(&triangle(points, 0.5, Color::RED), &mut depth, &mut tested);
        assert_eq!(written, 32 * 33);
        assert_eq!(depth.covered_pixels(), 32 * 33);
        assert_eq!(flat.pixels(), tested.pixels());
    }

    #[test]
    fn triangle_at_extreme_coordinates_terminates() {
        let (mut frame, mut depth) = canvas();
        let tri = triangle(
            [(i32::MIN, i32::MIN), (i32::MAX, i32::MIN), (0, i32::MAX)],
            0.5,
            Color::GREEN,
        );
        let written = ScanlineRasterizer::new().fill_triangle(&tri, &mut depth, &mut frame);
        assert_eq!(written, 64 * 64);
    }

    #[test]
    fn sides_are_compared_at_the_half_open_middle_row() {
        // Two rows: the sides only meet at p2, so the comparison must use
        // row 0, not row 1.
        let (mut frame, _) = canvas();
        let written = ScanlineRasterizer::new().fill_triangle_flat(
            [Vec2i::new(0, 0), Vec2i::new(10, 0), Vec2i::new(5, 1)],
            Color::WHITE,
            &mut frame,
        );
        assert_eq!(written, 11 + 1);
        assert_eq!(frame.get_pixel(0, 0), Some(Color::WHITE));
        assert_eq!(frame.get_pixel(10, 0), Some(Color::WHITE));
        assert_eq!(frame.get_pixel(5, 1), Some(Color::WHITE));
    }
}
