//! Line drawing by stepping along the major axis.

use super::{CanvasExtent, Ramp};
use crate::colors::Color;
use crate::math::Vec2i;
use crate::render::sink::OutputSink;

/// Draws a line from `p0` toward `p1` and returns the number of pixels written.
///
/// The axis with the larger absolute delta is the major axis (ties go to
/// `y`), so the line has no gaps. Endpoints are swapped to always step
/// forward. The pixel at the far end of the major axis is not drawn, and a
/// zero-length line draws nothing.
///
/// Only the part of the major axis that crosses the canvas is stepped, so
/// endpoints far off the canvas cost nothing extra.
pub fn draw_line<S: OutputSink + ?Sized>(sink: &mut S, p0: Vec2i, p1: Vec2i, color: Color) -> usize {
    let dx = i64::from(p1.x) - i64::from(p0.x);
    let dy = i64::from(p1.y) - i64::from(p0.y);
    let columns = CanvasExtent::columns(sink.width());
    let rows = CanvasExtent::rows(sink.height());
    let mut written = 0;

    if dx.abs() > dy.abs() {
        let (start, end) = if dx < 0 { (p1, p0) } else { (p0, p1) };
        let ys = Ramp::new(start.x, start.y as f32, end.x, end.y as f32);
        let Some((first, last)) = columns.clip(i64::from(start.x), i64::from(end.x) - 1) else {
            return 0;
        };
        for x in first..=last {
            let y = ys.at(i64::from(x)) as i64;
            if rows.contains(y) {
                sink.put_pixel(x, y as i32, color);
                written += 1;
            }
        }
    } else {
        let (start, end) = if dy < 0 { (p1, p0) } else { (p0, p1) };
        let xs = Ramp::new(start.y, start.x as f32, end.y, end.x as f32);
        let Some((first, last)) = rows.clip(i64::from(start.y), i64::from(end.y) - 1) else {
            return 0;
        };
        for y in first..=last {
            let x = xs.at(i64::from(y)) as i64;
            if columns.contains(x) {
                sink.put_pixel(x as i32, y, color);
                written += 1;
            }
        }
    }
    written
}

/// Draws the three edges of a triangle: `p0-p1`, `p2-p1`, `p2-p0`.
pub fn draw_triangle_outline<S: OutputSink + ?Sized>(
    sink: &mut S,
    [p0, p1, p2]: [Vec2i; 3],
    color: Color,
) -> usize {
    draw_line(sink, p0, p1, color) + draw_line(sink, p2, p1, color) + draw_line(sink, p2, p0, color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::framebuffer::FrameBuffer;

    fn canvas() -> FrameBuffer {
        FrameBuffer::with_background(40, 40, Color::BLACK)
    }

    fn lit(frame: &FrameBuffer, x: i32, y: i32) -> bool {
        frame.get_pixel(x, y) == Some(Color::WHITE)
    }

    #[test]
    fn horizontal_line_is_half_open() {
        let mut frame = canvas();
        let written = draw_line(&mut frame, Vec2i::new(-5, 2), Vec2i::new(5, 2), Color::WHITE);
        assert_eq!(written, 10);
        assert!(lit(&frame, -5, 2));
        assert!(lit(&frame, 4, 2));
        assert!(!lit(&frame, 5, 2));
    }

    #[test]
    fn direction_does_not_matter() {
        let mut forward = canvas();
        let mut backward = canvas();
        draw_line(&mut forward, Vec2i::new(-8, -3), Vec2i::new(9, 4), Color::WHITE);
        draw_line(&mut backward, Vec2i::new(9, 4), Vec2i::new(-8, -3), Color::WHITE);
        assert_eq!(forward.pixels(), backward.pixels());
    }

    #[test]
    fn steep_line_steps_along_y() {
        let mut frame = canvas();
        let written = draw_line(&mut frame, Vec2i::new(0, -10), Vec2i::new(3, 10), Color::WHITE);
        // One pixel per row, no gaps.
        assert_eq!(written, 20);
        for y in -10..10 {
            assert!((-1..=3).any(|x| lit(&frame, x, y)), "gap at row {}", y);
        }
    }

    #[test]
    fn diagonal_tie_uses_y_major() {
        let mut frame = canvas();
        let written = draw_line(&mut frame, Vec2i::new(0, 0), Vec2i::new(5, 5), Color::WHITE);
        assert_eq!(written, 5);
        for i in 0..5 {
            assert!(lit(&frame, i, i));
        }
    }

    #[test]
    fn degenerate_line_draws_nothing() {
        let mut frame = canvas();
        assert_eq!(draw_line(&mut frame, Vec2i::new(3, 3), Vec2i::new(3, 3), Color::WHITE), 0);
    }

    #[test]
    fn off_canvas_pixels_are_dropped() {
        let mut frame = canvas();
        let written = draw_line(&mut frame, Vec2i::new(-100, 0), Vec2i::new(100, 0), Color::WHITE);
        assert_eq!(written, 40);
        assert!(lit(&frame, -20, 0));
        assert!(lit(&frame, 19, 0));
    }

    #[test]
    fn line_far_off_canvas_only_steps_visible_part() {
        let mut frame = canvas();
        let written = draw_line(
            &mut frame,
            Vec2i::new(-2_000_000_000, 0),
            Vec2i::new(2_000_000_000, 1),
            Color::WHITE,
        );
        // Near x = 0 the line sits at y = 0.5, which truncates to row 0.
        assert_eq!(written, 40);
        assert!(lit(&frame, -20, 0));
        assert!(lit(&frame, 19, 0));
    }

    #[test]
    fn extreme_steep_line_does_not_overflow() {
        let mut frame = canvas();
        let written = draw_line(
            &mut frame,
            Vec2i::new(3, i32::MAX),
            Vec2i::new(3, i32::MIN),
            Color::WHITE,
        );
        assert_eq!(written, 40);
        assert!(lit(&frame, 3, 20));
        assert!(lit(&frame, 3, -19));
    }

    #[test]
    fn line_passing_beside_the_canvas_draws_nothing() {
        let mut frame = canvas();
        let written = draw_line(&mut frame, Vec2i::new(-100, 50), Vec2i::new(100, 60), Color::WHITE);
        assert_eq!(written, 0);
    }

    #[test]
    fn outline_touches_each_corner_edge() {
        let mut frame = canvas();
        draw_triangle_outline(
            &mut frame,
            [Vec2i::new(-10, -10), Vec2i::new(10, -10), Vec2i::new(0, 10)],
            Color::WHITE,
        );
        assert!(lit(&frame, 0, -10));
        assert!(lit(&frame, -5, 0));
        assert!(lit(&frame, 5, 0));
        assert!(!lit(&frame, 0, 0));
    }
}
