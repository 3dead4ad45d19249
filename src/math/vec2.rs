/// 2D point on the projection plane, in viewport units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Integer pixel coordinate on the canvas.
///
/// The canvas origin is its center: `(0, 0)` is the middle pixel, `x` grows to
/// the right and `y` grows upward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Vec2i {
    pub x: i32,
    pub y: i32,
}

impl Vec2i {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Vec2i {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}
