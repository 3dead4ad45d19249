//! RGB colors and ARGB8888 packing.

use serde::{Deserialize, Serialize};

/// An opaque 24-bit RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const RED: Self = Self::new(255, 0, 0);
    pub const GREEN: Self = Self::new(0, 255, 0);
    pub const BLUE: Self = Self::new(0, 0, 255);
    pub const YELLOW: Self = Self::new(255, 255, 0);
    pub const PURPLE: Self = Self::new(255, 0, 255);
    pub const CYAN: Self = Self::new(0, 255, 255);
    pub const AQUAMARINE: Self = Self::new(127, 255, 212);
    pub const RED_VIOLET: Self = Self::new(199, 21, 133);
    pub const GOLD: Self = Self::new(255, 215, 0);
    pub const BACKGROUND: Self = Self::new(0x1E, 0x1E, 0x1E);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Packs into ARGB8888 with full alpha.
    #[inline]
    pub const fn to_argb(self) -> u32 {
        0xFF00_0000 | ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
    }

    /// Unpacks an ARGB8888 value, ignoring alpha.
    #[inline]
    pub const fn from_argb(argb: u32) -> Self {
        Self::new((argb >> 16) as u8, (argb >> 8) as u8, argb as u8)
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl From<Color> for [u8; 3] {
    fn from(c: Color) -> Self {
        [c.r, c.g, c.b]
    }
}
