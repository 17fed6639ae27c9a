use std::fmt;

/// BT.601 luma weights in thousandths.
const LUMA_R: u32 = 299;
const LUMA_G: u32 = 587;
const LUMA_B: u32 = 114;

/// An opaque RGB color. Two colors are the same region key only if every channel matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Luma scaled by 1000, i.e. `1000 * (0.299r + 0.587g + 0.114b)` without rounding.
    pub fn luma_milli(&self) -> u32 {
        LUMA_R * u32::from(self.r) + LUMA_G * u32::from(self.g) + LUMA_B * u32::from(self.b)
    }

    /// Luma as a float in `[0.0, 255.0]`.
    pub fn luma(&self) -> f32 {
        self.luma_milli() as f32 / 1000.0
    }

    /// Whether the luma of this color is strictly below `threshold`.
    pub fn is_darker_than(&self, threshold: u8) -> bool {
        self.luma_milli() < u32::from(threshold) * 1000
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Color {
    /// Formats as an SVG `rgb(r,g,b)` paint value.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}
