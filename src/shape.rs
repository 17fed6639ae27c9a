use crate::color::Color;

/// A point in image space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned filled cell produced by grid mode.
///
/// `width` and `height` equal the stride unless the cell was clipped at the
/// right or bottom edge of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RectShape {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub color: Color,
}

/// Path through every retained sample of one color, in sampling order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolylineShape {
    pub color: Color,
    pub points: Vec<Point>,
    pub closed: bool,
}

/// Anything the SVG emitter knows how to draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    Rect(RectShape),
    Polyline(PolylineShape),
}

impl From<RectShape> for Shape {
    fn from(rect: RectShape) -> Self {
        Shape::Rect(rect)
    }
}

impl From<PolylineShape> for Shape {
    fn from(line: PolylineShape) -> Self {
        Shape::Polyline(line)
    }
}
