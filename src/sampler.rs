//! Strided, row-major walk over a [`PixelBuffer`].
//!
//! Later stages break ties by "first sample wins", so the visiting order is
//! part of the contract: rows top to bottom, and left to right within a row.

use crate::buffer::PixelBuffer;
use crate::color::Color;

/// One sampled pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub x: u32,
    pub y: u32,
    pub color: Color,
    pub alpha: u8,
}

/// Lazy iterator over the samples of a buffer. Clone it to restart.
#[derive(Debug, Clone)]
pub struct Samples<'a> {
    buffer: PixelBuffer<'a>,
    stride: u32,
    x: u32,
    y: u32,
}

/// Sample every `stride`-th pixel in both directions.
///
/// A stride of 0 is treated as 1. Pixels whose bytes lie past the end of the
/// buffer are skipped.
pub fn sample(buffer: PixelBuffer<'_>, stride: u32) -> Samples<'_> {
    Samples {
        buffer,
        stride: stride.max(1),
        x: 0,
        y: 0,
    }
}

impl Iterator for Samples<'_> {
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        let (width, height) = self.buffer.dimensions();
        if width == 0 {
            return None;
        }
        while self.y < height {
            let (x, y) = (self.x, self.y);
            match x.checked_add(self.stride) {
                Some(next) if next < width => self.x = next,
                _ => {
                    self.x = 0;
                    self.y = y.saturating_add(self.stride);
                }
            }
            if let Some([r, g, b, a]) = self.buffer.pixel(x, y) {
                return Some(Sample {
                    x,
                    y,
                    color: Color::from([r, g, b]),
                    alpha: a,
                });
            }
        }
        None
    }
}
