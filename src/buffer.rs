use image::RgbaImage;

use crate::{PixtraceResult, TraceError};

/// Borrowed, read-only view of an RGBA8 pixel grid.
///
/// The data is expected to hold `width * height * 4` bytes in row-major
/// order. A shorter slice is tolerated: pixels past its end are skipped by
/// the sampler rather than read.
#[derive(Debug, Clone, Copy)]
pub struct PixelBuffer<'a> {
    width: u32,
    height: u32,
    data: &'a [u8],
}

impl<'a> PixelBuffer<'a> {
    pub fn new(width: u32, height: u32, data: &'a [u8]) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    /// Borrow the raw bytes of an [`RgbaImage`].
    pub fn from_image(image: &'a RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self::new(width, height, image.as_raw())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// RGBA channels of the pixel at `(x, y)`, or `None` if it lies past the end of the data.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Reject a buffer with no pixels.
    pub fn ensure_non_empty(&self) -> PixtraceResult<()> {
        if self.is_empty() {
            return Err(TraceError::InvalidInput(format!(
                "pixel buffer has zero area ({}x{})",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Copy the view into an owned image, padding missing pixels with transparent black.
    pub fn to_image(&self) -> RgbaImage {
        let expected = self.width as usize * self.height as usize * 4;
        let mut raw = vec![0u8; expected];
        let available = expected.min(self.data.len());
        raw[..available].copy_from_slice(&self.data[..available]);
        RgbaImage::from_raw(self.width, self.height, raw)
            .unwrap_or_else(|| RgbaImage::new(self.width, self.height))
    }
}

impl<'a> From<&'a RgbaImage> for PixelBuffer<'a> {
    fn from(image: &'a RgbaImage) -> Self {
        Self::from_image(image)
    }
}
