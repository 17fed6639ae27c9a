use std::path::Path;

use image::{DynamicImage, RgbaImage};
use log::debug;

use crate::config::DecodeOptions;
use crate::{PixtraceResult, TraceError};

/// Read and decode an image file into an RGBA buffer ready for tracing.
pub fn decode_file(path: impl AsRef<Path>, options: &DecodeOptions) -> PixtraceResult<RgbaImage> {
    let path = path.as_ref();
    let image = image::open(path)?;
    debug!("decoded {}", path.display());
    prepare(image, options)
}

/// Decode an in-memory encoded image into an RGBA buffer ready for tracing.
pub fn decode_bytes(bytes: &[u8], options: &DecodeOptions) -> PixtraceResult<RgbaImage> {
    let image = image::load_from_memory(bytes)?;
    prepare(image, options)
}

/// Reject empty images and scale down so the longest side fits `options.max_size`.
pub fn prepare(image: DynamicImage, options: &DecodeOptions) -> PixtraceResult<RgbaImage> {
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return Err(TraceError::EmptyImage { width, height });
    }

    let image = match options.max_size {
        Some(0) => {
            return Err(TraceError::InvalidInput(
                "max_size must be at least 1".to_string(),
            ));
        }
        Some(max) if width.max(height) > max => {
            let scaled = image.resize(max, max, options.resize_filter);
            debug!(
                "scaled {}x{} down to {}x{}",
                width,
                height,
                scaled.width(),
                scaled.height()
            );
            scaled
        }
        _ => image,
    };

    Ok(image.into_rgba8())
}
