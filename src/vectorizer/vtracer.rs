use image::RgbaImage;
use imageproc::filter::gaussian_blur_f32;
use log::debug;
use visioncortex::PathSimplifyMode;
use vtracer::{ColorImage, ColorMode, Config, Hierarchical, SvgFile, convert};

use crate::buffer::PixelBuffer;
use crate::config::ExternalTraceOptions;
use crate::{PixtraceResult, TraceError};

use super::ExternalVectorizer;

/// vtracer rejects length thresholds outside this range.
const LENGTH_THRESHOLD_RANGE: (f64, f64) = (3.5, 10.0);

/// VTracer-based vectorizer used by polyline mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct VtracerVectorizer;

impl ExternalVectorizer for VtracerVectorizer {
    fn vectorize(
        &self,
        buffer: &PixelBuffer<'_>,
        options: &ExternalTraceOptions,
    ) -> PixtraceResult<String> {
        trace_to_svg_string(buffer, options)
    }
}

/// Blur the buffer if requested, then trace it to an SVG string with VTracer.
pub fn trace_to_svg_string(
    buffer: &PixelBuffer<'_>,
    options: &ExternalTraceOptions,
) -> PixtraceResult<String> {
    let mut image = buffer.to_image();
    if options.blur_radius > 0 {
        image = gaussian_blur_f32(&image, options.blur_radius as f32);
    }
    let svg_file = trace(rgba_to_color_image(image), options)?;
    Ok(svg_file.to_string())
}

/// Trace a ColorImage into an SVG using VTracer with options derived from `options`.
pub fn trace(img: ColorImage, options: &ExternalTraceOptions) -> PixtraceResult<SvgFile> {
    let cfg = config_for(options);
    debug!(
        "vtracer: {}x{} px, color precision {}, speckle {}",
        img.width, img.height, cfg.color_precision, cfg.filter_speckle
    );
    convert(img, cfg).map_err(TraceError::ExternalService)
}

/// Translate the generic option bag into a VTracer configuration.
pub fn config_for(options: &ExternalTraceOptions) -> Config {
    let color_mode = if options.color_count <= 2 {
        ColorMode::Binary
    } else {
        ColorMode::Color
    };
    let mode = if options.curve_threshold > 0.0 {
        PathSimplifyMode::Spline
    } else {
        PathSimplifyMode::Polygon
    };
    let (min_len, max_len) = LENGTH_THRESHOLD_RANGE;

    Config {
        color_mode,
        hierarchical: Hierarchical::Stacked,
        mode,
        filter_speckle: options.path_omit_threshold,
        color_precision: color_precision_bits(options.color_count),
        layer_difference: 16,
        corner_threshold: 60,
        length_threshold: options.line_threshold.clamp(min_len, max_len),
        max_iterations: 10,
        splice_threshold: 45,
        path_precision: Some(2),
    }
}

/// Smallest number of significant bits per channel whose cube covers `color_count` colors.
pub fn color_precision_bits(color_count: usize) -> i32 {
    let mut bits = 1;
    while bits < 8 && (1usize << (3 * bits)) < color_count {
        bits += 1;
    }
    bits
}

fn rgba_to_color_image(image: RgbaImage) -> ColorImage {
    let (w, h) = image.dimensions();
    ColorImage {
        pixels: image.into_raw(),
        width: w as usize,
        height: h as usize,
    }
}
