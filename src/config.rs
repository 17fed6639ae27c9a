use image::imageops::FilterType;

use crate::{PixtraceResult, TraceError};

/// Default sampling step in pixels.
pub const DEFAULT_STRIDE: u32 = 8;
/// Default number of posterization levels per channel (bucket width 32).
pub const DEFAULT_LEVELS: u16 = 8;
/// Default luma cut-off for threshold mode.
pub const DEFAULT_THRESHOLD: u8 = 128;
/// Minimum points a color group needs before it is emitted as a polyline.
pub const DEFAULT_MIN_POINTS: usize = 10;
/// Default palette cap.
pub const DEFAULT_MAX_COLORS: usize = 16;
/// Longest side a decoded image is scaled down to by default.
pub const DEFAULT_MAX_SIZE: u32 = 400;

/// How samples are turned into shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraceMode {
    /// One posterized square cell per sample.
    #[default]
    Grid,
    /// The whole image is handed to an external vectorizer.
    Polyline,
    /// Dark samples are kept with their original color and grouped into one path per color.
    Threshold,
}

/// Options forwarded to an external vectorizer in [`TraceMode::Polyline`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalTraceOptions {
    /// Target palette size.
    pub color_count: usize,
    /// Blur radius applied before tracing, 0 disables blurring.
    pub blur_radius: u32,
    /// Error threshold for straight line segments.
    pub line_threshold: f64,
    /// Error threshold for curved segments.
    pub curve_threshold: f64,
    /// Paths enclosing fewer pixels than this are dropped.
    pub path_omit_threshold: usize,
}

impl Default for ExternalTraceOptions {
    fn default() -> Self {
        Self {
            color_count: DEFAULT_MAX_COLORS,
            blur_radius: 0,
            line_threshold: 1.0,
            curve_threshold: 1.0,
            path_omit_threshold: 8,
        }
    }
}

impl ExternalTraceOptions {
    pub fn validate(&self) -> PixtraceResult<()> {
        if self.color_count == 0 {
            return Err(invalid("color_count must be at least 1"));
        }
        for (name, value) in [
            ("line_threshold", self.line_threshold),
            ("curve_threshold", self.curve_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Per-request tracing configuration.
///
/// A config is built once per conversion and never changes while the
/// conversion runs. Out-of-range values are rejected by [`SampleConfig::validate`]
/// before any pixel is sampled.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleConfig {
    pub mode: TraceMode,
    /// Sampling step in pixels, also the edge length of grid cells.
    pub stride: u32,
    /// Upper bound on distinct colors emitted by threshold mode.
    pub max_colors: usize,
    /// Luma cut-off for threshold mode; samples at or above it are dropped.
    pub threshold: u8,
    /// Posterization levels per channel in grid mode.
    pub levels: u16,
    /// Groups with fewer points are not emitted in threshold mode.
    pub min_points: usize,
    /// Overlay faint horizontal scanlines on the output.
    pub decorate: bool,
    pub external: ExternalTraceOptions,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            mode: TraceMode::Grid,
            stride: DEFAULT_STRIDE,
            max_colors: DEFAULT_MAX_COLORS,
            threshold: DEFAULT_THRESHOLD,
            levels: DEFAULT_LEVELS,
            min_points: DEFAULT_MIN_POINTS,
            decorate: false,
            external: ExternalTraceOptions::default(),
        }
    }
}

impl SampleConfig {
    pub fn new(mode: TraceMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn grid(stride: u32) -> Self {
        Self::new(TraceMode::Grid).with_stride(stride)
    }

    pub fn threshold(threshold: u8) -> Self {
        Self::new(TraceMode::Threshold).with_threshold(threshold)
    }

    pub fn with_stride(mut self, stride: u32) -> Self {
        self.stride = stride;
        self
    }

    pub fn with_max_colors(mut self, max_colors: usize) -> Self {
        self.max_colors = max_colors;
        self
    }

    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_levels(mut self, levels: u16) -> Self {
        self.levels = levels;
        self
    }

    pub fn with_min_points(mut self, min_points: usize) -> Self {
        self.min_points = min_points;
        self
    }

    pub fn with_decorate(mut self, decorate: bool) -> Self {
        self.decorate = decorate;
        self
    }

    pub fn with_external(mut self, external: ExternalTraceOptions) -> Self {
        self.external = external;
        self
    }

    /// Width of one posterization bucket, e.g. 32 for 8 levels.
    pub fn bucket_width(&self) -> u16 {
        256 / self.levels.max(1)
    }

    /// Check every knob against its allowed range.
    pub fn validate(&self) -> PixtraceResult<()> {
        if self.stride == 0 {
            return Err(invalid("stride must be at least 1"));
        }
        if self.max_colors == 0 {
            return Err(invalid("max_colors must be at least 1"));
        }
        if !(1..=256).contains(&self.levels) {
            return Err(invalid(format!(
                "levels must be between 1 and 256, got {}",
                self.levels
            )));
        }
        if self.min_points == 0 {
            return Err(invalid("min_points must be at least 1"));
        }
        if self.mode == TraceMode::Polyline {
            self.external.validate()?;
        }
        Ok(())
    }
}

/// Options for turning an encoded image into a pixel buffer.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
    /// Longest side after decoding. Larger images are scaled down, smaller ones are left alone.
    pub max_size: Option<u32>,
    /// Filter used when scaling down.
    pub resize_filter: FilterType,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_size: Some(DEFAULT_MAX_SIZE),
            resize_filter: FilterType::Triangle,
        }
    }
}

impl DecodeOptions {
    /// Set the longest side, `None` keeps the original size.
    pub fn with_max_size(mut self, max_size: Option<u32>) -> Self {
        self.max_size = max_size;
        self
    }

    /// Set the resize filter.
    pub fn with_resize_filter(mut self, filter: FilterType) -> Self {
        self.resize_filter = filter;
        self
    }
}

fn invalid(message: impl Into<String>) -> TraceError {
    TraceError::InvalidInput(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    mod validate {
        use super::*;

        #[test]
        fn default_is_valid() {
            assert!(SampleConfig::default().validate().is_ok());
        }

        #[test]
        fn zero_stride_rejected() {
            let err = SampleConfig::grid(0).validate().unwrap_err();
            assert!(matches!(err, TraceError::InvalidInput(_)));
        }

        #[test]
        fn zero_max_colors_rejected() {
            let cfg = SampleConfig::default().with_max_colors(0);
            assert!(cfg.validate().is_err());
        }

        #[test]
        fn levels_out_of_range_rejected() {
            assert!(SampleConfig::default().with_levels(0).validate().is_err());
            assert!(SampleConfig::default().with_levels(257).validate().is_err());
            assert!(SampleConfig::default().with_levels(256).validate().is_ok());
        }

        #[test]
        fn zero_min_points_rejected() {
            let cfg = SampleConfig::threshold(128).with_min_points(0);
            assert!(cfg.validate().is_err());
        }

        #[test]
        fn external_options_checked_only_in_polyline_mode() {
            let external = ExternalTraceOptions {
                line_threshold: f64::NAN,
                ..ExternalTraceOptions::default()
            };
            let grid = SampleConfig::default().with_external(external.clone());
            assert!(grid.validate().is_ok());

            let polyline = SampleConfig::new(TraceMode::Polyline).with_external(external);
            assert!(polyline.validate().is_err());
        }

        #[test]
        fn zero_color_count_rejected() {
            let external = ExternalTraceOptions {
                color_count: 0,
                ..ExternalTraceOptions::default()
            };
            assert!(external.validate().is_err());
        }
    }

    #[test]
    fn bucket_width_for_default_levels() {
        assert_eq!(SampleConfig::default().bucket_width(), 32);
        assert_eq!(SampleConfig::default().with_levels(4).bucket_width(), 64);
    }
}
