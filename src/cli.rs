use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use image::imageops::FilterType;
use pixtrace::config::{
    DEFAULT_LEVELS, DEFAULT_MAX_COLORS, DEFAULT_MAX_SIZE, DEFAULT_MIN_POINTS, DEFAULT_STRIDE,
    DEFAULT_THRESHOLD,
};
use pixtrace::{DecodeOptions, ExternalTraceOptions, SampleConfig, TraceMode};

/// Environment variable consulted for the default stride.
pub const ENV_STRIDE: &str = "PIXTRACE_STRIDE";

/// Command line interface definition.
#[derive(Parser, Debug)]
#[command(author, version, about, propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug)]
pub struct GlobalOptions {
    /// Scale images down so their longest side is at most this many pixels
    #[arg(long = "max-size", default_value_t = DEFAULT_MAX_SIZE, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_size: u32,
    /// Trace images at their original size
    #[arg(long = "no-resize", conflicts_with = "max_size")]
    pub no_resize: bool,
    /// Filter used when scaling images down
    #[arg(long = "resample-filter", value_enum, default_value_t = ResampleFilter::Triangle)]
    pub resample_filter: ResampleFilter,
}

impl From<&GlobalOptions> for DecodeOptions {
    fn from(global: &GlobalOptions) -> Self {
        let max_size = if global.no_resize {
            None
        } else {
            Some(global.max_size)
        };
        DecodeOptions::default()
            .with_max_size(max_size)
            .with_resize_filter(global.resample_filter.into())
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Trace one or more images into SVG documents
    Trace(TraceCommand),
}

/// Resampling filters for image resizing.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ResampleFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<ResampleFilter> for FilterType {
    /// Convert ResampleFilter to image::imageops::FilterType.
    fn from(value: ResampleFilter) -> Self {
        match value {
            ResampleFilter::Nearest => FilterType::Nearest,
            ResampleFilter::Triangle => FilterType::Triangle,
            ResampleFilter::CatmullRom => FilterType::CatmullRom,
            ResampleFilter::Gaussian => FilterType::Gaussian,
            ResampleFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

#[derive(Args, Debug)]
pub struct TraceCommand {
    /// Input image paths
    #[arg(required = true, num_args = 1..)]
    pub inputs: Vec<PathBuf>,
    /// Output path, only valid with a single input (defaults to input name with `.svg`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Write to standard output instead of a file
    #[arg(long, conflicts_with = "output")]
    pub stdout: bool,
    /// Emit a base64 `data:` URI instead of the raw document
    #[arg(long = "data-uri")]
    pub data_uri: bool,
    /// Fail when the trace produces no shapes
    #[arg(long = "require-shapes")]
    pub require_shapes: bool,
    #[command(flatten)]
    pub sampling: SamplingArgs,
    #[command(flatten)]
    pub external: ExternalArgs,
}

/// Tracing strategies.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ModeArg {
    /// Posterized square cells
    Grid,
    /// Dark pixels grouped into one path per color
    Threshold,
    /// Delegate to the external vectorizer
    Polyline,
}

impl From<ModeArg> for TraceMode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Grid => TraceMode::Grid,
            ModeArg::Threshold => TraceMode::Threshold,
            ModeArg::Polyline => TraceMode::Polyline,
        }
    }
}

#[derive(Args, Debug)]
pub struct SamplingArgs {
    /// Tracing strategy
    #[arg(long, value_enum, default_value_t = ModeArg::Grid)]
    pub mode: ModeArg,
    /// Sampling step in pixels
    #[arg(long, env = ENV_STRIDE, default_value_t = DEFAULT_STRIDE, value_parser = clap::value_parser!(u32).range(1..))]
    pub stride: u32,
    /// Posterization levels per channel in grid mode
    #[arg(long, default_value_t = DEFAULT_LEVELS, value_parser = clap::value_parser!(u16).range(1..=256))]
    pub levels: u16,
    /// Luma threshold for threshold mode (0-255 or 0.0-1.0)
    #[arg(long, default_value_t = DEFAULT_THRESHOLD, value_parser = parse_threshold)]
    pub threshold: u8,
    /// Maximum number of colors kept in threshold mode
    #[arg(long = "max-colors", default_value_t = DEFAULT_MAX_COLORS)]
    pub max_colors: usize,
    /// Minimum samples a color needs to be drawn in threshold mode
    #[arg(long = "min-points", default_value_t = DEFAULT_MIN_POINTS)]
    pub min_points: usize,
    /// Overlay faint horizontal scanlines
    #[arg(long)]
    pub decorate: bool,
}

#[derive(Args, Debug)]
pub struct ExternalArgs {
    /// Palette size for the external vectorizer
    #[arg(long = "color-count", default_value_t = ExternalTraceOptions::default().color_count)]
    pub color_count: usize,
    /// Blur radius applied before external tracing
    #[arg(long = "blur-radius", default_value_t = 0)]
    pub blur_radius: u32,
    /// Straight segment error threshold
    #[arg(long = "line-threshold", default_value_t = 1.0)]
    pub line_threshold: f64,
    /// Curved segment error threshold, 0 traces polygons only
    #[arg(long = "curve-threshold", default_value_t = 1.0)]
    pub curve_threshold: f64,
    /// Drop paths smaller than this many pixels
    #[arg(long = "path-omit", default_value_t = 8)]
    pub path_omit_threshold: usize,
}

impl From<&ExternalArgs> for ExternalTraceOptions {
    fn from(args: &ExternalArgs) -> Self {
        Self {
            color_count: args.color_count,
            blur_radius: args.blur_radius,
            line_threshold: args.line_threshold,
            curve_threshold: args.curve_threshold,
            path_omit_threshold: args.path_omit_threshold,
        }
    }
}

impl TraceCommand {
    /// Build the per-request configuration from the parsed flags.
    pub fn sample_config(&self) -> SampleConfig {
        let s = &self.sampling;
        SampleConfig::new(s.mode.into())
            .with_stride(s.stride)
            .with_levels(s.levels)
            .with_threshold(s.threshold)
            .with_max_colors(s.max_colors)
            .with_min_points(s.min_points)
            .with_decorate(s.decorate)
            .with_external((&self.external).into())
    }
}

fn parse_threshold(value: &str) -> Result<u8, String> {
    if let Ok(int_value) = value.parse::<u8>() {
        return Ok(int_value);
    }

    let float_value = value
        .parse::<f32>()
        .map_err(|_| format!("threshold must be numeric (0-255 or 0.0-1.0), got `{value}`"))?;

    if (0.0..=1.0).contains(&float_value) {
        let scaled = (float_value * 255.0).round() as i32;
        return Ok(scaled.clamp(0, 255) as u8);
    }

    if float_value.fract().abs() <= f32::EPSILON && (0.0..=255.0).contains(&float_value) {
        return Ok(float_value as u8);
    }

    Err(format!(
        "threshold {value} is out of range; expected 0-255 or 0.0-1.0"
    ))
}
