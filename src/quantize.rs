use crate::color::Color;
use crate::config::{SampleConfig, TraceMode};

/// Round a channel down to the start of its bucket.
pub fn posterize_channel(value: u8, bucket_width: u16) -> u8 {
    let bucket = bucket_width.max(1);
    // value < 256, so the result never exceeds value
    ((u16::from(value) / bucket) * bucket) as u8
}

/// Posterize every channel of `color` to `levels` steps.
pub fn posterize(color: Color, levels: u16) -> Color {
    let bucket = 256 / levels.max(1);
    Color::new(
        posterize_channel(color.r, bucket),
        posterize_channel(color.g, bucket),
        posterize_channel(color.b, bucket),
    )
}

/// Keep `color` unchanged if its luma is below `threshold`, drop it otherwise.
pub fn threshold_filter(color: Color, threshold: u8) -> Option<Color> {
    color.is_darker_than(threshold).then_some(color)
}

/// Map a sampled color to its palette entry for the configured mode.
///
/// `None` means the sample is background and must not produce a shape.
/// Polyline mode passes colors through untouched; its palette is chosen by
/// the external vectorizer.
pub fn quantize(color: Color, config: &SampleConfig) -> Option<Color> {
    match config.mode {
        TraceMode::Grid => Some(posterize(color, config.levels)),
        TraceMode::Threshold => threshold_filter(color, config.threshold),
        TraceMode::Polyline => Some(color),
    }
}
