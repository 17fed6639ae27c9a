//! End-to-end tracing: validate, sample, collect, emit.
//!
//! The stages run strictly in that order and each consumes only the output
//! of the previous one. Nothing here keeps state between calls, so the same
//! buffer and config always produce the same document.

use std::fmt;
use std::sync::Arc;

use image::RgbaImage;
use log::{debug, warn};

use crate::buffer::PixelBuffer;
use crate::collect::collect;
use crate::config::{SampleConfig, TraceMode};
use crate::sampler::sample;
use crate::svg::{count_drawn_paths, emit, svg_root, to_data_uri, with_scanlines};
use crate::vectorizer::{ExternalVectorizer, vectorize_checked};
use crate::{PixtraceResult, TraceError};

/// The SVG document produced by one trace, plus the size it was traced at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceResult {
    svg: String,
    width: u32,
    height: u32,
    shape_count: usize,
}

impl TraceResult {
    /// Get the SVG document.
    pub fn svg(&self) -> &str {
        &self.svg
    }

    /// Consume the result and return the SVG document.
    pub fn into_svg(self) -> String {
        self.svg
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of drawn shapes, not counting decoration.
    pub fn shape_count(&self) -> usize {
        self.shape_count
    }

    /// Whether the document contains no shapes.
    pub fn is_empty(&self) -> bool {
        self.shape_count == 0
    }

    /// Turn an empty result into [`TraceError::EmptyResult`].
    ///
    /// The pipeline itself treats "nothing to draw" as a valid outcome; this
    /// is for callers that do not.
    pub fn require_shapes(self) -> PixtraceResult<Self> {
        if self.is_empty() {
            return Err(TraceError::EmptyResult);
        }
        Ok(self)
    }

    /// Encode the document as a base64 `data:` URI.
    pub fn to_data_uri(&self) -> String {
        to_data_uri(&self.svg)
    }
}

/// Entry point for configuring and running traces.
#[derive(Clone)]
pub struct Tracer {
    config: SampleConfig,
    /// Used only in [`TraceMode::Polyline`].
    vectorizer: Option<Arc<dyn ExternalVectorizer>>,
}

impl fmt::Debug for Tracer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracer")
            .field("config", &self.config)
            .field("has_vectorizer", &self.vectorizer.is_some())
            .finish()
    }
}

impl Default for Tracer {
    fn default() -> Self {
        Self::new(SampleConfig::default())
    }
}

impl Tracer {
    /// Create a tracer with the default external vectorizer, if one is compiled in.
    pub fn new(config: SampleConfig) -> Self {
        Self {
            config,
            vectorizer: default_vectorizer(),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: SampleConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the vectorizer used by polyline mode.
    pub fn with_vectorizer<V>(mut self, vectorizer: V) -> Self
    where
        V: ExternalVectorizer + 'static,
    {
        self.vectorizer = Some(Arc::new(vectorizer));
        self
    }

    /// Remove the vectorizer; polyline mode will then fail.
    pub fn without_vectorizer(mut self) -> Self {
        self.vectorizer = None;
        self
    }

    pub fn config(&self) -> &SampleConfig {
        &self.config
    }

    /// Trace a pixel buffer on the calling thread.
    pub fn trace(&self, buffer: &PixelBuffer<'_>) -> PixtraceResult<TraceResult> {
        trace_with(buffer, &self.config, self.vectorizer.as_deref())
    }

    /// Trace an owned image on the calling thread.
    pub fn trace_image(&self, image: &RgbaImage) -> PixtraceResult<TraceResult> {
        self.trace(&PixelBuffer::from_image(image))
    }
}

#[cfg(feature = "vectorizer-vtracer")]
fn default_vectorizer() -> Option<Arc<dyn ExternalVectorizer>> {
    Some(Arc::new(crate::vectorizer::vtracer::VtracerVectorizer))
}

#[cfg(not(feature = "vectorizer-vtracer"))]
fn default_vectorizer() -> Option<Arc<dyn ExternalVectorizer>> {
    None
}

/// Trace `buffer` with `config` and the default vectorizer.
pub fn trace(buffer: &PixelBuffer<'_>, config: &SampleConfig) -> PixtraceResult<TraceResult> {
    trace_with(buffer, config, default_vectorizer().as_deref())
}

/// Trace `buffer` with `config`, delegating polyline mode to `vectorizer`.
pub fn trace_with(
    buffer: &PixelBuffer<'_>,
    config: &SampleConfig,
    vectorizer: Option<&dyn ExternalVectorizer>,
) -> PixtraceResult<TraceResult> {
    buffer.ensure_non_empty()?;
    config.validate()?;

    let (width, height) = buffer.dimensions();
    if config.stride >= width && config.stride >= height && (width, height) != (1, 1) {
        warn!(
            "stride {} exceeds the {}x{} image; only one sample will be taken",
            config.stride, width, height
        );
    }

    if config.mode == TraceMode::Polyline {
        let vectorizer = vectorizer.ok_or_else(|| {
            TraceError::ExternalService("no external vectorizer is configured".to_string())
        })?;
        let doc = vectorize_checked(vectorizer, buffer, &config.external)?;
        let root = svg_root(&doc).ok_or_else(|| {
            TraceError::ExternalService("output has no <svg> root element".to_string())
        })?;
        let svg = if config.decorate {
            with_scanlines(root, width, height)
        } else {
            root.to_string()
        };
        let shape_count = count_drawn_paths(&svg);
        debug!("external vectorizer returned {shape_count} paths");
        return Ok(TraceResult {
            svg,
            width,
            height,
            shape_count,
        });
    }

    let shapes = collect(sample(*buffer, config.stride), config, width, height);
    debug!(
        "{:?} trace of {}x{} at stride {}: {} shapes",
        config.mode,
        width,
        height,
        config.stride,
        shapes.len()
    );
    let svg = emit(&shapes, width, height, config.decorate);

    Ok(TraceResult {
        svg,
        width,
        height,
        shape_count: shapes.len(),
    })
}
