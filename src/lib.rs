//! Raster to SVG tracing.
//!
//! A decoded RGBA buffer is sampled on a regular grid, each sample is
//! reduced to a small palette, samples are grouped into shapes, and the
//! shapes are written out as a standalone SVG document.
//!
//! ```
//! use image::{Rgba, RgbaImage};
//! use pixtrace::{PixelBuffer, SampleConfig, trace};
//!
//! let img = RgbaImage::from_pixel(16, 16, Rgba([255, 0, 0, 255]));
//! let result = trace(&PixelBuffer::from_image(&img), &SampleConfig::grid(8)).unwrap();
//! assert_eq!(result.shape_count(), 4);
//! assert!(result.svg().contains(r#"fill="rgb(224,0,0)""#));
//! ```

pub mod buffer;
pub mod collect;
pub mod color;
pub mod config;
pub mod decode;
pub mod error;
pub mod pipeline;
pub mod quantize;
pub mod sampler;
pub mod shape;
pub mod svg;
pub mod vectorizer;
pub mod worker;

pub use buffer::PixelBuffer;
pub use color::Color;
pub use config::{DecodeOptions, ExternalTraceOptions, SampleConfig, TraceMode};
pub use decode::{decode_bytes, decode_file};
pub use error::{PixtraceResult, TraceError};
pub use pipeline::{TraceResult, Tracer, trace, trace_with};
pub use shape::{Point, PolylineShape, RectShape, Shape};
pub use vectorizer::ExternalVectorizer;
#[cfg(feature = "vectorizer-vtracer")]
pub use vectorizer::vtracer::{VtracerVectorizer, trace_to_svg_string};
pub use worker::{InFlight, InFlightGuard, TraceJob, spawn_trace};
