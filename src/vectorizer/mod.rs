use crate::buffer::PixelBuffer;
use crate::config::ExternalTraceOptions;
use crate::{PixtraceResult, TraceError};

/// A third-party algorithm that turns a whole pixel buffer into an SVG document.
///
/// Used by polyline mode. Implementations are treated as a black box: the
/// pipeline only checks that the returned document is not empty.
pub trait ExternalVectorizer: Send + Sync {
    fn vectorize(
        &self,
        buffer: &PixelBuffer<'_>,
        options: &ExternalTraceOptions,
    ) -> PixtraceResult<String>;
}

/// Run `vectorizer` and reject an empty or whitespace-only document.
pub fn vectorize_checked<V>(
    vectorizer: &V,
    buffer: &PixelBuffer<'_>,
    options: &ExternalTraceOptions,
) -> PixtraceResult<String>
where
    V: ExternalVectorizer + ?Sized,
{
    let svg = vectorizer.vectorize(buffer, options).map_err(|err| match err {
        TraceError::ExternalService(_) => err,
        other => TraceError::ExternalService(other.to_string()),
    })?;
    if svg.trim().is_empty() {
        return Err(TraceError::ExternalService(
            "vectorizer returned an empty document".to_string(),
        ));
    }
    Ok(svg)
}

#[cfg(feature = "vectorizer-vtracer")]
pub mod vtracer;
