use std::fs;
use std::path::{Path, PathBuf};

use pixtrace::{PixtraceResult, TraceResult};

/// Derive a variant file path by appending a suffix before the extension.
pub fn derive_variant_path(input: &Path, suffix: &str, extension: &str) -> PathBuf {
    let mut derived = input.to_path_buf();
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| suffix.to_string());
    let filename = format!("{}-{}.{}", stem, suffix, extension);
    derived.set_file_name(filename);
    derived
}

/// Derive an SVG file path by changing the extension to "svg".
pub fn derive_svg_path(input: &Path) -> PathBuf {
    let mut path = input.to_path_buf();
    path.set_extension("svg");
    path
}

/// Where the result for `input` goes when no explicit output was given.
pub fn default_output_path(input: &Path, data_uri: bool) -> PathBuf {
    if data_uri {
        derive_variant_path(input, "datauri", "txt")
    } else {
        derive_svg_path(input)
    }
}

/// Render the result as the document itself or as a data URI.
pub fn render(result: &TraceResult, data_uri: bool) -> String {
    if data_uri {
        result.to_data_uri()
    } else {
        result.svg().to_string()
    }
}

/// Write the rendered result either to `path` or to standard output.
pub fn deliver(contents: &str, path: Option<&Path>) -> PixtraceResult<()> {
    match path {
        Some(path) => {
            fs::write(path, contents)?;
            println!("Saved to {}", path.display());
        }
        None => println!("{contents}"),
    }
    Ok(())
}
