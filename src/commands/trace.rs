use std::path::{Path, PathBuf};

use log::{error, info};
use pixtrace::{DecodeOptions, PixtraceResult, TraceError, TraceResult, Tracer, decode_file};

use crate::cli::{GlobalOptions, TraceCommand};

use super::utils::{default_output_path, deliver, render};

/// The main function to run the trace command.
pub fn run(global: &GlobalOptions, cmd: TraceCommand) -> PixtraceResult<()> {
    if cmd.output.is_some() && cmd.inputs.len() > 1 {
        return Err(TraceError::InvalidInput(
            "--output can only be used with a single input".to_string(),
        ));
    }

    let decode_options: DecodeOptions = global.into();
    let config = cmd.sample_config();
    config.validate()?;
    let tracer = Tracer::new(config);

    if let [input] = cmd.inputs.as_slice() {
        let result = trace_file(&tracer, input, &decode_options)?;
        return finish(&cmd, input.clone(), cmd.output.clone(), result);
    }

    let results = trace_all(&tracer, &cmd.inputs, &decode_options);

    // Every input gets its output written even when another one fails.
    let mut failure = None;
    for (input, result) in cmd.inputs.iter().zip(results) {
        if let Err(err) = result.and_then(|result| finish(&cmd, input.clone(), None, result)) {
            error!("{}: {err}", input.display());
            if failure.is_none() {
                failure = Some(err);
            }
        }
    }

    failure.map_or(Ok(()), Err)
}

fn trace_file(
    tracer: &Tracer,
    input: &Path,
    decode_options: &DecodeOptions,
) -> PixtraceResult<TraceResult> {
    let image = decode_file(input, decode_options)?;
    tracer.trace_image(&image)
}

/// Decode and trace every input on the rayon pool, one task per input.
/// Results come back in input order.
fn trace_all(
    tracer: &Tracer,
    inputs: &[PathBuf],
    decode_options: &DecodeOptions,
) -> Vec<PixtraceResult<TraceResult>> {
    use rayon::prelude::*;

    info!("tracing {} images in parallel", inputs.len());
    inputs
        .par_iter()
        .map(|input| trace_file(tracer, input, decode_options))
        .collect()
}

/// Apply output options and deliver a single result.
fn finish(
    cmd: &TraceCommand,
    input: PathBuf,
    output: Option<PathBuf>,
    result: TraceResult,
) -> PixtraceResult<()> {
    let result = if cmd.require_shapes {
        result.require_shapes()?
    } else {
        result
    };
    info!(
        "{}: {} shapes at {}x{}",
        input.display(),
        result.shape_count(),
        result.width(),
        result.height()
    );

    let contents = render(&result, cmd.data_uri);
    if cmd.stdout {
        return deliver(&contents, None);
    }
    let path = output.unwrap_or_else(|| default_output_path(&input, cmd.data_uri));
    deliver(&contents, Some(&path))
}
