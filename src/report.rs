use pixtrace::TraceError;

pub fn report_error(err: &TraceError) {
    match err {
        TraceError::Decode(_) | TraceError::EmptyImage { .. } => {
            eprintln!("{err}");
            eprintln!();
            eprintln!("The input could not be read as an image.");
            eprintln!("Supported formats: PNG, JPEG, GIF, BMP, WebP and the other `image` defaults.");
        }
        TraceError::EmptyResult => {
            eprintln!("{err}");
            eprintln!();
            eprintln!("Try a higher --threshold, a smaller --stride, or a lower --min-points.");
        }
        _ => {
            eprintln!("{err}");
        }
    }
}
