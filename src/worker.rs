//! Off-thread tracing.
//!
//! A job owns its image and tracer outright; nothing is shared with the
//! caller while it runs, and it delivers exactly one result. Jobs cannot be
//! cancelled. Dropping a [`TraceJob`] detaches the thread and discards its
//! result.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use image::RgbaImage;
use log::debug;

use crate::pipeline::{TraceResult, Tracer};
use crate::{PixtraceResult, TraceError};

/// Handle to a trace running on its own thread.
#[derive(Debug)]
pub struct TraceJob {
    handle: JoinHandle<PixtraceResult<TraceResult>>,
}

impl TraceJob {
    /// Whether the worker has finished and [`TraceJob::wait`] will not block.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Block until the worker delivers its result.
    pub fn wait(self) -> PixtraceResult<TraceResult> {
        self.handle
            .join()
            .map_err(|payload| TraceError::Worker(panic_message(payload.as_ref())))?
    }
}

/// Move `image` and `tracer` onto a new thread and trace there.
pub fn spawn_trace(tracer: Tracer, image: RgbaImage) -> PixtraceResult<TraceJob> {
    let (w, h) = image.dimensions();
    let handle = thread::Builder::new()
        .name("pixtrace-worker".to_string())
        .spawn(move || {
            debug!("worker tracing {w}x{h} image");
            tracer.trace_image(&image)
        })?;
    Ok(TraceJob { handle })
}

impl Tracer {
    /// Trace an owned image on a worker thread.
    pub fn spawn(&self, image: RgbaImage) -> PixtraceResult<TraceJob> {
        spawn_trace(self.clone(), image)
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "worker panicked".to_string()
    }
}

/// Flag for callers that allow at most one trace at a time.
///
/// The core never consults it; it only makes the check-and-set atomic.
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    busy: Arc<AtomicBool>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Mark a trace as started, or return `None` if one is already running.
    pub fn try_begin(&self) -> Option<InFlightGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard {
                busy: Arc::clone(&self.busy),
            })
    }
}

/// Clears the [`InFlight`] flag when dropped.
#[derive(Debug)]
pub struct InFlightGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
