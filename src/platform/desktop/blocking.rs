use std::time::Instant;

use tracing::debug;

/// Runs a UI task to completion on the calling thread, inside a span named
/// after the task.
pub fn run_blocking<F, T>(task: &str, f: F) -> T
where
    F: FnOnce() -> T,
{
    let span = tracing::debug_span!("ui_task", task);
    let _entered = span.enter();
    let started = Instant::now();
    let out = f();
    debug!(elapsed_ms = started.elapsed().as_millis() as u64, "ui task finished");
    out
}
