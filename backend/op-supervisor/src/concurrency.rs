//! Worker count resolution.

use op_config::WorkerSetting;

use std::io;

use log::{debug, warn};

/// Logical CPUs available to this process.
pub fn host_parallelism() -> io::Result<usize> {
    std::thread::available_parallelism().map(usize::from)
}

/// Resolve the value of the server's `--workers` flag.
///
/// Explicit settings pass through as configured, text unchanged. `Auto`
/// uses the detected parallelism with a floor of one; a failed detection
/// is logged and also yields one.
pub fn resolve_workers<F>(setting: &WorkerSetting, detect: F) -> String
where
    F: FnOnce() -> io::Result<usize>,
{
    match setting {
        WorkerSetting::Explicit(count) => count.clone(),
        WorkerSetting::Auto => match detect() {
            Ok(detected) => {
                let workers = detected.max(1);
                debug!("Detected {detected} logical CPUs, using {workers} workers");
                workers.to_string()
            }
            Err(e) => {
                warn!("Could not detect host parallelism ({e}), using 1 worker");
                String::from("1")
            }
        },
    }
}
