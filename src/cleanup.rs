//! Deferred deletion of per-request temporary files.
//!
//! Each request collects every temporary file it creates into a
//! [`CleanupList`] and schedules deletion once the response payload no longer
//! needs them. Deletion failures are logged, never surfaced to the caller.
//! Paths that drop before being registered (error paths) are still removed by
//! `TempPath`'s own destructor.

use log::{debug, error};
use tempfile::TempPath;

#[derive(Default)]
pub struct CleanupList {
    paths: Vec<TempPath>,
}

impl CleanupList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a temporary file whose contents have been fully
    /// consumed, to be deleted when the list is scheduled.
    pub fn register(&mut self, path: TempPath) {
        self.paths.push(path);
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Delete all registered files on the blocking pool without holding up
    /// the response.
    pub fn schedule(self) {
        if self.paths.is_empty() {
            return;
        }
        tokio::task::spawn_blocking(move || {
            for path in self.paths {
                let display = path.display().to_string();
                match path.close() {
                    Ok(()) => debug!("Cleaned up temporary file: {display}"),
                    Err(e) => error!("Error cleaning up file {display}: {e}"),
                }
            }
        });
    }
}
