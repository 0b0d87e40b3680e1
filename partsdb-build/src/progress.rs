//! Build progress reporting.

/// Trait for receiving pipeline progress updates.
pub trait GenerateProgress {
    /// Called when a phase starts (e.g., "Populating categories").
    fn on_phase(&self, message: &str);

    /// Called after each batch is written.
    fn on_batch(&self, loaded: u64, total: u64);

    /// Called when the build is complete.
    fn on_complete(&self, message: &str);
}

/// A no-op progress reporter that discards all updates.
pub struct SilentProgress;

impl GenerateProgress for SilentProgress {
    fn on_phase(&self, _message: &str) {}
    fn on_batch(&self, _loaded: u64, _total: u64) {}
    fn on_complete(&self, _message: &str) {}
}

/// A progress reporter that logs to the `log` crate.
pub struct LogProgress;

impl GenerateProgress for LogProgress {
    fn on_phase(&self, message: &str) {
        log::info!("{}", message);
    }

    fn on_batch(&self, loaded: u64, total: u64) {
        log::info!("  [{}/{}] parts loaded", loaded, total);
    }

    fn on_complete(&self, message: &str) {
        log::info!("{}", message);
    }
}
