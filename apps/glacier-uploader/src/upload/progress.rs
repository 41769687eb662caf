//! Progress reporting
//!
//! One unit per uploaded part.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

const PB_STYLE: &str =
    "{spinner:.blue} [{elapsed_precise}] {wide_bar:.cyan/blue} {pos}/{len} parts ({eta})";

const PB_CHARS: &str = "█▓▒░  ";

/// Sink for per-part progress
pub trait UploadProgress: Send + Sync {
    /// Called once the transaction is open and the part count is known
    fn start(&self, total_parts: u64);

    /// Called after each part is accepted
    fn advance(&self);

    /// Called on every terminal path
    fn finish(&self);
}

/// Terminal progress bar
pub struct ProgressTracker {
    pb: ProgressBar,
}

impl ProgressTracker {
    pub fn new() -> Self {
        let pb = ProgressBar::hidden();
        if let Ok(style) = ProgressStyle::with_template(PB_STYLE) {
            pb.set_style(style.progress_chars(PB_CHARS));
        }
        Self { pb }
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadProgress for ProgressTracker {
    fn start(&self, total_parts: u64) {
        self.pb.set_length(total_parts);
        self.pb.set_draw_target(ProgressDrawTarget::stderr());
    }

    fn advance(&self) {
        self.pb.inc(1);
    }

    fn finish(&self) {
        self.pb.finish();
    }
}

/// Progress sink that draws nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl UploadProgress for NoProgress {
    fn start(&self, _total_parts: u64) {}

    fn advance(&self) {}

    fn finish(&self) {}
}
