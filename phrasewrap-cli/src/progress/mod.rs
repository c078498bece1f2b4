//! Progress reporting module

use indicatif::{ProgressBar, ProgressStyle};
use phrasewrap_core::ApplyReport;
use std::time::Duration;

/// Progress reporter for file processing
pub struct ProgressReporter {
    progress_bar: Option<ProgressBar>,
    quiet: bool,
    totals: ApplyReport,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new(quiet: bool) -> Self {
        Self {
            progress_bar: None,
            quiet,
            totals: ApplyReport::default(),
        }
    }

    /// Initialize progress bar for file processing
    pub fn init_files(&mut self, total_files: u64) {
        if self.quiet || total_files < 2 {
            return;
        }

        let pb = ProgressBar::new(total_files);
        match ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} files {msg}")
        {
            Ok(style) => pb.set_style(style.progress_chars("##-")),
            Err(e) => log::debug!("Falling back to the default progress style: {e}"),
        }
        pb.enable_steady_tick(Duration::from_millis(100));

        self.progress_bar = Some(pb);
    }

    /// Update progress for a completed file
    pub fn file_completed(&mut self, filename: &str, report: &ApplyReport) {
        self.totals.blocks += report.blocks;
        self.totals.split += report.split;
        self.totals.unchanged += report.unchanged;
        self.totals.failed += report.failed;

        if let Some(pb) = &self.progress_bar {
            pb.set_message(format!("Processed: {filename}"));
            pb.inc(1);
        }
    }

    /// Block counts over every completed file
    pub fn totals(&self) -> &ApplyReport {
        &self.totals
    }

    /// Finish progress reporting
    pub fn finish(&self) {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message("Complete");
        }
        log::info!(
            "{} blocks, {} split, {} unchanged, {} failed",
            self.totals.blocks,
            self.totals.split,
            self.totals.unchanged,
            self.totals.failed
        );
    }
}
