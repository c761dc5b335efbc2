//! Progress bar for the batch phase.

use indicatif::{ProgressBar, ProgressStyle};
use p2f_pipeline::{ItemOutcome, ItemReport, ProgressObserver};
use std::path::Path;

const TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";

/// Shows one bar for the whole batch and a line per failed file.
pub struct BarObserver {
    bar: ProgressBar,
}

impl BarObserver {
    /// Bar for `total` files.
    pub fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::default_bar()
            .template(TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        bar.set_style(style);
        Self { bar }
    }

    /// Observer that draws nothing, for machine-readable output.
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Remove the bar once the batch is over.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressObserver for BarObserver {
    fn on_start(&self, _index: usize, path: &Path) {
        if let Some(name) = path.file_name() {
            self.bar.set_message(format!("processing {}", name.to_string_lossy()));
        }
    }

    fn on_finish(&self, report: &ItemReport) {
        if let ItemOutcome::Failed(e) = &report.outcome {
            self.bar.println(format!("failed: {} ({})", report.file_name(), e));
        }
        self.bar.inc(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use p2f_pipeline::ItemError;
    use std::path::PathBuf;

    #[test]
    fn test_counts_finished_files() {
        let observer = BarObserver::hidden();
        observer.bar.set_length(2);
        observer.on_start(0, Path::new("/scans/a.pdf"));
        observer.on_finish(&ItemReport::failed(
            0,
            PathBuf::from("/scans/a.pdf"),
            ItemError::Extraction("bad response".into()),
        ));
        assert_eq!(observer.bar.position(), 1);
    }
}
