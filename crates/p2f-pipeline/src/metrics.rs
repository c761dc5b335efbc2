//! Metrics collection for batch runs

use crate::outcome::ItemOutcome;
use std::time::Duration;

/// Counters collected while a batch runs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchMetrics {
    /// Files that reached a terminal state
    pub processed: usize,

    /// Files moved to a new name
    pub renamed: usize,

    /// Files whose rendered name equals their current one
    pub unchanged: usize,

    /// Files skipped because they were already formatted
    pub skipped: usize,

    /// Files that failed
    pub failed: usize,

    /// Wall-clock time of the batch
    pub elapsed: Duration,
}

impl BatchMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a terminal outcome
    pub fn record(&mut self, outcome: &ItemOutcome) {
        self.processed += 1;
        match outcome {
            ItemOutcome::Renamed { .. } => self.renamed += 1,
            ItemOutcome::Unchanged => self.unchanged += 1,
            ItemOutcome::SkippedAlreadyFormatted => self.skipped += 1,
            ItemOutcome::Failed(_) => self.failed += 1,
        }
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        [
            format!("Processed: {}", self.processed),
            format!("Renamed: {}", self.renamed),
            format!("Unchanged: {}", self.unchanged),
            format!("Skipped (already formatted): {}", self.skipped),
            format!("Failed: {}", self.failed),
            format!("Elapsed: {:.1}s", self.elapsed.as_secs_f64()),
        ]
        .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ItemError;
    use std::path::PathBuf;

    #[test]
    fn test_record_counts_each_outcome() {
        let mut metrics = BatchMetrics::new();
        metrics.record(&ItemOutcome::Renamed {
            to: PathBuf::from("a.pdf"),
        });
        metrics.record(&ItemOutcome::Unchanged);
        metrics.record(&ItemOutcome::SkippedAlreadyFormatted);
        metrics.record(&ItemOutcome::Failed(ItemError::Extraction("boom".into())));
        metrics.record(&ItemOutcome::Failed(ItemError::Task("panic".into())));

        assert_eq!(metrics.processed, 5);
        assert_eq!(metrics.renamed, 1);
        assert_eq!(metrics.unchanged, 1);
        assert_eq!(metrics.skipped, 1);
        assert_eq!(metrics.failed, 2);
    }

    #[test]
    fn test_summary() {
        let metrics = BatchMetrics {
            processed: 3,
            renamed: 2,
            unchanged: 0,
            skipped: 0,
            failed: 1,
            elapsed: Duration::from_millis(1500),
        };
        let summary = metrics.summary();
        assert!(summary.contains("Processed: 3"));
        assert!(summary.contains("Unchanged: 0"));
        assert!(summary.contains("Failed: 1"));
        assert!(summary.contains("Elapsed: 1.5s"));
    }
}
