//! Per-file reports and the batch result

use crate::error::ItemError;
use crate::metrics::BatchMetrics;
use p2f_domain::{ExtractedFields, UnregisteredCandidate, UnregisteredList};
use std::path::{Path, PathBuf};

/// Terminal state of one file
#[derive(Debug)]
pub enum ItemOutcome {
    /// File now lives at `to`
    Renamed {
        /// New path
        to: PathBuf,
    },

    /// Extraction rendered the name the file already has; nothing moved
    Unchanged,

    /// Name already follows the template; nothing was done
    SkippedAlreadyFormatted,

    /// Extraction or rename failed
    Failed(ItemError),
}

impl ItemOutcome {
    /// Short label for summaries
    pub fn status(&self) -> &'static str {
        match self {
            ItemOutcome::Renamed { .. } => "renamed",
            ItemOutcome::Unchanged => "unchanged",
            ItemOutcome::SkippedAlreadyFormatted => "skipped",
            ItemOutcome::Failed(_) => "failed",
        }
    }

    /// True for `Renamed`
    pub fn is_renamed(&self) -> bool {
        matches!(self, ItemOutcome::Renamed { .. })
    }

    /// True for `Failed`
    pub fn is_failed(&self) -> bool {
        matches!(self, ItemOutcome::Failed(_))
    }
}

/// What happened to one input file
#[derive(Debug)]
pub struct ItemReport {
    /// Position in the input list
    pub index: usize,

    /// Original path
    pub path: PathBuf,

    /// Fields returned by the extraction gateway, if it succeeded
    pub fields: Option<ExtractedFields>,

    /// Terminal state
    pub outcome: ItemOutcome,

    /// Values not found in the taxonomy; `None` if extraction never ran or
    /// failed
    pub unregistered: Option<UnregisteredCandidate>,
}

impl ItemReport {
    /// Report for a file that failed before extraction produced anything
    pub fn failed(index: usize, path: PathBuf, error: ItemError) -> Self {
        Self {
            index,
            path,
            fields: None,
            outcome: ItemOutcome::Failed(error),
            unregistered: None,
        }
    }

    /// Final component of the original path
    pub fn file_name(&self) -> String {
        display_name(&self.path)
    }
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Everything a batch produced
///
/// Built once when the last file finishes and never mutated afterwards.
#[derive(Debug)]
pub struct BatchResult {
    reports: Vec<ItemReport>,
    unregistered: UnregisteredList,
    metrics: BatchMetrics,
}

impl BatchResult {
    /// Assemble a result from reports in completion order
    ///
    /// Candidates are collected in input order, so the list is the same
    /// whatever order the files finished in.
    pub fn new(reports: Vec<ItemReport>, metrics: BatchMetrics) -> Self {
        let mut by_index: Vec<&ItemReport> = reports.iter().collect();
        by_index.sort_by_key(|r| r.index);

        let mut unregistered = UnregisteredList::new();
        for candidate in by_index.iter().filter_map(|r| r.unregistered.as_ref()) {
            unregistered.extend_from(candidate);
        }

        Self {
            reports,
            unregistered,
            metrics,
        }
    }

    /// Reports in completion order
    pub fn reports(&self) -> &[ItemReport] {
        &self.reports
    }

    /// De-duplicated unregistered candidates across the batch
    pub fn unregistered(&self) -> &UnregisteredList {
        &self.unregistered
    }

    /// Counters and timing
    pub fn metrics(&self) -> &BatchMetrics {
        &self.metrics
    }

    /// Reports of failed files, in input order
    pub fn failures(&self) -> Vec<&ItemReport> {
        let mut failed: Vec<&ItemReport> =
            self.reports.iter().filter(|r| r.outcome.is_failed()).collect();
        failed.sort_by_key(|r| r.index);
        failed
    }

    /// Number of files in the batch
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    /// True if the batch had no files
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}
