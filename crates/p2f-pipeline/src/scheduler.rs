//! Concurrency-bounded batch execution

use crate::config::PipelineConfig;
use crate::error::{ItemError, PipelineError};
use crate::metrics::BatchMetrics;
use crate::outcome::{BatchResult, ItemReport};
use crate::processor::ItemProcessor;
use p2f_domain::ExtractionGateway;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

/// Receives progress events while a batch runs
///
/// Called from worker tasks, so implementations must be thread-safe.
pub trait ProgressObserver: Send + Sync {
    /// A file acquired a slot and is about to be processed
    fn on_start(&self, _index: usize, _path: &Path) {}

    /// A file reached a terminal state
    fn on_finish(&self, _report: &ItemReport) {}
}

/// Observer that ignores every event
pub struct NoProgress;

impl ProgressObserver for NoProgress {}

/// Runs an [`ItemProcessor`] over a file set with at most
/// `concurrency_limit` files in flight
///
/// Files start in input order. A failing or panicking file never affects
/// the others; every input file gets exactly one report.
pub struct BatchScheduler<G> {
    processor: Arc<ItemProcessor<G>>,
    semaphore: Arc<Semaphore>,
    limit: usize,
}

impl<G> BatchScheduler<G>
where
    G: ExtractionGateway + Send + Sync + 'static,
    G::Error: std::fmt::Display,
{
    /// Create a scheduler from a validated configuration
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Config`] for a zero concurrency limit.
    pub fn new(processor: ItemProcessor<G>, config: &PipelineConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self {
            processor: Arc::new(processor.with_skip_format_check(config.skip_format_check)),
            semaphore: Arc::new(Semaphore::new(config.concurrency_limit)),
            limit: config.concurrency_limit,
        })
    }

    /// Process every file without progress reporting
    pub async fn run(&self, files: Vec<PathBuf>) -> Result<BatchResult, PipelineError> {
        self.run_with_progress(files, Arc::new(NoProgress)).await
    }

    /// Process every file, reporting progress to `observer`
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Scheduler`] only if the worker pool itself
    /// breaks; per-file failures are part of the [`BatchResult`].
    pub async fn run_with_progress(
        &self,
        files: Vec<PathBuf>,
        observer: Arc<dyn ProgressObserver>,
    ) -> Result<BatchResult, PipelineError> {
        let started = Instant::now();
        let total = files.len();
        let mut tasks = JoinSet::new();
        let mut reports = Vec::with_capacity(total);
        let mut metrics = BatchMetrics::new();

        info!("Processing {} files (concurrency: {})", total, self.limit);

        for (index, path) in files.into_iter().enumerate() {
            // Wait for a free slot, collecting finished files meanwhile
            let permit = loop {
                tokio::select! {
                    biased;
                    Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                        record(joined, &mut reports, &mut metrics);
                    }
                    permit = Arc::clone(&self.semaphore).acquire_owned() => {
                        break permit.map_err(|e| PipelineError::Scheduler(e.to_string()))?;
                    }
                }
            };

            let processor = Arc::clone(&self.processor);
            let observer = Arc::clone(&observer);

            tasks.spawn(async move {
                let _permit = permit;
                observer.on_start(index, &path);
                debug!("Starting file {}/{}: {}", index + 1, total, path.display());

                // Run the work in its own task so a panic is caught here
                let work = {
                    let path = path.clone();
                    tokio::spawn(async move { processor.process(index, path).await })
                };
                let report = match work.await {
                    Ok(report) => report,
                    Err(e) => {
                        error!("Task for {} failed: {}", path.display(), e);
                        ItemReport::failed(index, path, ItemError::Task(e.to_string()))
                    }
                };

                observer.on_finish(&report);
                report
            });
        }

        while let Some(joined) = tasks.join_next().await {
            record(joined, &mut reports, &mut metrics);
        }

        metrics.elapsed = started.elapsed();

        info!(
            "Batch completed: {} renamed, {} unchanged, {} skipped, {} failed",
            metrics.renamed, metrics.unchanged, metrics.skipped, metrics.failed
        );

        Ok(BatchResult::new(reports, metrics))
    }
}

fn record(
    joined: Result<ItemReport, tokio::task::JoinError>,
    reports: &mut Vec<ItemReport>,
    metrics: &mut BatchMetrics,
) {
    match joined {
        Ok(report) => {
            metrics.record(&report.outcome);
            reports.push(report);
        }
        // Only reachable if an observer panics
        Err(e) => error!("Batch task failed: {}", e),
    }
}
