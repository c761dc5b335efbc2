//! p2f Pipeline
//!
//! Batch processing for PDF renaming: a concurrency-bounded pass that
//! extracts and renames every file, followed by an interactive pass that
//! grows the taxonomy.
//!
//! # Overview
//!
//! - **Item Processor**: format check, extraction, membership check and
//!   rename for one file
//! - **Batch Scheduler**: runs the processor over a file set with a
//!   concurrency cap; a failing file never affects the others
//! - **Reconciliation Session**: asks the operator about each
//!   de-duplicated unregistered candidate and appends the answers
//!
//! # Two phases
//!
//! ```text
//! files ─► BatchScheduler ─► ItemProcessor × N ─► BatchResult
//!                                                    │
//!            Taxonomy ◄── ReconciliationSession ◄────┘
//! ```
//!
//! The batch phase shares the taxonomy read-only behind an `Arc`. The
//! reconciliation phase takes it back by value once every file is done, so
//! the taxonomy files are never read and written at the same time.
//!
//! # Usage
//!
//! ```no_run
//! use p2f_pipeline::{BatchScheduler, ItemProcessor, PipelineConfig, ReconciliationSession};
//! # use p2f_domain::{ExtractedFields, ExtractionGateway, Prompter};
//! # use p2f_naming::FileNameTemplate;
//! # use p2f_taxonomy::Taxonomy;
//! # use std::path::{Path, PathBuf};
//! # use std::sync::Arc;
//! # struct Gateway;
//! # impl ExtractionGateway for Gateway {
//! #     type Error = String;
//! #     async fn extract(&self, _: &Path) -> Result<ExtractedFields, String> { Err("".into()) }
//! # }
//! # struct Stdin;
//! # impl Prompter for Stdin {
//! #     type Error = String;
//! #     fn ask(&mut self, _: &str) -> Result<String, String> { Ok(String::new()) }
//! # }
//! # async fn example(files: Vec<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
//! let taxonomy = Arc::new(Taxonomy::load("trading_partners.csv", "document_type.csv")?);
//! let template = Arc::new(FileNameTemplate::parse("{date}_{partner}_{documentType}_{amount}.pdf")?);
//!
//! let processor = ItemProcessor::new(Gateway, Arc::clone(&taxonomy), template);
//! let scheduler = BatchScheduler::new(processor, &PipelineConfig::default())?;
//! let result = scheduler.run(files).await?;
//! println!("{}", result.metrics().summary());
//!
//! // Every task has finished, so the taxonomy is no longer shared
//! drop(scheduler);
//! let mut taxonomy = Arc::unwrap_or_clone(taxonomy);
//! let report = ReconciliationSession::new(&mut taxonomy, &mut Stdin).run(result.unregistered())?;
//! println!("{} entries added", report.added.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod discovery;
mod error;
mod metrics;
mod outcome;
mod processor;
mod reconcile;
mod scheduler;

pub use config::{PipelineConfig, DEFAULT_CONCURRENCY_LIMIT};
pub use discovery::{discover_pdfs, is_pdf, FileSet};
pub use error::{ItemError, PipelineError};
pub use metrics::BatchMetrics;
pub use outcome::{BatchResult, ItemOutcome, ItemReport};
pub use processor::ItemProcessor;
pub use reconcile::{
    question, AddedEntry, Decision, FailedEntry, ReconciliationReport, ReconciliationSession,
    AFFIRMATIVE_TOKENS,
};
pub use scheduler::{BatchScheduler, NoProgress, ProgressObserver};
