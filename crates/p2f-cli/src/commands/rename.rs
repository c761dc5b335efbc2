//! Rename command implementation.

use crate::config::{OutputFormat, RunConfig};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::progress::BarObserver;
use crate::prompt::{confirm, is_affirmative};
use p2f_domain::{ExtractionGateway, Prompter};
use p2f_extractor::PdfExtractor;
use p2f_llm::OpenAiProvider;
use p2f_naming::FileNameTemplate;
use p2f_pipeline::{
    discover_pdfs, is_pdf, BatchResult, BatchScheduler, ItemProcessor, PipelineConfig,
    ReconciliationReport, ReconciliationSession,
};
use p2f_taxonomy::Taxonomy;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

const COMPANY_NAME_QUESTION: &str = "my_company.name is not set. Setting it keeps your own \
     company from being taken for the trading partner on your documents.\n\
     Abort? [y/n] ";

const DIRECTORY_QUESTION: &str = "A directory was given. Rename the PDF files in it? [y/n] ";

/// What a rename run did.
#[derive(Debug)]
pub struct RenameSummary {
    /// Batch phase
    pub batch: BatchResult,
    /// Reconciliation phase
    pub reconciliation: ReconciliationReport,
}

/// Execute the rename command.
pub async fn execute_rename<P>(
    path: &Path,
    config: &RunConfig,
    formatter: &Formatter,
    prompter: &mut P,
) -> Result<()>
where
    P: Prompter<Error = CliError>,
{
    let template = FileNameTemplate::parse(&config.file_name_format)?;
    let taxonomy = Taxonomy::load(&config.trading_partner_file, &config.document_type_file)?;
    debug!(
        "Loaded {} partners and {} document types",
        taxonomy.partners().len(),
        taxonomy.document_types().len()
    );

    if !config.assume_yes && !check_company_name(&config.company_name, prompter)? {
        status(formatter, &formatter.info("Aborted."));
        return Ok(());
    }

    let files = match select_files(path, config, &template, formatter, prompter)? {
        Some(files) if !files.is_empty() => files,
        Some(_) => {
            status(formatter, &formatter.info("Nothing to rename."));
            return Ok(());
        }
        None => return Ok(()),
    };

    let provider = OpenAiProvider::new(&config.endpoint, &config.model, &config.api_key)?;
    let extractor = PdfExtractor::new(
        provider,
        config.extractor.clone(),
        taxonomy.partners().entries(),
        taxonomy.document_types().entries(),
    )?;
    info!("Using model {}", extractor.model_name());

    rename_files(
        extractor,
        taxonomy,
        template,
        files,
        &config.pipeline,
        formatter,
        prompter,
    )
    .await?;

    Ok(())
}

/// Ask whether to go on without a company name.
///
/// Returns `true` to continue. An empty or affirmative answer aborts.
pub fn check_company_name<P>(company_name: &str, prompter: &mut P) -> Result<bool>
where
    P: Prompter<Error = CliError>,
{
    if !company_name.trim().is_empty() {
        return Ok(true);
    }
    let answer = prompter.ask(COMPANY_NAME_QUESTION)?;
    Ok(!(answer.trim().is_empty() || is_affirmative(&answer)))
}

/// Resolve the files to process.
///
/// Returns `None` when there is nothing to do: a single file that already
/// follows the format, or a directory the operator declined.
pub fn select_files<P>(
    path: &Path,
    config: &RunConfig,
    template: &FileNameTemplate,
    formatter: &Formatter,
    prompter: &mut P,
) -> Result<Option<Vec<PathBuf>>>
where
    P: Prompter<Error = CliError>,
{
    let metadata = std::fs::metadata(path)
        .map_err(|e| CliError::InvalidInput(format!("{}: {}", path.display(), e)))?;
    let skip_format_check = config.pipeline.skip_format_check;

    if metadata.is_file() {
        if !is_pdf(path) {
            return Err(CliError::InvalidInput(format!(
                "{} is not a PDF file",
                path.display()
            )));
        }
        if config.filter.is_some() {
            warn!("--filter only applies to directories, ignoring it");
        }
        if !skip_format_check && template.is_valid_path(path) {
            let name = path.file_name().unwrap_or_default().to_string_lossy();
            status(formatter, &formatter.info(&format!("{} already follows the format.", name)));
            return Ok(None);
        }
        return Ok(Some(vec![path.to_path_buf()]));
    }

    if !config.assume_yes && !confirm(prompter, DIRECTORY_QUESTION)? {
        status(formatter, &formatter.info("Aborted."));
        return Ok(None);
    }

    let set = discover_pdfs(path, config.filter.as_ref())?;
    status(
        formatter,
        &formatter.info(&format!("{} PDF files in {}", set.total, path.display())),
    );
    if config.filter.is_some() {
        status(
            formatter,
            &formatter.info(&format!("{} files matched the filter", set.files.len())),
        );
    }

    if skip_format_check {
        status(
            formatter,
            &formatter.info(&format!("Processing all {} files", set.files.len())),
        );
        return Ok(Some(set.files));
    }

    let formatted = set.count_formatted(template);
    let files = set.unformatted(template);
    status(
        formatter,
        &formatter.info(&format!(
            "{} of {} files already follow the format; processing {}",
            formatted,
            set.files.len(),
            files.len()
        )),
    );
    Ok(Some(files))
}

/// Rename `files`, print the summary, then reconcile the taxonomy.
///
/// The taxonomy is shared with the batch and taken back once every file
/// has finished.
pub async fn rename_files<G, P>(
    gateway: G,
    taxonomy: Taxonomy,
    template: FileNameTemplate,
    files: Vec<PathBuf>,
    config: &PipelineConfig,
    formatter: &Formatter,
    prompter: &mut P,
) -> Result<RenameSummary>
where
    G: ExtractionGateway + Send + Sync + 'static,
    G::Error: std::fmt::Display,
    P: Prompter<Error = CliError>,
{
    let taxonomy = Arc::new(taxonomy);
    let processor = ItemProcessor::new(gateway, Arc::clone(&taxonomy), Arc::new(template));
    let scheduler = BatchScheduler::new(processor, config)?;

    let observer = Arc::new(match formatter.format() {
        OutputFormat::Table => BarObserver::new(files.len()),
        _ => BarObserver::hidden(),
    });
    let batch = scheduler
        .run_with_progress(files, Arc::clone(&observer) as Arc<dyn p2f_pipeline::ProgressObserver>)
        .await?;
    observer.finish();
    drop(scheduler);

    println!("{}", formatter.batch_summary(&batch)?);

    let mut taxonomy = Arc::unwrap_or_clone(taxonomy);
    let reconciliation =
        ReconciliationSession::new(&mut taxonomy, prompter).run(batch.unregistered())?;
    if !reconciliation.is_empty() {
        let text = formatter.reconciliation(&reconciliation)?;
        if !text.is_empty() {
            println!("{}", text);
        }
    }

    Ok(RenameSummary {
        batch,
        reconciliation,
    })
}

/// Progress notes go to stdout for tables, stderr otherwise.
fn status(formatter: &Formatter, message: &str) {
    if formatter.format().is_machine_readable() {
        eprintln!("{}", message);
    } else {
        println!("{}", message);
    }
}
