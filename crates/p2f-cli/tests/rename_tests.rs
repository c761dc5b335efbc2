//! Integration tests for the rename command

use clap::Parser;
use p2f_cli::commands::{check_company_name, rename_files, select_files};
use p2f_cli::{Cli, CliError, Config, Formatter, OutputFormat, RunConfig};
use p2f_domain::{Prompter, TaxonomyKind};
use p2f_extractor::{ExtractorConfig, PdfExtractor};
use p2f_llm::MockProvider;
use p2f_naming::{FileNameTemplate, DEFAULT_TEMPLATE};
use p2f_pipeline::PipelineConfig;
use p2f_taxonomy::Taxonomy;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct ScriptedPrompter {
    answers: VecDeque<String>,
    asked: Vec<String>,
}

impl ScriptedPrompter {
    fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|s| s.to_string()).collect(),
            asked: Vec::new(),
        }
    }
}

impl Prompter for ScriptedPrompter {
    type Error = CliError;

    fn ask(&mut self, question: &str) -> Result<String, CliError> {
        self.asked.push(question.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| CliError::Prompt("script exhausted".into()))
    }
}

fn run_config(args: &[&str], path: &Path) -> RunConfig {
    let mut argv = vec!["p2f".to_string()];
    argv.extend(args.iter().map(|s| s.to_string()));
    argv.push(path.display().to_string());
    let cli = Cli::parse_from(argv);
    RunConfig::resolve(
        &Config::default(),
        Path::new("config.toml"),
        &cli,
        Some("sk-test".to_string()),
    )
    .unwrap()
}

fn quiet() -> Formatter {
    Formatter::new(OutputFormat::Quiet, false)
}

fn template() -> FileNameTemplate {
    FileNameTemplate::parse(DEFAULT_TEMPLATE).unwrap()
}

fn write_pdfs(dir: &Path, names: &[&str]) {
    for name in names {
        std::fs::write(dir.join(name), b"%PDF-1.4").unwrap();
    }
}

fn names(files: &[PathBuf]) -> Vec<String> {
    files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[tokio::test]
async fn test_end_to_end_rename_and_registration() {
    let docs = TempDir::new().unwrap();
    let lists = TempDir::new().unwrap();
    write_pdfs(docs.path(), &["invoice_scan.pdf"]);

    let taxonomy = Taxonomy::load(
        lists.path().join("trading_partners.csv"),
        lists.path().join("document_type.csv"),
    )
    .unwrap();

    let provider = MockProvider::new(
        r#"```json
{"date": "20240115", "partner": "Acme Corp", "documentType": "請求書", "amount": 15000}
```"#,
    );
    let extractor = PdfExtractor::new(
        provider.clone(),
        ExtractorConfig::default(),
        taxonomy.partners().entries(),
        taxonomy.document_types().entries(),
    )
    .unwrap();

    let mut prompter = ScriptedPrompter::new(&["y"]);
    let summary = rename_files(
        extractor,
        taxonomy,
        template(),
        vec![docs.path().join("invoice_scan.pdf")],
        &PipelineConfig::default(),
        &quiet(),
        &mut prompter,
    )
    .await
    .unwrap();

    assert_eq!(provider.call_count(), 1);
    assert_eq!(summary.batch.metrics().renamed, 1);
    assert!(docs.path().join("20240115_Acme Corp_請求書_15000.pdf").exists());
    assert!(!docs.path().join("invoice_scan.pdf").exists());

    // 請求書 is seeded, so only the partner is asked about
    assert_eq!(prompter.asked.len(), 1);
    assert!(prompter.asked[0].contains("\"Acme Corp\""));
    assert_eq!(summary.reconciliation.added.len(), 1);
    assert_eq!(summary.reconciliation.added[0].kind, TaxonomyKind::Partner);
    assert_eq!(
        std::fs::read_to_string(lists.path().join("trading_partners.csv")).unwrap(),
        "Acme Corp"
    );
}

#[tokio::test]
async fn test_failed_file_does_not_block_others() {
    let docs = TempDir::new().unwrap();
    let lists = TempDir::new().unwrap();
    write_pdfs(docs.path(), &["a.pdf", "b.pdf"]);

    let taxonomy = Taxonomy::new(
        p2f_taxonomy::TaxonomyList::from_entries(lists.path().join("p.csv"), ["Acme"]),
        p2f_taxonomy::TaxonomyList::from_entries(lists.path().join("d.csv"), ["請求書"]),
    );

    let mut provider = MockProvider::new(
        r#"{"date": "20240301", "partner": "Acme", "documentType": "請求書", "amount": "1,200"}"#,
    );
    provider.add_error("a.pdf");
    let extractor =
        PdfExtractor::new(provider, ExtractorConfig::default(), &[], &[]).unwrap();

    let mut prompter = ScriptedPrompter::new(&[]);
    let summary = rename_files(
        extractor,
        taxonomy,
        template(),
        vec![docs.path().join("a.pdf"), docs.path().join("b.pdf")],
        &PipelineConfig::default(),
        &quiet(),
        &mut prompter,
    )
    .await
    .unwrap();

    assert_eq!(summary.batch.metrics().failed, 1);
    assert_eq!(summary.batch.metrics().renamed, 1);
    assert_eq!(summary.batch.failures()[0].file_name(), "a.pdf");
    assert!(docs.path().join("a.pdf").exists());
    assert!(docs.path().join("20240301_Acme_請求書_1200.pdf").exists());
    assert!(prompter.asked.is_empty());
}

#[test]
fn test_directory_selection_skips_formatted_files() {
    let docs = TempDir::new().unwrap();
    write_pdfs(docs.path(), &["20240115_Acme_請求書_100.pdf", "scan.pdf", "scan2.PDF"]);
    std::fs::write(docs.path().join("notes.txt"), "").unwrap();

    let config = run_config(&["-y"], docs.path());
    let mut prompter = ScriptedPrompter::new(&[]);

    let files = select_files(docs.path(), &config, &template(), &quiet(), &mut prompter)
        .unwrap()
        .unwrap();

    assert_eq!(names(&files), vec!["scan.pdf", "scan2.PDF"]);
    assert!(prompter.asked.is_empty());
}

#[test]
fn test_directory_selection_with_filter_and_skip() {
    let docs = TempDir::new().unwrap();
    write_pdfs(docs.path(), &["20240115_Acme_請求書_100.pdf", "scan.pdf", "other.pdf"]);

    let config = run_config(&["-s", "-f", "^(scan|2024)"], docs.path());
    let mut prompter = ScriptedPrompter::new(&["y"]);

    let files = select_files(docs.path(), &config, &template(), &quiet(), &mut prompter)
        .unwrap()
        .unwrap();

    assert_eq!(names(&files), vec!["20240115_Acme_請求書_100.pdf", "scan.pdf"]);
    assert_eq!(prompter.asked.len(), 1);
}

#[test]
fn test_declined_directory_selects_nothing() {
    let docs = TempDir::new().unwrap();
    write_pdfs(docs.path(), &["scan.pdf"]);

    let config = run_config(&[], docs.path());
    let mut prompter = ScriptedPrompter::new(&["n"]);

    let files =
        select_files(docs.path(), &config, &template(), &quiet(), &mut prompter).unwrap();
    assert!(files.is_none());
}

#[test]
fn test_single_file_selection() {
    let docs = TempDir::new().unwrap();
    write_pdfs(docs.path(), &["20240115_Acme_請求書_100.pdf", "scan.pdf"]);
    let formatted = docs.path().join("20240115_Acme_請求書_100.pdf");
    let mut prompter = ScriptedPrompter::new(&[]);

    let config = run_config(&[], &formatted);
    let files = select_files(&formatted, &config, &template(), &quiet(), &mut prompter).unwrap();
    assert!(files.is_none());

    let config = run_config(&["-s"], &formatted);
    let files = select_files(&formatted, &config, &template(), &quiet(), &mut prompter).unwrap();
    assert_eq!(files, Some(vec![formatted.clone()]));

    let scan = docs.path().join("scan.pdf");
    let config = run_config(&[], &scan);
    let files = select_files(&scan, &config, &template(), &quiet(), &mut prompter).unwrap();
    assert_eq!(files, Some(vec![scan.clone()]));

    assert!(prompter.asked.is_empty());
}

#[test]
fn test_non_pdf_and_missing_paths_are_rejected() {
    let docs = TempDir::new().unwrap();
    let notes = docs.path().join("notes.txt");
    std::fs::write(&notes, "").unwrap();
    let mut prompter = ScriptedPrompter::new(&[]);

    let config = run_config(&[], &notes);
    let result = select_files(&notes, &config, &template(), &quiet(), &mut prompter);
    assert!(matches!(result, Err(CliError::InvalidInput(_))));

    let missing = docs.path().join("missing.pdf");
    let result = select_files(&missing, &config, &template(), &quiet(), &mut prompter);
    assert!(matches!(result, Err(CliError::InvalidInput(_))));
}

#[test]
fn test_company_name_check() {
    let mut prompter = ScriptedPrompter::new(&[]);
    assert!(check_company_name("Maruyama Trading", &mut prompter).unwrap());
    assert!(prompter.asked.is_empty());

    for (answer, proceed) in [("", false), ("y", false), ("Ｙ", false), ("n", true)] {
        let mut prompter = ScriptedPrompter::new(&[answer]);
        assert_eq!(check_company_name("", &mut prompter).unwrap(), proceed, "{answer:?}");
    }
}
