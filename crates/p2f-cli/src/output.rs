//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use p2f_pipeline::{BatchResult, ItemOutcome, ItemReport, ReconciliationReport};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format the result of a batch.
    pub fn batch_summary(&self, result: &BatchResult) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.batch_json(result),
            OutputFormat::Table => Ok(self.batch_table(result)),
            OutputFormat::Quiet => Ok(self.batch_quiet(result)),
        }
    }

    fn batch_json(&self, result: &BatchResult) -> Result<String> {
        let metrics = result.metrics();
        let files: Vec<serde_json::Value> = by_index(result)
            .into_iter()
            .map(|report| {
                let (renamed_to, error) = match &report.outcome {
                    ItemOutcome::Renamed { to } => (Some(to.display().to_string()), None),
                    ItemOutcome::Unchanged | ItemOutcome::SkippedAlreadyFormatted => (None, None),
                    ItemOutcome::Failed(e) => (None, Some(e.to_string())),
                };
                let fields = report.fields.as_ref().map(|f| {
                    serde_json::json!({
                        "date": f.date,
                        "partner": f.partner,
                        "documentType": f.document_type,
                        "amount": f.amount,
                    })
                });
                serde_json::json!({
                    "file": report.path.display().to_string(),
                    "status": report.outcome.status(),
                    "renamed_to": renamed_to,
                    "error": error,
                    "fields": fields,
                })
            })
            .collect();

        let value = serde_json::json!({
            "processed": metrics.processed,
            "renamed": metrics.renamed,
            "unchanged": metrics.unchanged,
            "skipped": metrics.skipped,
            "failed": metrics.failed,
            "elapsed_secs": metrics.elapsed.as_secs_f64(),
            "files": files,
            "unregistered": {
                "partners": result.unregistered().partners(),
                "document_types": result.unregistered().document_types(),
            },
        });

        Ok(serde_json::to_string_pretty(&value)?)
    }

    fn batch_table(&self, result: &BatchResult) -> String {
        if result.is_empty() {
            return self.colorize("No files processed.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["File", "Status", "Result"]);

        for report in by_index(result) {
            let (status, detail) = match &report.outcome {
                ItemOutcome::Renamed { to } => (
                    self.colorize("renamed", "green"),
                    to.file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                ),
                ItemOutcome::Unchanged => {
                    (self.colorize("unchanged", "blue"), "name already matches".to_string())
                }
                ItemOutcome::SkippedAlreadyFormatted => {
                    (self.colorize("skipped", "blue"), "already formatted".to_string())
                }
                ItemOutcome::Failed(e) => (self.colorize("failed", "red"), e.to_string()),
            };
            builder.push_record([report.file_name(), status, detail]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        let mut out = table.to_string();
        out.push('\n');
        out.push_str(&result.metrics().summary());

        let failures = result.failures();
        if !failures.is_empty() {
            let names: Vec<String> = failures.iter().map(|r| r.file_name()).collect();
            out.push('\n');
            out.push_str(&self.error(&format!("Failed files: {}", names.join(", "))));
        }
        out
    }

    /// New paths of renamed files, one per line.
    fn batch_quiet(&self, result: &BatchResult) -> String {
        by_index(result)
            .into_iter()
            .filter_map(|report| match &report.outcome {
                ItemOutcome::Renamed { to } => Some(to.display().to_string()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Format what a reconciliation session changed.
    pub fn reconciliation(&self, report: &ReconciliationReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let added: Vec<serde_json::Value> = report
                    .added
                    .iter()
                    .map(|e| {
                        serde_json::json!({
                            "kind": e.kind.as_str(),
                            "candidate": e.candidate,
                            "value": e.value,
                        })
                    })
                    .collect();
                let failed: Vec<serde_json::Value> = report
                    .failed
                    .iter()
                    .map(|e| {
                        serde_json::json!({
                            "kind": e.kind.as_str(),
                            "value": e.value,
                            "error": e.error.to_string(),
                        })
                    })
                    .collect();
                let value = serde_json::json!({
                    "added": added,
                    "skipped": report.skipped.len(),
                    "failed": failed,
                });
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Table => {
                let mut lines: Vec<String> = report
                    .added
                    .iter()
                    .map(|e| self.success(&format!("Registered {} \"{}\"", e.kind.as_str(), e.value)))
                    .collect();
                lines.extend(report.failed.iter().map(|e| {
                    self.error(&format!("Could not register \"{}\": {}", e.value, e.error))
                }));
                lines.push(self.info(&format!(
                    "{} registered, {} skipped",
                    report.added.len(),
                    report.skipped.len()
                )));
                Ok(lines.join("\n"))
            }
            OutputFormat::Quiet => Ok(String::new()),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn by_index(result: &BatchResult) -> Vec<&ItemReport> {
    let mut reports: Vec<&ItemReport> = result.reports().iter().collect();
    reports.sort_by_key(|r| r.index);
    reports
}

#[cfg(test)]
mod tests {
    use super::*;
    use p2f_domain::{ExtractedFields, TaxonomyKind};
    use p2f_pipeline::{AddedEntry, BatchMetrics, ItemError};
    use std::path::PathBuf;

    fn sample_result() -> BatchResult {
        let reports = vec![
            ItemReport::failed(
                1,
                PathBuf::from("/scans/broken.pdf"),
                ItemError::Extraction("timed out".into()),
            ),
            ItemReport {
                index: 0,
                path: PathBuf::from("/scans/invoice_scan.pdf"),
                fields: Some(ExtractedFields::new("20240115", "Acme Corp", "請求書", "15000")),
                outcome: ItemOutcome::Renamed {
                    to: PathBuf::from("/scans/20240115_Acme Corp_請求書_15000.pdf"),
                },
                unregistered: None,
            },
        ];
        let mut metrics = BatchMetrics::new();
        for report in &reports {
            metrics.record(&report.outcome);
        }
        BatchResult::new(reports, metrics)
    }

    #[test]
    fn test_table_summary() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.batch_summary(&sample_result()).unwrap();
        assert!(output.contains("invoice_scan.pdf"));
        assert!(output.contains("20240115_Acme Corp_請求書_15000.pdf"));
        assert!(output.contains("Renamed: 1"));
        assert!(output.contains("Failed files: broken.pdf"));
        // Input order, not completion order
        assert!(output.find("invoice_scan.pdf").unwrap() < output.find("broken.pdf").unwrap());
    }

    #[test]
    fn test_json_summary() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.batch_summary(&sample_result()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["processed"], 2);
        assert_eq!(value["failed"], 1);
        assert_eq!(value["files"][0]["status"], "renamed");
        assert_eq!(value["files"][0]["fields"]["documentType"], "請求書");
        assert_eq!(value["files"][1]["status"], "failed");
        assert!(value["files"][1]["fields"].is_null());
    }

    #[test]
    fn test_unchanged_file_is_not_reported_as_renamed() {
        let path = PathBuf::from("/scans/20240115_Acme Corp_請求書_15000.pdf");
        let reports = vec![ItemReport {
            index: 0,
            path: path.clone(),
            fields: Some(ExtractedFields::new("20240115", "Acme Corp", "請求書", "15000")),
            outcome: ItemOutcome::Unchanged,
            unregistered: None,
        }];
        let mut metrics = BatchMetrics::new();
        metrics.record(&reports[0].outcome);
        let result = BatchResult::new(reports, metrics);

        let json = Formatter::new(OutputFormat::Json, false)
            .batch_summary(&result)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["renamed"], 0);
        assert_eq!(value["unchanged"], 1);
        assert_eq!(value["files"][0]["status"], "unchanged");
        assert!(value["files"][0]["renamed_to"].is_null());

        let quiet = Formatter::new(OutputFormat::Quiet, false)
            .batch_summary(&result)
            .unwrap();
        assert!(quiet.is_empty());

        let table = Formatter::new(OutputFormat::Table, false)
            .batch_summary(&result)
            .unwrap();
        assert!(table.contains("Renamed: 0"));
        assert!(table.contains("Unchanged: 1"));
    }

    #[test]
    fn test_quiet_summary() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter.batch_summary(&sample_result()).unwrap();
        assert_eq!(output, "/scans/20240115_Acme Corp_請求書_15000.pdf");
    }

    #[test]
    fn test_reconciliation_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let report = ReconciliationReport {
            added: vec![AddedEntry {
                kind: TaxonomyKind::Partner,
                candidate: "Acme Crop".into(),
                value: "Acme Corp".into(),
            }],
            skipped: vec![(TaxonomyKind::DocumentType, "検収書".into())],
            failed: Vec::new(),
        };
        let output = formatter.reconciliation(&report).unwrap();
        assert!(output.contains("Registered partner \"Acme Corp\""));
        assert!(output.contains("1 registered, 1 skipped"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
        assert_eq!(formatter.warning("test"), "⚠ test");
    }
}
