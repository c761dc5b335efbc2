//! Input file discovery

use crate::error::PipelineError;
use p2f_naming::FileNameTemplate;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::debug;

/// PDFs found in a directory
#[derive(Debug, Clone, Default)]
pub struct FileSet {
    /// Every `*.pdf` in the directory before filtering
    pub total: usize,

    /// Files matching the filter, sorted by name
    pub files: Vec<PathBuf>,
}

impl FileSet {
    /// How many of the selected files already follow the template
    pub fn count_formatted(&self, template: &FileNameTemplate) -> usize {
        self.files
            .iter()
            .filter(|path| template.is_valid_path(path))
            .count()
    }

    /// Selected files whose names do not follow the template yet
    pub fn unformatted(&self, template: &FileNameTemplate) -> Vec<PathBuf> {
        self.files
            .iter()
            .filter(|path| !template.is_valid_path(path))
            .cloned()
            .collect()
    }
}

/// Whether a path has a `.pdf` extension (any case)
pub fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// List the PDFs directly inside `dir`, optionally keeping only names that
/// match `filter`
///
/// Subdirectories are not descended into.
///
/// # Errors
///
/// Returns [`PipelineError::Io`] if the directory cannot be read.
pub fn discover_pdfs(dir: &Path, filter: Option<&Regex>) -> Result<FileSet, PipelineError> {
    let io_error = |source| PipelineError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut pdfs = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_error)? {
        let entry = entry.map_err(io_error)?;
        let path = entry.path();
        if path.is_file() && is_pdf(&path) {
            pdfs.push(path);
        }
    }
    pdfs.sort();

    let total = pdfs.len();
    let files: Vec<PathBuf> = match filter {
        Some(regex) => pdfs
            .into_iter()
            .filter(|path| {
                path.file_name()
                    .map(|name| regex.is_match(&name.to_string_lossy()))
                    .unwrap_or(false)
            })
            .collect(),
        None => pdfs,
    };

    debug!(
        "Found {} PDFs in {}, {} selected",
        total,
        dir.display(),
        files.len()
    );

    Ok(FileSet { total, files })
}

#[cfg(test)]
mod tests {
    use super::*;
    use p2f_naming::DEFAULT_TEMPLATE;
    use tempfile::TempDir;

    fn setup(names: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in names {
            std::fs::write(dir.path().join(name), b"%PDF").unwrap();
        }
        dir
    }

    fn names(files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_lists_pdfs_case_insensitively_and_sorted() {
        let dir = setup(&["b.pdf", "a.PDF", "notes.txt", "c.Pdf"]);
        std::fs::create_dir(dir.path().join("sub.pdf")).unwrap();

        let set = discover_pdfs(dir.path(), None).unwrap();
        assert_eq!(set.total, 3);
        assert_eq!(names(&set.files), vec!["a.PDF", "b.pdf", "c.Pdf"]);
    }

    #[test]
    fn test_filter_applies_to_file_names() {
        let dir = setup(&["scan_001.pdf", "scan_002.pdf", "invoice.pdf"]);
        let filter = Regex::new("^scan_").unwrap();

        let set = discover_pdfs(dir.path(), Some(&filter)).unwrap();
        assert_eq!(set.total, 3);
        assert_eq!(names(&set.files), vec!["scan_001.pdf", "scan_002.pdf"]);
    }

    #[test]
    fn test_formatted_files_are_counted() {
        let dir = setup(&["20240115_Acme_請求書_100.pdf", "scan.pdf"]);
        let template = FileNameTemplate::parse(DEFAULT_TEMPLATE).unwrap();

        let set = discover_pdfs(dir.path(), None).unwrap();
        assert_eq!(set.count_formatted(&template), 1);
        assert_eq!(names(&set.unformatted(&template)), vec!["scan.pdf"]);
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let dir = TempDir::new().unwrap();
        let result = discover_pdfs(&dir.path().join("missing"), None);
        assert!(matches!(result, Err(PipelineError::Io { .. })));
    }

    #[test]
    fn test_is_pdf() {
        assert!(is_pdf(Path::new("a.pdf")));
        assert!(is_pdf(Path::new("a.PDF")));
        assert!(!is_pdf(Path::new("a.pdf.txt")));
        assert!(!is_pdf(Path::new("pdf")));
    }
}
