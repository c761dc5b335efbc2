//! p2f Taxonomy Store
//!
//! Loads and persists the two open vocabularies (known trading partners and
//! known document types) that decide whether an extracted value is new.
//!
//! # File format
//!
//! Each vocabulary is a single-line, comma-separated text file:
//!
//! ```text
//! 見積書,納品書,請求書,領収書,発注書
//! ```
//!
//! Loading splits on `,`, trims every token and drops empty ones, so a
//! stray leading comma or a trailing newline is harmless. New entries are
//! appended with a single append-mode write (`,value`), never by rewriting
//! the whole file.
//!
//! # Examples
//!
//! ```no_run
//! use p2f_taxonomy::Taxonomy;
//! use p2f_domain::TaxonomyKind;
//!
//! let mut taxonomy = Taxonomy::load("trading_partners.csv", "document_type.csv").unwrap();
//! if !taxonomy.contains(TaxonomyKind::Partner, "Acme Corp") {
//!     taxonomy.append(TaxonomyKind::Partner, "Acme Corp").unwrap();
//! }
//! ```

#![warn(missing_docs)]

use p2f_domain::{normalize, TaxonomyKind};
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Document types written to a freshly created document-type file
///
/// Quotation/estimate, delivery note, invoice, receipt, purchase order.
pub const DEFAULT_DOCUMENT_TYPES: [&str; 5] = ["見積書", "納品書", "請求書", "領収書", "発注書"];

/// Entry separator in taxonomy files
pub const SEPARATOR: char = ',';

/// Errors that can occur during taxonomy operations
#[derive(Error, Debug)]
pub enum TaxonomyError {
    /// Taxonomy file could not be created, read or appended to
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Value cannot be stored in a comma-separated single-line file
    #[error("Invalid taxonomy entry '{0}': must be non-empty and contain no comma or line break")]
    InvalidEntry(String),
}

impl TaxonomyError {
    fn io(path: &Path, source: io::Error) -> Self {
        TaxonomyError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result alias for taxonomy operations
pub type Result<T> = std::result::Result<T, TaxonomyError>;

/// One vocabulary backed by one file
///
/// Membership is tested against normalized forms (see
/// [`p2f_domain::normalize`]). Appending requires `&mut self`, so writes to
/// the same list can never interleave.
#[derive(Debug, Clone)]
pub struct TaxonomyList {
    path: PathBuf,
    entries: Vec<String>,
    normalized: HashSet<String>,
}

impl TaxonomyList {
    /// Load a vocabulary file, creating it with `seed` if absent
    ///
    /// # Errors
    ///
    /// Returns [`TaxonomyError::Io`] if the file (or its parent directory)
    /// cannot be created, or exists but cannot be read.
    pub fn load(path: impl AsRef<Path>, seed: &[&str]) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| TaxonomyError::io(parent, e))?;
            }
            fs::write(path, seed.join(",")).map_err(|e| TaxonomyError::io(path, e))?;
            info!("Created taxonomy file {} with {} entries", path.display(), seed.len());
        }

        let contents = fs::read_to_string(path).map_err(|e| TaxonomyError::io(path, e))?;
        let list = Self::from_entries(path, parse_entries(&contents));

        debug!("Loaded {} entries from {}", list.len(), path.display());

        Ok(list)
    }

    /// Build an in-memory list without touching the filesystem
    pub fn from_entries<I, S>(path: impl Into<PathBuf>, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = Self {
            path: path.into(),
            entries: Vec::new(),
            normalized: HashSet::new(),
        };
        for entry in entries {
            let entry = entry.into();
            list.normalized.insert(normalize(&entry));
            list.entries.push(entry);
        }
        list
    }

    /// Backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Entries in file order (duplicates from hand edits are kept)
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the vocabulary is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a value is registered, ignoring width, case and padding
    pub fn contains(&self, value: &str) -> bool {
        self.normalized.contains(&normalize(value))
    }

    /// Append a new entry to the file and the in-memory view
    ///
    /// Returns `Ok(false)` without writing if an equivalent entry exists.
    ///
    /// # Errors
    ///
    /// - [`TaxonomyError::InvalidEntry`] for blank values or values holding
    ///   a comma or line break
    /// - [`TaxonomyError::Io`] if the append fails
    pub fn append(&mut self, value: &str) -> Result<bool> {
        let value = value.trim();
        if value.is_empty() || value.contains([SEPARATOR, '\n', '\r']) {
            return Err(TaxonomyError::InvalidEntry(value.to_string()));
        }
        if self.contains(value) {
            debug!("'{}' already present in {}", value, self.path.display());
            return Ok(false);
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| TaxonomyError::io(&self.path, e))?;
        let is_empty = file
            .metadata()
            .map_err(|e| TaxonomyError::io(&self.path, e))?
            .len()
            == 0;

        let record = if is_empty {
            value.to_string()
        } else {
            format!("{}{}", SEPARATOR, value)
        };
        file.write_all(record.as_bytes())
            .map_err(|e| TaxonomyError::io(&self.path, e))?;

        self.normalized.insert(normalize(value));
        self.entries.push(value.to_string());

        info!("Registered '{}' in {}", value, self.path.display());

        Ok(true)
    }
}

/// Split file contents into entries, dropping blanks
pub fn parse_entries(contents: &str) -> Vec<String> {
    contents
        .split(SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Both vocabularies used by the pipeline
#[derive(Debug, Clone)]
pub struct Taxonomy {
    partners: TaxonomyList,
    document_types: TaxonomyList,
}

impl Taxonomy {
    /// Load both vocabulary files
    ///
    /// A missing partner file is created empty; a missing document-type
    /// file is seeded with [`DEFAULT_DOCUMENT_TYPES`].
    pub fn load(
        partner_path: impl AsRef<Path>,
        document_type_path: impl AsRef<Path>,
    ) -> Result<Self> {
        Ok(Self {
            partners: TaxonomyList::load(partner_path, &[])?,
            document_types: TaxonomyList::load(document_type_path, &DEFAULT_DOCUMENT_TYPES)?,
        })
    }

    /// Combine two already loaded lists
    pub fn new(partners: TaxonomyList, document_types: TaxonomyList) -> Self {
        Self {
            partners,
            document_types,
        }
    }

    /// Vocabulary for a kind
    pub fn list(&self, kind: TaxonomyKind) -> &TaxonomyList {
        match kind {
            TaxonomyKind::Partner => &self.partners,
            TaxonomyKind::DocumentType => &self.document_types,
        }
    }

    fn list_mut(&mut self, kind: TaxonomyKind) -> &mut TaxonomyList {
        match kind {
            TaxonomyKind::Partner => &mut self.partners,
            TaxonomyKind::DocumentType => &mut self.document_types,
        }
    }

    /// Known trading partners
    pub fn partners(&self) -> &TaxonomyList {
        &self.partners
    }

    /// Known document types
    pub fn document_types(&self) -> &TaxonomyList {
        &self.document_types
    }

    /// Whether a value is registered for a kind
    pub fn contains(&self, kind: TaxonomyKind, value: &str) -> bool {
        self.list(kind).contains(value)
    }

    /// Append a value to a kind's file; see [`TaxonomyList::append`]
    pub fn append(&mut self, kind: TaxonomyKind, value: &str) -> Result<bool> {
        self.list_mut(kind).append(value)
    }
}
