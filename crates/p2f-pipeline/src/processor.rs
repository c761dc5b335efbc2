//! Single-file processing: format check, extraction, membership, rename

use crate::error::ItemError;
use crate::outcome::{display_name, ItemOutcome, ItemReport};
use p2f_domain::{ExtractedFields, ExtractionGateway, TaxonomyKind, UnregisteredCandidate};
use p2f_naming::FileNameTemplate;
use p2f_taxonomy::Taxonomy;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Runs one file through the four processing steps
///
/// The taxonomy and template are shared read-only. Rename targets claimed
/// by this processor are remembered so two files of one batch can never be
/// renamed onto the same name.
pub struct ItemProcessor<G> {
    gateway: G,
    taxonomy: Arc<Taxonomy>,
    template: Arc<FileNameTemplate>,
    skip_format_check: bool,
    claimed_targets: Mutex<HashSet<PathBuf>>,
}

impl<G> ItemProcessor<G>
where
    G: ExtractionGateway + Send + Sync,
    G::Error: std::fmt::Display,
{
    /// Create a new processor
    pub fn new(gateway: G, taxonomy: Arc<Taxonomy>, template: Arc<FileNameTemplate>) -> Self {
        Self {
            gateway,
            taxonomy,
            template,
            skip_format_check: false,
            claimed_targets: Mutex::new(HashSet::new()),
        }
    }

    /// Process files even if their names already follow the template
    pub fn with_skip_format_check(mut self, skip: bool) -> Self {
        self.skip_format_check = skip;
        self
    }

    /// Process one file to a terminal state
    pub async fn process(&self, index: usize, path: PathBuf) -> ItemReport {
        let name = display_name(&path);

        // 1. Format check
        if !self.skip_format_check && self.template.is_valid_path(&path) {
            debug!("{} already follows the template, skipping", name);
            return ItemReport {
                index,
                path,
                fields: None,
                outcome: ItemOutcome::SkippedAlreadyFormatted,
                unregistered: None,
            };
        }

        // 2. Extract
        let fields = match self.gateway.extract(&path).await {
            Ok(fields) => fields,
            Err(e) => {
                warn!("Extraction failed for {}: {}", name, e);
                return ItemReport::failed(index, path, ItemError::Extraction(e.to_string()));
            }
        };

        // 3. Membership check
        let unregistered = self.unregistered(&fields);

        // 4. Rename
        let outcome = match self.rename(&path, &fields).await {
            Ok(None) => {
                debug!("{} already has its rendered name", name);
                ItemOutcome::Unchanged
            }
            Ok(Some(to)) => {
                info!("Renamed {} -> {}", name, display_name(&to));
                ItemOutcome::Renamed { to }
            }
            Err(e) => {
                warn!("Rename failed for {}: {}", name, e);
                ItemOutcome::Failed(e)
            }
        };

        ItemReport {
            index,
            path,
            fields: Some(fields),
            outcome,
            unregistered: Some(unregistered),
        }
    }

    /// Extracted values absent from the taxonomy; empty values never count
    pub fn unregistered(&self, fields: &ExtractedFields) -> UnregisteredCandidate {
        let check = |kind: TaxonomyKind, value: &str| {
            let value = value.trim();
            (!value.is_empty() && !self.taxonomy.contains(kind, value)).then(|| value.to_string())
        };
        UnregisteredCandidate {
            partner: check(TaxonomyKind::Partner, &fields.partner),
            document_type: check(TaxonomyKind::DocumentType, &fields.document_type),
        }
    }

    /// New path of the file, or `None` if it already has the rendered name
    async fn rename(
        &self,
        path: &Path,
        fields: &ExtractedFields,
    ) -> Result<Option<PathBuf>, ItemError> {
        let target = path.with_file_name(self.template.render(fields));

        if target == path {
            return Ok(None);
        }

        if !self.claim(&target) || self.is_occupied(path, &target).await {
            return Err(ItemError::Collision(target));
        }

        match tokio::fs::rename(path, &target).await {
            Ok(()) => Ok(Some(target)),
            Err(source) => {
                self.release(&target);
                Err(ItemError::Rename { target, source })
            }
        }
    }

    /// An existing target is a collision unless it is the source file itself
    /// (a case-only rename on a case-insensitive filesystem)
    async fn is_occupied(&self, path: &Path, target: &Path) -> bool {
        if !tokio::fs::try_exists(target).await.unwrap_or(true) {
            return false;
        }
        match (
            tokio::fs::canonicalize(path).await,
            tokio::fs::canonicalize(target).await,
        ) {
            (Ok(a), Ok(b)) => a != b,
            _ => true,
        }
    }

    fn claim(&self, target: &Path) -> bool {
        self.claimed_targets
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(target.to_path_buf())
    }

    fn release(&self, target: &Path) {
        self.claimed_targets
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(target);
    }
}
