//! Unregistered taxonomy candidates

use crate::normalize::normalize;
use std::collections::HashSet;

/// Which of the two open vocabularies a value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaxonomyKind {
    /// Known counterparties (trading partners)
    Partner,

    /// Known document types
    DocumentType,
}

impl TaxonomyKind {
    /// Both kinds, partners first
    pub const ALL: [TaxonomyKind; 2] = [TaxonomyKind::Partner, TaxonomyKind::DocumentType];

    /// Name used in logs and prompts
    pub fn as_str(&self) -> &'static str {
        match self {
            TaxonomyKind::Partner => "partner",
            TaxonomyKind::DocumentType => "document type",
        }
    }
}

/// Values from one file that were not found in the taxonomy
///
/// `None` means the extracted value is already registered (or was empty)
/// and needs no action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnregisteredCandidate {
    /// Unregistered counterparty, if any
    pub partner: Option<String>,

    /// Unregistered document type, if any
    pub document_type: Option<String>,
}

impl UnregisteredCandidate {
    /// Candidate value for a taxonomy kind
    pub fn get(&self, kind: TaxonomyKind) -> Option<&str> {
        match kind {
            TaxonomyKind::Partner => self.partner.as_deref(),
            TaxonomyKind::DocumentType => self.document_type.as_deref(),
        }
    }

    /// True when neither field needs reconciliation
    pub fn is_empty(&self) -> bool {
        self.partner.is_none() && self.document_type.is_none()
    }
}

/// De-duplicated, insertion-ordered candidates across a whole batch
///
/// Blank values are dropped and values that normalize to the same form
/// are kept only once (first spelling wins).
///
/// # Examples
///
/// ```
/// use p2f_domain::{TaxonomyKind, UnregisteredList};
///
/// let mut list = UnregisteredList::new();
/// for value in ["Acme", "acme", "ACME", ""] {
///     list.insert(TaxonomyKind::Partner, value);
/// }
/// assert_eq!(list.partners(), ["Acme"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct UnregisteredList {
    partners: Vec<String>,
    document_types: Vec<String>,
    seen: HashSet<(TaxonomyKind, String)>,
}

impl UnregisteredList {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, returning whether it was new
    pub fn insert(&mut self, kind: TaxonomyKind, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return false;
        }
        if !self.seen.insert((kind, normalize(value))) {
            return false;
        }
        match kind {
            TaxonomyKind::Partner => self.partners.push(value.to_string()),
            TaxonomyKind::DocumentType => self.document_types.push(value.to_string()),
        }
        true
    }

    /// Insert both fields of a per-file candidate
    pub fn extend_from(&mut self, candidate: &UnregisteredCandidate) {
        for kind in TaxonomyKind::ALL {
            if let Some(value) = candidate.get(kind) {
                self.insert(kind, value);
            }
        }
    }

    /// Candidates of one kind in insertion order
    pub fn get(&self, kind: TaxonomyKind) -> &[String] {
        match kind {
            TaxonomyKind::Partner => &self.partners,
            TaxonomyKind::DocumentType => &self.document_types,
        }
    }

    /// Unregistered partners in insertion order
    pub fn partners(&self) -> &[String] {
        &self.partners
    }

    /// Unregistered document types in insertion order
    pub fn document_types(&self) -> &[String] {
        &self.document_types
    }

    /// Total number of candidates of both kinds
    pub fn len(&self) -> usize {
        self.partners.len() + self.document_types.len()
    }

    /// True if there is nothing to reconcile
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_by_normalized_form() {
        let mut list = UnregisteredList::new();
        assert!(list.insert(TaxonomyKind::Partner, "Acme"));
        assert!(!list.insert(TaxonomyKind::Partner, "acme"));
        assert!(!list.insert(TaxonomyKind::Partner, "ＡＣＭＥ"));
        assert!(!list.insert(TaxonomyKind::Partner, ""));
        assert_eq!(list.partners(), ["Acme"]);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_kinds_are_independent() {
        let mut list = UnregisteredList::new();
        assert!(list.insert(TaxonomyKind::Partner, "請求書"));
        assert!(list.insert(TaxonomyKind::DocumentType, "請求書"));
        assert_eq!(list.partners().len(), 1);
        assert_eq!(list.document_types().len(), 1);
    }

    #[test]
    fn test_insertion_order_is_stable() {
        let mut list = UnregisteredList::new();
        for value in ["Beta", "Alpha", "beta", "Gamma"] {
            list.insert(TaxonomyKind::Partner, value);
        }
        assert_eq!(list.partners(), ["Beta", "Alpha", "Gamma"]);
    }

    #[test]
    fn test_extend_from_candidate() {
        let mut list = UnregisteredList::new();
        list.extend_from(&UnregisteredCandidate {
            partner: Some("Acme".to_string()),
            document_type: None,
        });
        list.extend_from(&UnregisteredCandidate {
            partner: Some(" acme ".to_string()),
            document_type: Some("検収書".to_string()),
        });
        assert_eq!(list.partners(), ["Acme"]);
        assert_eq!(list.document_types(), ["検収書"]);
    }

    #[test]
    fn test_values_are_trimmed() {
        let mut list = UnregisteredList::new();
        list.insert(TaxonomyKind::Partner, "  Acme Corp ");
        assert_eq!(list.get(TaxonomyKind::Partner), ["Acme Corp"]);
    }

    #[test]
    fn test_candidate_is_empty() {
        assert!(UnregisteredCandidate::default().is_empty());
        let candidate = UnregisteredCandidate {
            partner: None,
            document_type: Some("見積書".to_string()),
        };
        assert!(!candidate.is_empty());
        assert_eq!(candidate.get(TaxonomyKind::DocumentType), Some("見積書"));
    }
}
