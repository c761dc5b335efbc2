//! Interactive reconciliation of unregistered candidates

use p2f_domain::{Prompter, TaxonomyKind, UnregisteredList};
use p2f_taxonomy::{Taxonomy, TaxonomyError};
use tracing::{debug, info, warn};

/// Answers that accept a candidate as written
pub const AFFIRMATIVE_TOKENS: [&str; 4] = ["y", "Y", "ｙ", "Ｙ"];

/// Operator decision for one candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Register the candidate verbatim
    Accept,

    /// Register this spelling instead
    Correct(String),

    /// Leave the taxonomy unchanged
    Skip,
}

impl Decision {
    /// Interpret a raw answer (trimmed before matching)
    pub fn from_answer(answer: &str) -> Self {
        let answer = answer.trim();
        if answer.is_empty() {
            Decision::Skip
        } else if AFFIRMATIVE_TOKENS.contains(&answer) {
            Decision::Accept
        } else {
            Decision::Correct(answer.to_string())
        }
    }
}

/// A value written to a taxonomy file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedEntry {
    /// Vocabulary written to
    pub kind: TaxonomyKind,
    /// Candidate the operator was asked about
    pub candidate: String,
    /// Value actually stored
    pub value: String,
}

/// A candidate whose append failed
#[derive(Debug)]
pub struct FailedEntry {
    /// Vocabulary
    pub kind: TaxonomyKind,
    /// Value that could not be stored
    pub value: String,
    /// Why
    pub error: TaxonomyError,
}

/// What a reconciliation session did
#[derive(Debug, Default)]
pub struct ReconciliationReport {
    /// Entries appended to the taxonomy
    pub added: Vec<AddedEntry>,
    /// Candidates the operator declined (or that were already equivalent)
    pub skipped: Vec<(TaxonomyKind, String)>,
    /// Appends that failed
    pub failed: Vec<FailedEntry>,
}

impl ReconciliationReport {
    /// True if nothing was asked
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.skipped.is_empty() && self.failed.is_empty()
    }
}

/// Asks the operator about each unregistered candidate and records the
/// answers in the taxonomy
///
/// Runs strictly after the batch, one question at a time.
pub struct ReconciliationSession<'a, P> {
    taxonomy: &'a mut Taxonomy,
    prompter: &'a mut P,
}

impl<'a, P> ReconciliationSession<'a, P>
where
    P: Prompter,
    P::Error: std::fmt::Display,
{
    /// Create a new session
    pub fn new(taxonomy: &'a mut Taxonomy, prompter: &'a mut P) -> Self {
        Self { taxonomy, prompter }
    }

    /// Resolve every candidate, partners first
    ///
    /// Candidates registered in the meantime (for example through an
    /// earlier correction) are skipped without a question.
    ///
    /// # Errors
    ///
    /// Only prompt I/O errors abort the session; append failures are
    /// collected in the report.
    pub fn run(mut self, candidates: &UnregisteredList) -> Result<ReconciliationReport, P::Error> {
        let mut report = ReconciliationReport::default();

        for kind in TaxonomyKind::ALL {
            let pending: Vec<&String> = candidates
                .get(kind)
                .iter()
                .filter(|c| !self.taxonomy.contains(kind, c))
                .collect();

            for (i, candidate) in pending.iter().enumerate() {
                // An earlier correction may have registered this one
                if self.taxonomy.contains(kind, candidate) {
                    debug!("'{}' registered during this session, skipping", candidate);
                    continue;
                }

                let question = question(kind, candidate, i + 1, pending.len());
                let answer = self.prompter.ask(&question)?;

                match Decision::from_answer(&answer) {
                    Decision::Skip => report.skipped.push((kind, candidate.to_string())),
                    Decision::Accept => self.append(kind, candidate, candidate, &mut report),
                    Decision::Correct(value) => {
                        self.append(kind, candidate, &value, &mut report)
                    }
                }
            }
        }

        info!(
            "Reconciliation finished: {} added, {} skipped, {} failed",
            report.added.len(),
            report.skipped.len(),
            report.failed.len()
        );

        Ok(report)
    }

    fn append(
        &mut self,
        kind: TaxonomyKind,
        candidate: &str,
        value: &str,
        report: &mut ReconciliationReport,
    ) {
        match self.taxonomy.append(kind, value) {
            Ok(true) => report.added.push(AddedEntry {
                kind,
                candidate: candidate.to_string(),
                value: value.trim().to_string(),
            }),
            Ok(false) => {
                debug!("'{}' already registered as {}", value, kind.as_str());
                report.skipped.push((kind, candidate.to_string()));
            }
            Err(error) => {
                warn!("Failed to register '{}': {}", value, error);
                report.failed.push(FailedEntry {
                    kind,
                    value: value.to_string(),
                    error,
                });
            }
        }
    }
}

/// Prompt text for one candidate
pub fn question(kind: TaxonomyKind, candidate: &str, position: usize, total: usize) -> String {
    format!(
        "[{}/{}] \"{}\" is not a registered {}. Register it?\n\
         Type \"y\" to register as is, type the correct name to register that instead, \
         or press Enter to skip: ",
        position,
        total,
        candidate,
        kind.as_str()
    )
}
