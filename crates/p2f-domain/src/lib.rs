//! p2f Domain Layer
//!
//! Core value types and trait boundaries for the PDF renaming pipeline.
//! Like every domain crate in this workspace it has ZERO external
//! dependencies; infrastructure (HTTP, filesystem, terminal) lives in the
//! other crates and plugs in through the traits defined here.
//!
//! ## Key Concepts
//!
//! - **ExtractedFields**: date, counterparty, document type and amount read
//!   out of one PDF by the extraction gateway
//! - **Taxonomy kinds**: the two open vocabularies (partners, document types)
//! - **Unregistered candidates**: extracted values that are not yet part of
//!   a taxonomy and need a human decision
//! - **Normalization**: the width/case folding used for every comparison

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod candidate;
pub mod fields;
pub mod normalize;
pub mod traits;

// Re-exports for convenience
pub use candidate::{TaxonomyKind, UnregisteredCandidate, UnregisteredList};
pub use fields::{ExtractedFields, Field};
pub use normalize::normalize;
pub use traits::{ExtractionGateway, LlmProvider, LlmRequest, Prompter};
