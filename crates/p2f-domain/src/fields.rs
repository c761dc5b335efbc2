//! Extracted document fields

/// One of the four fields read out of a document
///
/// The placeholder names are the ones used in filename templates
/// (`{date}_{partner}_{documentType}_{amount}.pdf`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Document date, digits only in the configured date format
    Date,

    /// Counterparty name
    Partner,

    /// Document type (invoice, receipt, ...)
    DocumentType,

    /// Amount, digits only without separators
    Amount,
}

impl Field {
    /// All fields in template order
    pub const ALL: [Field; 4] = [Field::Date, Field::Partner, Field::DocumentType, Field::Amount];

    /// Placeholder name as written inside `{}` in a template
    pub fn placeholder(&self) -> &'static str {
        match self {
            Field::Date => "date",
            Field::Partner => "partner",
            Field::DocumentType => "documentType",
            Field::Amount => "amount",
        }
    }

    /// Parse a placeholder name
    pub fn from_placeholder(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.placeholder() == name)
    }

    /// Whether the field only ever holds digits
    pub fn is_numeric(&self) -> bool {
        matches!(self, Field::Date | Field::Amount)
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.placeholder())
    }
}

/// Metadata extracted from a single PDF
///
/// Produced once per file by the extraction gateway and never modified
/// afterwards. `amount` is digit-only text and `"0"` when the document
/// carries no amount.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtractedFields {
    /// Document date (e.g. `20240115`)
    pub date: String,

    /// Counterparty name
    pub partner: String,

    /// Document type
    pub document_type: String,

    /// Amount without separators
    pub amount: String,
}

impl ExtractedFields {
    /// Create a new set of fields
    pub fn new(
        date: impl Into<String>,
        partner: impl Into<String>,
        document_type: impl Into<String>,
        amount: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            partner: partner.into(),
            document_type: document_type.into(),
            amount: amount.into(),
        }
    }

    /// Value of a field
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Date => &self.date,
            Field::Partner => &self.partner,
            Field::DocumentType => &self.document_type,
            Field::Amount => &self.amount,
        }
    }
}
