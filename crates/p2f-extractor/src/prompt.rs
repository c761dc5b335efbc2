//! LLM prompt engineering for field extraction

use crate::config::ExtractorConfig;

/// Builds the instruction sent alongside every PDF
///
/// The prompt does not depend on the document, so it is built once per run.
pub struct PromptBuilder<'a> {
    config: &'a ExtractorConfig,
    partners: &'a [String],
    document_types: &'a [String],
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(config: &'a ExtractorConfig) -> Self {
        Self {
            config,
            partners: &[],
            document_types: &[],
        }
    }

    /// Known trading partners the model should prefer
    pub fn with_partners(mut self, partners: &'a [String]) -> Self {
        self.partners = partners;
        self
    }

    /// Known document types the model should prefer
    pub fn with_document_types(mut self, document_types: &'a [String]) -> Self {
        self.document_types = document_types;
        self
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        // 1. Task and response shape
        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\n");

        // 2. Field rules
        prompt.push_str("## Values\n");
        prompt.push_str(&format!(
            "- date: the document date in {} format.\n",
            self.config.date_format
        ));
        prompt.push_str(
            "- partner: prefer a name from the trading partner list below; \
             if none matches, take the name from the document.\n",
        );
        prompt.push_str(
            "- documentType: prefer a type from the document type list below; \
             if none matches, choose a fitting new type.\n",
        );
        prompt.push_str(
            "- amount: the total as half-width digits without separators; \
             0 if the document has no amount.\n\n",
        );

        // 3. Own company exclusion
        if let Some(names) = self.own_company_names() {
            prompt.push_str("## Notes\n");
            prompt.push_str(&format!(
                "- {} is our own company; never use it as the partner.\n\n",
                names
            ));
        }

        // 4. Known vocabularies
        prompt.push_str("## Trading partner list\n");
        prompt.push_str(&self.partners.join(","));
        prompt.push_str("\n\n## Document type list\n");
        prompt.push_str(&self.document_types.join(","));
        prompt.push('\n');

        // 5. Operator additions
        if let Some(extra) = self
            .config
            .extra_prompt
            .as_deref()
            .filter(|s| !s.trim().is_empty())
        {
            prompt.push_str("\n## Additional instructions\n");
            prompt.push_str(extra);
            prompt.push('\n');
        }

        prompt
    }

    fn own_company_names(&self) -> Option<String> {
        let names: Vec<&str> = std::iter::once(self.config.company_name.as_str())
            .chain(self.config.company_aliases.iter().map(String::as_str))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        match names.as_slice() {
            [] => None,
            [name] => Some(format!("\"{}\"", name)),
            _ => Some(
                names
                    .iter()
                    .map(|n| format!("\"{}\"", n))
                    .collect::<Vec<_>>()
                    .join(" or "),
            ),
        }
    }
}

const EXTRACTION_INSTRUCTIONS: &str = r#"## Task
Extract the following information from the attached PDF and output it as JSON.

## Response format
{"date": "...", "partner": "...", "documentType": "...", "amount": "..."}

- Output a single JSON object parseable by a strict JSON parser.
- Quote every property name with double quotes.
- Do not wrap the JSON in a code block and do not add explanations."#;
