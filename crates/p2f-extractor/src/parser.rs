//! Parse LLM output into extracted fields

use crate::error::ExtractorError;
use p2f_domain::ExtractedFields;
use serde_json::{Map, Value};
use tracing::warn;

/// Parse an LLM response into the four document fields
///
/// Missing or null fields become empty strings; the amount is reduced to
/// its digits and is `"0"` when none remain.
pub fn parse_llm_response(response: &str) -> Result<ExtractedFields, ExtractorError> {
    let json_str = extract_json(response)?;

    let json: Value = serde_json::from_str(json_str)?;

    let obj = json
        .as_object()
        .ok_or_else(|| ExtractorError::InvalidFormat("Expected JSON object".to_string()))?;

    let date = field(obj, &["date"])?;
    let partner = field(obj, &["partner"])?;
    let document_type = field(obj, &["documentType", "document_type"])?;
    let amount = normalize_amount(&field(obj, &["amount"])?);

    Ok(ExtractedFields::new(date, partner, document_type, amount))
}

/// Extract JSON from response, handling markdown code blocks and prose
fn extract_json(response: &str) -> Result<&str, ExtractorError> {
    let trimmed = response.trim();

    // Check if wrapped in markdown code block
    let body = if let Some(rest) = trimmed.strip_prefix("```") {
        // Skip the opening fence line (```json or ```) and the closing fence
        let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
        rest.trim_end().strip_suffix("```").unwrap_or(rest)
    } else {
        trimmed
    };

    // Tolerate text before or after the object
    match (body.find('{'), body.rfind('}')) {
        (Some(start), Some(end)) if start < end => Ok(&body[start..=end]),
        _ => Err(ExtractorError::InvalidFormat(format!(
            "No JSON object in response: {}",
            truncate(trimmed, 80)
        ))),
    }
}

/// Read a string-or-number field under any of `keys`
fn field(obj: &Map<String, Value>, keys: &[&str]) -> Result<String, ExtractorError> {
    let Some(value) = keys.iter().find_map(|k| obj.get(*k)) else {
        warn!("Response has no '{}' field", keys[0]);
        return Ok(String::new());
    };
    match value {
        Value::String(s) => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(ExtractorError::InvalidFormat(format!(
            "Field '{}' must be a string or number, got {}",
            keys[0], other
        ))),
    }
}

/// Keep only digits (folding full-width ones); `"0"` if there are none
///
/// A decimal part is dropped, so `"1500.00"` becomes `"1500"`.
fn normalize_amount(raw: &str) -> String {
    let integral = raw.split('.').next().unwrap_or(raw);
    let digits: String = integral
        .chars()
        .map(|c| match c {
            '０'..='９' => char::from_u32(c as u32 - 0xFEE0).unwrap_or(c),
            _ => c,
        })
        .filter(char::is_ascii_digit)
        .collect();
    if digits.is_empty() {
        "0".to_string()
    } else {
        digits
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_json() {
        let response = r#"{"date": "20240115", "partner": "Acme Corp", "documentType": "請求書", "amount": "15000"}"#;
        let fields = parse_llm_response(response).unwrap();
        assert_eq!(
            fields,
            ExtractedFields::new("20240115", "Acme Corp", "請求書", "15000")
        );
    }

    #[test]
    fn test_parse_json_with_markdown_wrapper() {
        let response = "```json\n{\"date\": \"20240115\", \"partner\": \"Acme\", \"documentType\": \"領収書\", \"amount\": 300}\n```";
        let fields = parse_llm_response(response).unwrap();
        assert_eq!(fields.partner, "Acme");
        assert_eq!(fields.amount, "300");
    }

    #[test]
    fn test_parse_json_surrounded_by_prose() {
        let response = "Here is the result:\n{\"date\": 20240115, \"partner\": \"Acme\", \"documentType\": \"請求書\", \"amount\": \"0\"}\nHope this helps.";
        let fields = parse_llm_response(response).unwrap();
        assert_eq!(fields.date, "20240115");
    }

    #[test]
    fn test_amount_is_normalized() {
        let response = r#"{"date": "20240115", "partner": "Acme", "documentType": "請求書", "amount": "¥１５,０００"}"#;
        assert_eq!(parse_llm_response(response).unwrap().amount, "15000");

        let response = r#"{"date": "20240115", "partner": "Acme", "documentType": "請求書", "amount": 1500.5}"#;
        assert_eq!(parse_llm_response(response).unwrap().amount, "1500");
    }

    #[test]
    fn test_missing_amount_becomes_zero() {
        let response = r#"{"date": "20240115", "partner": "Acme", "documentType": "請求書", "amount": null}"#;
        assert_eq!(parse_llm_response(response).unwrap().amount, "0");

        let response = r#"{"date": "20240115", "partner": "Acme", "documentType": "請求書"}"#;
        assert_eq!(parse_llm_response(response).unwrap().amount, "0");
    }

    #[test]
    fn test_missing_text_fields_are_empty() {
        let response = r#"{"date": "20240115", "amount": "100"}"#;
        let fields = parse_llm_response(response).unwrap();
        assert_eq!(fields.partner, "");
        assert_eq!(fields.document_type, "");
    }

    #[test]
    fn test_snake_case_document_type_is_accepted() {
        let response = r#"{"date": "1", "partner": "A", "document_type": "納品書", "amount": "1"}"#;
        assert_eq!(parse_llm_response(response).unwrap().document_type, "納品書");
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(matches!(
            parse_llm_response("This is not JSON"),
            Err(ExtractorError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_llm_response("{date: 20240115}"),
            Err(ExtractorError::JsonParse(_))
        ));
    }

    #[test]
    fn test_parse_json_not_object() {
        let result = parse_llm_response(r#"["20240115", "Acme"]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_nested_value_is_rejected() {
        let response = r#"{"date": "1", "partner": {"name": "Acme"}, "documentType": "請求書", "amount": "1"}"#;
        assert!(matches!(
            parse_llm_response(response),
            Err(ExtractorError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_extract_json_from_markdown_without_language() {
        let response = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(extract_json(response).unwrap(), r#"{"key": "value"}"#);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("請求書請求書", 3), "請求書...");
        assert_eq!(truncate("short", 80), "short");
    }
}
