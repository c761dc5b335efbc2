//! Normalization used for every taxonomy comparison
//!
//! LLM output and stored taxonomy entries frequently differ only in
//! character width or case ("ＡＣＭＥ" vs "acme"), so membership tests and
//! candidate de-duplication compare normalized forms, never raw strings.

/// Offset between a full-width ASCII variant and its half-width form
const FULL_WIDTH_OFFSET: u32 = 0xFEE0;

/// Normalize a value for comparison
///
/// Trims surrounding whitespace, folds the ideographic space to an ASCII
/// space, folds full-width Latin letters and digits to half-width, and
/// lowercases the result.
///
/// # Examples
///
/// ```
/// use p2f_domain::normalize;
///
/// assert_eq!(normalize("  ＡＣＭＥ Corp "), "acme corp");
/// assert_eq!(normalize("請求書"), "請求書");
/// ```
pub fn normalize(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(fold_width)
        .collect::<String>()
        .to_lowercase()
}

/// Fold a single full-width character to its half-width counterpart
fn fold_width(c: char) -> char {
    match c {
        '\u{3000}' => ' ',
        'Ａ'..='Ｚ' | 'ａ'..='ｚ' | '０'..='９' => {
            char::from_u32(c as u32 - FULL_WIDTH_OFFSET).unwrap_or(c)
        }
        _ => c,
    }
}
