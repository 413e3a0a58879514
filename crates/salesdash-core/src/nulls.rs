//! Null-token vocabulary shared by the orders loader and the missing-value report.

/// Field values treated as missing, in addition to the empty string.
const NULL_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Returns `true` when a raw CSV field should be treated as missing.
///
/// Surrounding whitespace is ignored, so `"  "` and `" NA "` are both null.
#[must_use]
pub fn is_null_token(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || NULL_TOKENS.contains(&trimmed)
}
