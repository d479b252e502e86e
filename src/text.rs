// Free-text and identifier policy for the Swiss Payment Standards.
//
// Two character regimes apply: the Swiss character set used for names,
// addresses and remittance text, and the stricter SWIFT set used for
// identifiers and account references. Lengths are counted in Unicode
// code points, not bytes.

use lazy_static::lazy_static;
use regex::Regex;

use crate::errors::{PaymentError, Result};

lazy_static! {
    /// Characters outside the Swiss character set.
    static ref NON_SWISS: Regex = Regex::new(
        r##"[^A-Za-z0-9 .,:'/()?+\-!"#%&*;<>÷=@_$£\[\]{}`´~àáâäçèéêëìíîïñòóôöùúûüýßÀÁÂÄÇÈÉÊËÌÍÎÏÒÓÔÖÙÚÛÜÑ€ȘșȚț]"##
    )
    .unwrap();

    /// Characters outside the SWIFT character set.
    static ref NON_SWIFT: Regex = Regex::new(r"[^A-Za-z0-9 .,:'/()?+\-]").unwrap();

    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Sanitizes a string to conform to the Swiss character set.
///
/// Characters outside the permitted set are stripped, whitespace runs are
/// collapsed to a single space and the result is trimmed and truncated to
/// `max_length` code points. Never fails; the result may be empty.
/// Idempotent: sanitizing a sanitized string is a no-op.
pub fn sanitize(input: &str, max_length: usize) -> String {
    let collapsed = WHITESPACE.replace_all(input, " ");
    let stripped = NON_SWISS.replace_all(&collapsed, "");
    let collapsed = WHITESPACE.replace_all(&stripped, " ");
    let truncated: String = collapsed.trim().chars().take(max_length).collect();
    truncated.trim_end().to_string()
}

/// As [`sanitize`], but absent when the sanitized result is empty.
pub fn sanitize_optional(input: &str, max_length: usize) -> Option<String> {
    let sanitized = sanitize(input, max_length);
    if sanitized.is_empty() {
        None
    } else {
        Some(sanitized)
    }
}

/// Asserts that a string conforms to the Swiss character set and length.
///
/// Unlike [`sanitize`] the input is returned unchanged; anything that would
/// have to be mutated is an error instead.
pub fn assert_text(input: &str, max_length: usize) -> Result<&str> {
    assert_against(input, max_length, &NON_SWISS)
}

/// [`assert_text`] lifted over an optional input.
pub fn assert_optional(input: Option<&str>, max_length: usize) -> Result<Option<&str>> {
    match input {
        None => Ok(None),
        Some(value) => assert_text(value, max_length).map(Some),
    }
}

/// Asserts that a string is a valid ISO 20022 identifier.
///
/// Identifiers use the SWIFT character set with a maximum of 35 code
/// points and must not start with a slash or contain two consecutive
/// slashes.
pub fn assert_identifier(input: &str) -> Result<&str> {
    let input = assert_against(input, 35, &NON_SWIFT)?;
    if input.starts_with('/') || input.contains("//") {
        return Err(PaymentError::Validation(
            "The identifier contains unallowed slashes.".to_string(),
        ));
    }

    Ok(input)
}

/// Asserts that a string is a two-letter uppercase country code.
pub fn assert_country_code(input: &str) -> Result<&str> {
    if input.len() != 2 || !input.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(PaymentError::Validation(
            "The country code is invalid.".to_string(),
        ));
    }

    Ok(input)
}

/// Asserts SWIFT-character-set text, used for account references.
pub(crate) fn assert_swift(input: &str, max_length: usize) -> Result<&str> {
    assert_against(input, max_length, &NON_SWIFT)
}

fn assert_against<'a>(input: &'a str, max_length: usize, pattern: &Regex) -> Result<&'a str> {
    let length = input.chars().count();
    if length == 0 || length > max_length {
        return Err(PaymentError::Validation(format!(
            "The string can not be empty or longer than {} characters.",
            max_length
        )));
    }
    if pattern.is_match(input) {
        return Err(PaymentError::Validation(
            "The string contains invalid characters.".to_string(),
        ));
    }

    Ok(input)
}
