//! Document number normalization

/// Strip every character that is not an ASCII decimal digit.
///
/// `"12.345.678/0001-90"` becomes `"12345678000190"`. Idempotent.
pub fn normalize_document(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}
