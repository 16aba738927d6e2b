use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for ISO language code handling
///
/// The recognition engine accepts an ISO 639-1 code or the sentinel "auto"
/// for language detection. This module validates what the user typed before
/// the request goes over the wire.
/// Languages the bundled recognition models were evaluated on, in the order
/// the UI presents them.
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("auto", "Auto-detect"),
    ("pt", "Portuguese"),
    ("en", "English"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("de", "German"),
    ("it", "Italian"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("zh", "Chinese"),
];

/// Codes and display names of the supported languages
pub fn supported_languages() -> impl Iterator<Item = (&'static str, &'static str)> {
    SUPPORTED_LANGUAGES.iter().copied()
}

/// Validate a language code, accepting the "auto" sentinel
pub fn validate_language_or_auto(code: &str) -> Result<()> {
    let normalized = code.trim().to_lowercase();
    if normalized == "auto" {
        return Ok(());
    }
    validate_language_code(&normalized).map(|_| ())
}

/// Validate that a code is a real ISO 639-1 or ISO 639-3 language code
pub fn validate_language_code(code: &str) -> Result<Language> {
    let normalized = code.trim().to_lowercase();

    match normalized.len() {
        2 => Language::from_639_1(&normalized)
            .ok_or_else(|| anyhow!("Invalid language code: {}", code)),
        3 => Language::from_639_3(&normalized)
            .ok_or_else(|| anyhow!("Invalid language code: {}", code)),
        _ => Err(anyhow!("Invalid language code: {}", code)),
    }
}

/// Check if two language codes represent the same language
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (validate_language_code(code1), validate_language_code(code2)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Get the English language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    if code.trim().eq_ignore_ascii_case("auto") {
        return Ok("Auto-detect".to_string());
    }
    let lang = validate_language_code(code)?;
    Ok(lang.to_name().to_string())
}
