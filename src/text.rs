//! Helpers for comparing recognized text

use strsim::normalized_levenshtein;

/// Collapse every whitespace run to a single space and trim the ends
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Similarity (0.0 - 1.0) of the alphabetic content of two strings.
/// Case is kept; digits, punctuation and whitespace are ignored.
pub fn similarity(expected: &str, actual: &str) -> f64 {
    let letters = |s: &str| s.chars().filter(|c| c.is_alphabetic()).collect::<String>();
    normalized_levenshtein(&letters(expected), &letters(actual))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  Hello \n\n World!\x0c\n"), "Hello World!");
        assert_eq!(normalize_whitespace(""), "");
        assert_eq!(normalize_whitespace("\n \t"), "");
    }

    #[test]
    fn test_normalize_keeps_case() {
        assert_eq!(normalize_whitespace("HeLLo\tworld"), "HeLLo world");
    }

    #[test]
    fn test_similarity_identical_letters() {
        assert!((similarity("Hello World!", "Hello\nWorld") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_similarity_with_ocr_noise() {
        let score = similarity("Hello World!", "He1lo Wor1d!");
        assert!(score > 0.7 && score < 1.0);
    }

    #[test]
    fn test_similarity_unrelated() {
        assert!(similarity("Hello World!", "zzzz") < 0.2);
    }
}
