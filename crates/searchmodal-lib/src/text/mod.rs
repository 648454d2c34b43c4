use unicode_normalization::UnicodeNormalization;

/// Normalize text to Unicode NFC form and remove diacritical marks (accents).
pub fn normalize(input: &str) -> String {
    input
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036F}').contains(c))
        .nfc()
        .collect()
}

/// Matching key for search terms: accents stripped, lowercased, inner
/// whitespace collapsed, ends trimmed.
pub fn fold(input: &str) -> String {
    normalize(input)
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Case- and accent-insensitive equality.
pub fn eq_folded(a: &str, b: &str) -> bool {
    fold(a) == fold(b)
}

/// Case- and accent-insensitive substring test. An empty needle never matches.
pub fn contains_folded(haystack: &str, needle: &str) -> bool {
    let needle = fold(needle);
    !needle.is_empty() && fold(haystack).contains(&needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_removes_accents() {
        assert_eq!(normalize("café"), "cafe");
        assert_eq!(normalize("naïve"), "naive");
    }

    #[test]
    fn normalize_preserves_non_latin() {
        assert_eq!(normalize("日本語"), "日本語");
    }

    #[test]
    fn normalize_idempotent() {
        let once = normalize("Ångström café naïve");
        assert_eq!(once, normalize(&once));
    }

    #[test]
    fn fold_collapses_case_and_space() {
        assert_eq!(fold("  Child   Aggression SYNDROME "), "child aggression syndrome");
    }

    #[test]
    fn eq_folded_ignores_accents() {
        assert!(eq_folded("Māori Medium", "maori medium"));
        assert!(!eq_folded("Bullying", "Bullied"));
    }

    #[test]
    fn contains_folded_matches_substring() {
        assert!(contains_folded("UDL (Universal Design for Learning)", "lea"));
        assert!(contains_folded("Leadership", "LEA"));
        assert!(!contains_folded("Bullying", "lea"));
    }

    #[test]
    fn contains_folded_empty_needle() {
        assert!(!contains_folded("anything", "   "));
    }
}
