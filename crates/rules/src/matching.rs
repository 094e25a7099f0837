//! Ordered keyword rule tables
//!
//! Free-text classifiers are written as a list of rules evaluated top to
//! bottom; the first rule with a matching keyword wins.

/// One row of a rule table
#[derive(Debug, Clone, Copy)]
pub(crate) struct KeywordRule<T> {
    /// Matched as substrings of the lowercased text
    pub keywords: &'static [&'static str],
    /// Matched against whole words only
    pub words: &'static [&'static str],
    pub label: T,
}

impl<T: Copy> KeywordRule<T> {
    pub const fn new(keywords: &'static [&'static str], label: T) -> Self {
        Self {
            keywords,
            words: &[],
            label,
        }
    }

    pub const fn with_words(
        keywords: &'static [&'static str],
        words: &'static [&'static str],
        label: T,
    ) -> Self {
        Self {
            keywords,
            words,
            label,
        }
    }

    /// `text` must already be lowercased
    pub fn matches(&self, text: &str) -> bool {
        contains_any(text, self.keywords)
            || (!self.words.is_empty()
                && text
                    .split(|c: char| !c.is_alphanumeric())
                    .any(|word| self.words.contains(&word)))
    }
}

/// Label of the first matching rule
pub(crate) fn first_match<T: Copy>(text: &str, rules: &[KeywordRule<T>]) -> Option<T> {
    rules.iter().find(|rule| rule.matches(text)).map(|rule| rule.label)
}

pub(crate) fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| text.contains(needle))
}

/// Lowercased, space-joined concatenation of the non-empty parts
pub(crate) fn joined_lowercase(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: [KeywordRule<u8>; 2] = [
        KeywordRule::with_words(&["alpha"], &["ab"], 1),
        KeywordRule::new(&["beta"], 2),
    ];

    #[test]
    fn test_first_rule_wins() {
        assert_eq!(first_match("beta alpha", &RULES), Some(1));
        assert_eq!(first_match("beta", &RULES), Some(2));
        assert_eq!(first_match("gamma", &RULES), None);
    }

    #[test]
    fn test_word_match_is_whole_word() {
        assert_eq!(first_match("utm=ab", &RULES), Some(1));
        assert_eq!(first_match("lab", &RULES), None);
    }

    #[test]
    fn test_joined_lowercase_skips_blanks() {
        assert_eq!(joined_lowercase(&["  Google ", "", " CPC"]), "google cpc");
        assert_eq!(joined_lowercase(&["", "  "]), "");
    }
}
