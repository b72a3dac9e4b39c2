//! Free-text search terms
//!
//! Terms are lowercased alphanumeric words: every run of other characters
//! separates words, so `ada@example.com` is `ada`, `example` and `com`.
//! A task matches when any term equals a word of its title or description.
//! The `tasks.search_vector` column blanks the same characters before the
//! `simple` parser sees the text, so both stores split words alike.

/// Non-empty, deduplicated list of search words
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchText {
    terms: Vec<String>,
}

impl SearchText {
    /// `None` when the input holds no words
    pub fn new(raw: &str) -> Option<Self> {
        let mut terms: Vec<String> = Vec::new();
        for word in words(raw) {
            if !terms.contains(&word) {
                terms.push(word);
            }
        }
        (!terms.is_empty()).then_some(Self { terms })
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// `to_tsquery` input: terms OR'd together
    pub fn to_tsquery(&self) -> String {
        self.terms.join(" | ")
    }

    pub fn matches(&self, title: &str, description: &str) -> bool {
        words(title)
            .chain(words(description))
            .any(|word| self.terms.contains(&word))
    }
}

fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terms_normalized() {
        let search = SearchText::new("  Ship, the RELEASE ship!").unwrap();
        assert_eq!(search.terms(), ["ship", "the", "release"]);
        assert_eq!(search.to_tsquery(), "ship | the | release");
    }

    #[test]
    fn test_operators_are_stripped() {
        let search = SearchText::new("a&b | !c:*").unwrap();
        assert_eq!(search.terms(), ["a", "b", "c"]);
    }

    #[test]
    fn test_empty_search() {
        assert!(SearchText::new("").is_none());
        assert!(SearchText::new(" &|! ").is_none());
    }

    #[test]
    fn test_matches_whole_words() {
        let search = SearchText::new("deploy").unwrap();
        assert!(search.matches("Deploy the app", ""));
        assert!(search.matches("", "then deploy."));
        assert!(!search.matches("Deployment", "redeploy"));
    }

    #[test]
    fn test_emails_and_urls_split_into_words() {
        let search = SearchText::new("example").unwrap();
        assert!(search.matches("Email ada@example.com", ""));
        assert!(search.matches("", "see https://docs.example.org/setup"));

        let search = SearchText::new("ada@example.com").unwrap();
        assert_eq!(search.terms(), ["ada", "example", "com"]);
        assert!(search.matches("Reply to ada", ""));
    }
}
