//! Text matching utilities for token assertions

/// Text matching strategies for assertions
#[derive(Debug, Clone)]
pub enum TextMatch {
    Exact(String),
    StartsWith(String),
    Contains(String),
}

impl TextMatch {
    pub fn matches(&self, actual: &str) -> bool {
        match self {
            TextMatch::Exact(expected) => actual == expected,
            TextMatch::StartsWith(prefix) => actual.starts_with(prefix),
            TextMatch::Contains(substring) => actual.contains(substring),
        }
    }

    /// Assert that the actual text matches this pattern
    pub fn assert(&self, actual: &str, context: &str) {
        match self {
            TextMatch::Exact(expected) => {
                assert_eq!(
                    actual, expected,
                    "{context}: Expected text to be {expected:?}, but got {actual:?}"
                );
            }
            TextMatch::StartsWith(prefix) => {
                assert!(
                    actual.starts_with(prefix),
                    "{context}: Expected text to start with {prefix:?}, but got {actual:?}"
                );
            }
            TextMatch::Contains(substring) => {
                assert!(
                    actual.contains(substring),
                    "{context}: Expected text to contain {substring:?}, but got {actual:?}"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches() {
        assert!(TextMatch::Exact("a b".to_string()).matches("a b"));
        assert!(TextMatch::StartsWith("a".to_string()).matches("a b"));
        assert!(TextMatch::Contains(" b".to_string()).matches("a b"));
        assert!(!TextMatch::Exact("a".to_string()).matches("a b"));
    }

    #[test]
    #[should_panic(expected = "Expected text to start with")]
    fn test_assert_panics_with_context() {
        TextMatch::StartsWith("z".to_string()).assert("abc", "items[0]");
    }
}
