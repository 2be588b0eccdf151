//! Attribute-name pattern matching
//!
//! Patterns use `regex` search semantics: a pattern matches when it matches
//! anywhere in the attribute name, so `Name` matches `givenName`. Authors
//! anchor with `^`/`$` when they mean the whole name.

use regex::Regex;

use crate::errors::{LdapSyncError, Result};

/// An ordered, pre-compiled set of attribute-name patterns
///
/// Compiled once at policy construction and reused for every attribute of
/// every entry. Cloning shares the compiled programs.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<Regex>,
}

impl PatternSet {
    /// A set that matches nothing
    pub fn empty() -> Self {
        Self::default()
    }

    /// Compile every pattern, failing on the first one that does not compile
    ///
    /// # Errors
    ///
    /// Returns `InvalidPattern` naming the offending pattern.
    ///
    /// # Example
    /// ```
    /// use ldapsync_core::pattern::PatternSet;
    ///
    /// let set = PatternSet::compile(["^g.*", "Photo$"]).unwrap();
    /// assert!(set.matches_any("givenName"));
    /// assert!(set.matches_any("jpegPhoto"));
    /// assert!(!set.matches_any("sn"));
    ///
    /// assert!(PatternSet::compile(["(unclosed"]).is_err());
    /// ```
    pub fn compile<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                Regex::new(pattern).map_err(|e| LdapSyncError::InvalidPattern {
                    pattern: pattern.to_string(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { patterns })
    }

    /// Append another compiled set, keeping configuration order
    pub fn extend(&mut self, other: PatternSet) {
        self.patterns.extend(other.patterns);
    }

    /// True if any pattern matches somewhere in `name`
    pub fn matches_any(&self, name: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(name))
    }

    /// Source text of the compiled patterns, in configuration order
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(Regex::as_str)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Free-function form of [`PatternSet::matches_any`]
pub fn matches_any(name: &str, patterns: &PatternSet) -> bool {
    patterns.matches_any(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extend_keeps_both_sets() {
        let mut set = PatternSet::compile(["^g"]).unwrap();
        set.extend(PatternSet::compile(["Photo$"]).unwrap());

        assert_eq!(set.sources().collect::<Vec<_>>(), vec!["^g", "Photo$"]);
        assert!(set.matches_any("givenName"));
        assert!(set.matches_any("jpegPhoto"));
    }

    #[test]
    fn test_empty_set_matches_nothing() {
        let set = PatternSet::empty();
        assert!(!set.matches_any("cn"));
        assert!(!set.matches_any(""));
        assert!(set.is_empty());
    }

    #[test]
    fn test_search_semantics_match_inside_name() {
        let set = PatternSet::compile(["Name"]).unwrap();
        assert!(set.matches_any("givenName"));
        assert!(set.matches_any("displayName"));
        assert!(!set.matches_any("sn"));
    }

    #[test]
    fn test_anchored_pattern_only_matches_prefix() {
        let set = PatternSet::compile(["^g.*"]).unwrap();
        assert!(set.matches_any("givenName"));
        assert!(!set.matches_any("sn"));
        assert!(!set.matches_any("objectClass"));
    }

    #[test]
    fn test_invalid_pattern_names_offender() {
        let err = PatternSet::compile(["^ok$", "[broken"]).unwrap_err();
        match err {
            LdapSyncError::InvalidPattern { pattern, .. } => assert_eq!(pattern, "[broken"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_sources_preserve_order() {
        let set = PatternSet::compile(["b", "a", "c"]).unwrap();
        assert_eq!(set.sources().collect::<Vec<_>>(), vec!["b", "a", "c"]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_free_function_delegates() {
        let set = PatternSet::compile(["^mail"]).unwrap();
        assert!(matches_any("mailAlternateAddress", &set));
        assert!(!matches_any("email", &set));
    }
}
