//! Attribute-name case folding
//!
//! Directory servers treat attribute names case-insensitively, but documents
//! and server responses do not agree on spelling (`CN` vs `cn`). Folding both
//! sides before diffing keeps spelling differences out of the change set.

use std::collections::BTreeSet;

use crate::model::{AttributeMap, Entry};

/// Fold every attribute name to lower case except those listed in
/// `case_sensitive_names` (matched case-insensitively)
///
/// When two names fold to the same key, the later one in ascending byte order
/// of the original names wins (`CN` < `Cn` < `cN` < `cn`). Each collision is
/// logged at `warn`. Values are never modified.
///
/// # Example
/// ```
/// use ldapsync_core::{case::normalize, Entry};
/// use std::collections::BTreeSet;
///
/// let entry = Entry::new("")
///     .with_attribute("CN", ["Jim Mit"])
///     .with_attribute("SN", ["Mit"]);
/// let exceptions = BTreeSet::from(["cn".to_string()]);
///
/// let folded = normalize(&entry, &exceptions);
/// assert!(folded.contains("CN"));
/// assert!(folded.contains("sn"));
/// ```
pub fn normalize(entry: &Entry, case_sensitive_names: &BTreeSet<String>) -> Entry {
    let exceptions: BTreeSet<String> = case_sensitive_names
        .iter()
        .map(|name| name.to_lowercase())
        .collect();

    let mut attributes = AttributeMap::new();
    for (name, values) in &entry.attributes {
        let folded = name.to_lowercase();
        let key = if exceptions.contains(&folded) {
            name.clone()
        } else {
            folded
        };

        if attributes.insert(key.clone(), values.clone()).is_some() {
            tracing::warn!(
                dn = entry.name.as_str(),
                attribute = name.as_str(),
                folded = key.as_str(),
                "attribute name collides after case folding; later spelling wins"
            );
        }
    }

    Entry::with_attributes(entry.name.clone(), attributes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exceptions(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_fold_with_exception() {
        let entry = Entry::new("")
            .with_attribute("CN", ["Jim Mit"])
            .with_attribute("SN", ["Mit"]);

        let folded = normalize(&entry, &exceptions(&["cn"]));

        let expected = Entry::new("")
            .with_attribute("CN", ["Jim Mit"])
            .with_attribute("sn", ["Mit"]);
        assert_eq!(folded, expected);
    }

    #[test]
    fn test_empty_exception_list_folds_everything() {
        let entry = Entry::new("")
            .with_attribute("objectClass", ["inetOrgPerson"])
            .with_attribute("givenName", ["Jim"]);

        let folded = normalize(&entry, &BTreeSet::new());

        assert_eq!(
            folded.attribute_names(),
            BTreeSet::from(["givenname", "objectclass"])
        );
    }

    #[test]
    fn test_values_are_untouched() {
        let entry = Entry::new("").with_attribute("MAIL", ["Jim@Example.COM"]);
        let folded = normalize(&entry, &BTreeSet::new());
        assert_eq!(
            folded.values("mail"),
            Some(&["Jim@Example.COM".to_string()][..])
        );
    }

    #[test]
    fn test_collision_later_spelling_wins() {
        // Byte order: "Mail" < "mail"
        let entry = Entry::new("")
            .with_attribute("Mail", ["first@example.com"])
            .with_attribute("mail", ["second@example.com"]);

        let folded = normalize(&entry, &BTreeSet::new());

        assert_eq!(folded.len(), 1);
        assert_eq!(
            folded.values("mail"),
            Some(&["second@example.com".to_string()][..])
        );
    }

    #[test]
    fn test_collision_with_exempt_spelling_keeps_both() {
        // Exempt names keep their spelling, so differently-cased spellings stay distinct.
        let entry = Entry::new("")
            .with_attribute("CN", ["upper"])
            .with_attribute("cn", ["lower"]);

        let folded = normalize(&entry, &exceptions(&["CN"]));

        assert_eq!(folded.values("CN"), Some(&["upper".to_string()][..]));
        assert_eq!(folded.values("cn"), Some(&["lower".to_string()][..]));
    }
}
