//! Change set computation.
//!
//! Pure set and multiset comparison. No policy logic lives here; callers
//! filter, decode and case-normalize both sides first.

use std::collections::BTreeSet;

use crate::diff::model::ChangeSet;
use crate::model::Entry;

/// Compute the change set that moves `old` to `new`
pub fn diff(old: &Entry, new: &Entry) -> ChangeSet {
    let old_names: BTreeSet<&String> = old.attributes.keys().collect();
    let new_names: BTreeSet<&String> = new.attributes.keys().collect();

    let deleted = old_names
        .difference(&new_names)
        .map(|name| (*name).clone())
        .collect();
    let added = new_names
        .difference(&old_names)
        .map(|name| (*name).clone())
        .collect();
    let changed = old_names
        .intersection(&new_names)
        .filter(|name| !same_values(&old.attributes[name.as_str()], &new.attributes[name.as_str()]))
        .map(|name| (*name).clone())
        .collect();

    ChangeSet {
        deleted,
        added,
        changed,
    }
}

/// True when no attribute would be deleted, added or replaced
pub fn equivalent(old: &Entry, new: &Entry) -> bool {
    diff(old, new).is_empty()
}

/// Compare two value lists as multisets
fn same_values(a: &[String], b: &[String]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut a: Vec<&String> = a.iter().collect();
    let mut b: Vec<&String> = b.iter().collect();
    a.sort_unstable();
    b.sort_unstable();
    a == b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_order_is_ignored() {
        let old = Entry::new("").with_attribute("objectClass", ["top", "person"]);
        let new = Entry::new("").with_attribute("objectClass", ["person", "top"]);
        assert!(equivalent(&old, &new));
    }

    #[test]
    fn test_duplicate_values_count() {
        let old = Entry::new("").with_attribute("description", ["a", "a", "b"]);
        let new = Entry::new("").with_attribute("description", ["a", "b", "b"]);
        assert_eq!(
            diff(&old, &new).changed,
            BTreeSet::from(["description".to_string()])
        );
    }

    #[test]
    fn test_value_change_is_replace() {
        let old = Entry::new("").with_attribute("sn", ["Mit"]);
        let new = Entry::new("").with_attribute("sn", ["Mitchell"]);

        let changes = diff(&old, &new);
        assert!(changes.added.is_empty());
        assert!(changes.deleted.is_empty());
        assert_eq!(changes.changed, BTreeSet::from(["sn".to_string()]));
    }

    #[test]
    fn test_names_compare_exactly() {
        // Case folding is the caller's job.
        let old = Entry::new("").with_attribute("CN", ["Jim"]);
        let new = Entry::new("").with_attribute("cn", ["Jim"]);

        let changes = diff(&old, &new);
        assert_eq!(changes.deleted, BTreeSet::from(["CN".to_string()]));
        assert_eq!(changes.added, BTreeSet::from(["cn".to_string()]));
    }
}
