//! Reconciliation entry point
//!
//! Combines the policy stages and the diff engine:
//!
//! 1. naming-component attributes of both sides are folded into the ignore set
//! 2. both sides are filtered and base64-decoded
//! 3. names are case-folded when the policy configures it
//! 4. the diff engine computes the change set
//!
//! Decoding failures abort before any change set exists, so a malformed
//! document can never produce a partial write.

use crate::diff::{self, ChangeSet};
use crate::errors::Result;
use crate::model::{AttributeMap, Entry};
use crate::policy::TransformPolicy;
use crate::rdn;

/// Change set plus the values to send for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilePlan {
    pub change_set: ChangeSet,
    /// Decoded, filtered, normalized new state (named `entry_name`)
    pub payload: Entry,
}

impl ReconcilePlan {
    /// True when the directory does not need to be touched
    pub fn is_noop(&self) -> bool {
        self.change_set.is_empty()
    }

    /// Values for every added or changed attribute
    pub fn write_values(&self) -> AttributeMap {
        self.change_set
            .written_attributes()
            .filter_map(|name| {
                self.payload
                    .attributes
                    .get(name)
                    .map(|values| (name.to_string(), values.clone()))
            })
            .collect()
    }
}

/// Compute the change set moving `old` to `new` for the entry named `entry_name`
///
/// # Errors
///
/// Returns `MalformedEncoding` if either side holds an invalid base64 value in
/// an encoded attribute.
///
/// # Example
/// ```
/// use ldapsync_core::{reconcile, Entry, TransformPolicy};
///
/// let dn = "uid=jim,ou=users,dc=example,dc=com";
/// let old = Entry::new(dn).with_attribute("uid", ["jim"]).with_attribute("sn", ["Mit"]);
/// let new = Entry::new(dn).with_attribute("uid", ["jim"]).with_attribute("sn", ["Mitchell"]);
///
/// let changes = reconcile(&old, &new, &TransformPolicy::new(), dn).unwrap();
/// assert!(changes.changed.contains("sn"));
/// assert!(!changes.changed.contains("uid"));
/// ```
pub fn reconcile(
    old: &Entry,
    new: &Entry,
    policy: &TransformPolicy,
    entry_name: &str,
) -> Result<ChangeSet> {
    plan(old, new, policy, entry_name).map(|plan| plan.change_set)
}

/// Like [`reconcile`], also returning the write payload
///
/// # Errors
///
/// Returns `MalformedEncoding` if either side fails to decode.
pub fn plan(
    old: &Entry,
    new: &Entry,
    policy: &TransformPolicy,
    entry_name: &str,
) -> Result<ReconcilePlan> {
    let mut implied = rdn::implied_ignores(old, entry_name);
    implied.extend(rdn::implied_ignores(new, entry_name));
    let effective = policy.with_additional_ignores(implied);

    let old = effective.decode(old)?;
    let new = effective.decode(new)?;

    // Naming attributes that are also base64-encoded only show up once decoded.
    let mut late = rdn::implied_ignores(&old, entry_name);
    late.extend(rdn::implied_ignores(&new, entry_name));

    let old = effective.normalize_case(&old.without(&late));
    let new = effective.normalize_case(&new.without(&late));

    let change_set = diff::diff(&old, &new);
    tracing::debug!(
        dn = entry_name,
        deleted = change_set.deleted.len(),
        added = change_set.added.len(),
        changed = change_set.changed.len(),
        "computed change set"
    );

    Ok(ReconcilePlan {
        change_set,
        payload: Entry::with_attributes(entry_name, new.attributes),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    const DN: &str = "uid=jim,ou=users,dc=example,dc=com";

    fn names(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_naming_attribute_never_changes() {
        let old = Entry::new(DN).with_attribute("uid", ["jim"]);
        let new = Entry::new(DN);

        let changes = reconcile(&old, &new, &TransformPolicy::new(), DN).unwrap();
        assert!(changes.is_empty());
    }

    #[test]
    fn test_encoded_naming_attribute_is_detected_after_decode() {
        let policy = TransformPolicy::new().with_encode_names(["uid"]);
        // "amlt" is base64 for "jim"
        let old = Entry::new(DN).with_attribute("sn", ["Mit"]);
        let new = Entry::new(DN)
            .with_attribute("uid", ["amlt"])
            .with_attribute("sn", ["Mit"]);

        let changes = reconcile(&old, &new, &policy, DN).unwrap();
        assert!(changes.is_empty());
    }

    #[test]
    fn test_payload_holds_decoded_values() {
        let policy = TransformPolicy::new().with_encode_names(["sn"]);
        let old = Entry::new(DN).with_attribute("sn", ["TWl0"]);
        let new = Entry::new(DN)
            .with_attribute("sn", ["TWl0Y2hlbGw="])
            .with_attribute("cn", ["Jim Mit"]);

        let plan = plan(&old, &new, &policy, DN).unwrap();

        assert_eq!(plan.change_set.changed, names(&["sn"]));
        assert_eq!(plan.change_set.added, names(&["cn"]));
        let values = plan.write_values();
        assert_eq!(values["sn"], vec!["Mitchell".to_string()]);
        assert_eq!(values["cn"], vec!["Jim Mit".to_string()]);
    }

    #[test]
    fn test_case_spelling_difference_is_not_a_change() {
        let policy = TransformPolicy::new().with_case_sensitive_names(Vec::<String>::new());
        let old = Entry::new(DN).with_attribute("objectClass", ["inetOrgPerson"]);
        let new = Entry::new(DN).with_attribute("objectclass", ["inetOrgPerson"]);

        let plan = plan(&old, &new, &policy, DN).unwrap();
        assert!(plan.is_noop());
    }

    #[test]
    fn test_malformed_new_side_aborts() {
        let policy = TransformPolicy::new().with_encode_names(["sn"]);
        let old = Entry::new(DN).with_attribute("sn", ["TWl0"]);
        let new = Entry::new(DN).with_attribute("sn", ["not base64!"]);

        assert!(reconcile(&old, &new, &policy, DN).is_err());
    }
}
