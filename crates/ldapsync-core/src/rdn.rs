//! Naming-component (RDN) detection
//!
//! Directory servers refuse a generic modify that would change the value an
//! entry is named by, so single-valued attributes that make up the leftmost
//! component of the entry's name must be excluded from write payloads and
//! from the change set. They stay visible on read.

use std::collections::BTreeSet;

use crate::model::Entry;

/// Separator between name components
pub const COMPONENT_SEPARATOR: char = ',';

/// Separator between the parts of a multi-valued RDN (`cn=Jim+uid=jim`)
pub const MULTI_VALUE_SEPARATOR: char = '+';

/// Attributes of `entry` that form the leftmost component of `name`
///
/// An attribute qualifies when it has exactly one value and `name` starts
/// with `attr=value,` (the separator keeps `cn=Jim` from matching
/// `cn=Jimmy,...`) or is exactly `attr=value`. Multi-valued attributes never
/// qualify.
///
/// # Example
/// ```
/// use ldapsync_core::{rdn::implied_ignores, Entry};
///
/// let entry = Entry::new("").with_attribute("uid", ["jim"]);
/// let implied = implied_ignores(&entry, "uid=jim,ou=users,dc=example,dc=com");
/// assert!(implied.contains("uid"));
/// ```
pub fn implied_ignores(entry: &Entry, name: &str) -> BTreeSet<String> {
    entry
        .attributes
        .iter()
        .filter_map(|(attribute, values)| match values.as_slice() {
            [value] => {
                let component = format!("{}={}", attribute, value);
                let is_naming = name == component
                    || name
                        .strip_prefix(component.as_str())
                        .is_some_and(|rest| rest.starts_with(COMPONENT_SEPARATOR));
                is_naming.then(|| attribute.clone())
            }
            _ => None,
        })
        .collect()
}

/// Parse the leftmost component of a distinguished name into
/// `(attribute, value)` pairs
///
/// Handles multi-valued RDNs and backslash-escaped separators. Values are
/// returned with their escapes intact. Parts without `=` are skipped.
///
/// # Example
/// ```
/// use ldapsync_core::rdn::rdn_attributes;
///
/// assert_eq!(
///     rdn_attributes("cn=Jim Mit+uid=jim,ou=users,dc=example,dc=com"),
///     vec![
///         ("cn".to_string(), "Jim Mit".to_string()),
///         ("uid".to_string(), "jim".to_string()),
///     ]
/// );
/// ```
pub fn rdn_attributes(name: &str) -> Vec<(String, String)> {
    split_unescaped(leftmost_component(name), MULTI_VALUE_SEPARATOR)
        .into_iter()
        .filter_map(|part| {
            let (attribute, value) = part.split_once('=')?;
            let attribute = attribute.trim();
            (!attribute.is_empty()).then(|| (attribute.to_string(), value.trim().to_string()))
        })
        .collect()
}

/// The name with its leftmost component removed, or `None` for a
/// single-component name
pub fn parent_name(name: &str) -> Option<&str> {
    let leftmost = leftmost_component(name);
    name.get(leftmost.len() + 1..).map(str::trim_start)
}

fn leftmost_component(name: &str) -> &str {
    split_unescaped(name, COMPONENT_SEPARATOR)
        .into_iter()
        .next()
        .unwrap_or("")
}

fn split_unescaped(input: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut escaped = false;

    for (index, ch) in input.char_indices() {
        match ch {
            '\\' if !escaped => escaped = true,
            c if c == separator && !escaped => {
                parts.push(&input[start..index]);
                start = index + c.len_utf8();
            }
            _ => escaped = false,
        }
    }
    parts.push(&input[start..]);
    parts
}
