//! In-memory directory
//!
//! A [`DirectoryClient`] backed by a map from normalized entry name to
//! [`Entry`]. It enforces the server-side rules the commands depend on:
//!
//! - entries can only be added under an existing parent or a naming context
//! - the naming attribute values are stored on add and cannot be modified away
//! - non-recursive deletes refuse entries with children
//!
//! Names compare case-insensitively. Search scope is always the subtree.

pub mod filter;

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use ldapsync_core::diff::ModifyOp;
use ldapsync_core::errors::{LdapSyncError, Result};
use ldapsync_core::rdn;
use ldapsync_core::settings::ALL_USER_ATTRIBUTES;
use ldapsync_core::{AttributeMap, ChangeSet, Entry};

use crate::directory::{DirectoryClient, MATCH_ALL_FILTER};
use filter::{values_of, Filter};

/// Thread-safe directory tree held in memory
///
/// # Example
/// ```
/// use ldapsync_core::Entry;
/// use ldapsync_engine::{DirectoryClient, InMemoryDirectory};
///
/// let directory = InMemoryDirectory::new(["dc=example,dc=com"]);
/// directory
///     .add(&Entry::new("ou=users,dc=example,dc=com").with_attribute("objectClass", ["organizationalUnit"]))
///     .unwrap();
///
/// let found = directory.search_one("dc=example,dc=com", "(ou=users)", &[]).unwrap();
/// assert_eq!(found.values("ou"), Some(&["users".to_string()][..]));
/// ```
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    naming_contexts: Vec<String>,
    entries: RwLock<BTreeMap<String, Entry>>,
}

impl InMemoryDirectory {
    /// Create an empty directory serving the given suffixes
    pub fn new<I, S>(naming_contexts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            naming_contexts: naming_contexts
                .into_iter()
                .map(|name| normalize(name.as_ref()))
                .collect(),
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_naming_context(&self, key: &str) -> bool {
        self.naming_contexts.iter().any(|context| context == key)
    }

    fn read_guard(&self, name: &str) -> Result<RwLockReadGuard<'_, BTreeMap<String, Entry>>> {
        self.entries.read().map_err(|_| poisoned(name))
    }

    fn write_guard(&self, name: &str) -> Result<RwLockWriteGuard<'_, BTreeMap<String, Entry>>> {
        self.entries.write().map_err(|_| poisoned(name))
    }

    fn search(&self, base: &str, filter: &str, requested: &[String]) -> Result<Vec<Entry>> {
        let parsed = Filter::parse(filter).map_err(|e| LdapSyncError::Directory {
            entry_name: base.to_string(),
            reason: e.to_string(),
        })?;

        let entries = self.read_guard(base)?;
        let base_key = normalize(base);
        if !self.is_naming_context(&base_key) && !entries.contains_key(&base_key) {
            return Err(LdapSyncError::EntryNotFound {
                base: base.to_string(),
                filter: filter.to_string(),
            });
        }

        Ok(entries
            .iter()
            .filter(|(key, entry)| is_within(key, &base_key) && parsed.matches(entry))
            .map(|(_, entry)| project(entry, requested))
            .collect())
    }
}

impl DirectoryClient for InMemoryDirectory {
    fn read(&self, name: &str, requested_attributes: &[String]) -> Result<Entry> {
        self.read_guard(name)?
            .get(&normalize(name))
            .map(|entry| project(entry, requested_attributes))
            .ok_or_else(|| not_found(name))
    }

    fn search_one(
        &self,
        base: &str,
        filter: &str,
        requested_attributes: &[String],
    ) -> Result<Entry> {
        let mut matches = self.search(base, filter, requested_attributes)?;
        match matches.len() {
            0 => Err(LdapSyncError::EntryNotFound {
                base: base.to_string(),
                filter: filter.to_string(),
            }),
            1 => Ok(matches.remove(0)),
            count => Err(LdapSyncError::AmbiguousResult {
                base: base.to_string(),
                filter: filter.to_string(),
                count,
            }),
        }
    }

    fn search_many(
        &self,
        base: &str,
        filter: &str,
        requested_attributes: &[String],
        page_size: usize,
    ) -> Result<Vec<Entry>> {
        let matches = self.search(base, filter, requested_attributes)?;
        if page_size == 0 {
            return Ok(matches);
        }

        let mut collected = Vec::with_capacity(matches.len());
        for (page, chunk) in matches.chunks(page_size).enumerate() {
            tracing::debug!(base, page, size = chunk.len(), "search page");
            collected.extend_from_slice(chunk);
        }
        Ok(collected)
    }

    fn add(&self, entry: &Entry) -> Result<()> {
        let key = normalize(&entry.name);
        let mut entries = self.write_guard(&entry.name)?;

        if entries.contains_key(&key) {
            return Err(LdapSyncError::EntryAlreadyExists {
                entry_name: entry.name.clone(),
            });
        }

        let parent_exists = rdn::parent_name(&entry.name)
            .map(normalize)
            .is_some_and(|parent| self.is_naming_context(&parent) || entries.contains_key(&parent));
        if !parent_exists && !self.is_naming_context(&key) {
            return Err(directory_error(&entry.name, "parent entry does not exist"));
        }

        let mut stored = entry.clone();
        for (attribute, value) in rdn::rdn_attributes(&entry.name) {
            ensure_value(&mut stored, &attribute, unescape_name_value(&value));
        }

        tracing::debug!(dn = entry.name.as_str(), attributes = stored.len(), "entry added");
        entries.insert(key, stored);
        Ok(())
    }

    fn apply_change_set(&self, name: &str, changes: &ChangeSet, values: &AttributeMap) -> Result<()> {
        let key = normalize(name);
        let mut entries = self.write_guard(name)?;
        let mut updated = entries.get(&key).cloned().ok_or_else(|| not_found(name))?;

        for modification in changes.modifications() {
            let attribute = modification.attribute;
            let existing = stored_name(&updated, attribute);

            match modification.op {
                ModifyOp::Delete => {
                    let existing = existing.ok_or_else(|| {
                        directory_error(name, &format!("no such attribute: {}", attribute))
                    })?;
                    updated.attributes.remove(&existing);
                }
                ModifyOp::Add => {
                    if existing.is_some() {
                        return Err(directory_error(
                            name,
                            &format!("attribute already exists: {}", attribute),
                        ));
                    }
                    let new_values = values_for(name, values, attribute)?;
                    if new_values.is_empty() {
                        return Err(directory_error(
                            name,
                            &format!("no values to add for {}", attribute),
                        ));
                    }
                    updated.attributes.insert(attribute.to_string(), new_values);
                }
                ModifyOp::Replace => {
                    if let Some(existing) = existing {
                        updated.attributes.remove(&existing);
                    }
                    let new_values = values_for(name, values, attribute)?;
                    if !new_values.is_empty() {
                        updated.attributes.insert(attribute.to_string(), new_values);
                    }
                }
            }
        }

        for (attribute, value) in rdn::rdn_attributes(name) {
            let value = unescape_name_value(&value);
            let kept = values_of(&updated, &attribute)
                .is_some_and(|values| values.iter().any(|v| v.eq_ignore_ascii_case(&value)));
            if !kept {
                return Err(directory_error(
                    name,
                    &format!("naming attribute {} must keep value {:?}", attribute, value),
                ));
            }
        }

        tracing::debug!(dn = name, changes = %changes, "entry modified");
        entries.insert(key, updated);
        Ok(())
    }

    fn delete(&self, name: &str, recursive: bool) -> Result<()> {
        let key = normalize(name);
        let mut entries = self.write_guard(name)?;

        if !entries.contains_key(&key) {
            return Err(not_found(name));
        }

        let children: Vec<String> = entries
            .keys()
            .filter(|candidate| **candidate != key && is_within(candidate, &key))
            .cloned()
            .collect();

        if !children.is_empty() && !recursive {
            return Err(directory_error(
                name,
                &format!("entry has {} subordinate entries", children.len()),
            ));
        }

        for child in &children {
            entries.remove(child);
        }
        entries.remove(&key);
        tracing::debug!(dn = name, subordinates = children.len(), "entry deleted");
        Ok(())
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

fn is_within(key: &str, base_key: &str) -> bool {
    base_key.is_empty()
        || key == base_key
        || key
            .strip_suffix(base_key)
            .is_some_and(|prefix| prefix.ends_with(rdn::COMPONENT_SEPARATOR))
}

fn project(entry: &Entry, requested: &[String]) -> Entry {
    if requested.is_empty() || requested.iter().any(|r| r == ALL_USER_ATTRIBUTES) {
        return entry.clone();
    }
    Entry::with_attributes(
        entry.name.clone(),
        entry
            .attributes
            .iter()
            .filter(|(name, _)| requested.iter().any(|r| r.eq_ignore_ascii_case(name)))
            .map(|(name, values)| (name.clone(), values.clone()))
            .collect(),
    )
}

/// The stored spelling of an attribute name
fn stored_name(entry: &Entry, attribute: &str) -> Option<String> {
    entry
        .attributes
        .keys()
        .find(|name| name.eq_ignore_ascii_case(attribute))
        .cloned()
}

fn ensure_value(entry: &mut Entry, attribute: &str, value: String) {
    let key = stored_name(entry, attribute).unwrap_or_else(|| attribute.to_string());
    let values = entry.attributes.entry(key).or_default();
    if !values.iter().any(|v| v.eq_ignore_ascii_case(&value)) {
        values.push(value);
    }
}

/// Drop the backslash from `\,`-style escapes in a name component value
fn unescape_name_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut escaped = false;
    for ch in value.chars() {
        if ch == '\\' && !escaped {
            escaped = true;
            continue;
        }
        escaped = false;
        out.push(ch);
    }
    out
}

fn values_for(name: &str, values: &AttributeMap, attribute: &str) -> Result<Vec<String>> {
    values
        .get(attribute)
        .cloned()
        .ok_or_else(|| directory_error(name, &format!("no values supplied for {}", attribute)))
}

fn not_found(name: &str) -> LdapSyncError {
    LdapSyncError::EntryNotFound {
        base: name.to_string(),
        filter: MATCH_ALL_FILTER.to_string(),
    }
}

fn directory_error(name: &str, reason: &str) -> LdapSyncError {
    LdapSyncError::Directory {
        entry_name: name.to_string(),
        reason: reason.to_string(),
    }
}

fn poisoned(name: &str) -> LdapSyncError {
    directory_error(name, "directory lock poisoned")
}
