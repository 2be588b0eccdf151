//! Attribute filter and encoding policy
//!
//! A [`TransformPolicy`] decides, per attribute name, whether the attribute is
//! ignored (dropped) and whether its values travel base64-encoded. The ignore
//! check always runs first: an ignored attribute is never considered for
//! encoding or decoding.
//!
//! Encoding is not idempotent. Encoding a value that is already the base64
//! form encodes it a second time; callers are expected to encode only values
//! read from the directory and decode only values from desired-state
//! documents.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::collections::BTreeSet;

use crate::case;
use crate::errors::{LdapSyncError, Result};
use crate::model::{AttributeMap, Entry};
use crate::pattern::PatternSet;
use crate::settings::PolicySettings;

/// Immutable filter + encoding configuration
///
/// Shareable across threads; every operation takes `&self` and returns a
/// fresh [`Entry`].
///
/// # Example
/// ```
/// use ldapsync_core::{Entry, TransformPolicy};
///
/// let policy = TransformPolicy::new()
///     .with_ignore_patterns(["^g.*"]).unwrap()
///     .with_encode_names(["sn"]);
///
/// let entry = Entry::new("uid=jim,dc=example,dc=com")
///     .with_attribute("givenName", ["Jim"])
///     .with_attribute("sn", ["Mit"]);
///
/// let encoded = policy.encode(&entry);
/// assert!(!encoded.contains("givenName"));
/// assert_eq!(encoded.values("sn"), Some(&["TWl0".to_string()][..]));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TransformPolicy {
    ignore_names: BTreeSet<String>,
    ignore_patterns: PatternSet,
    encode_names: BTreeSet<String>,
    encode_patterns: PatternSet,
    case_sensitive_names: Option<BTreeSet<String>>,
}

impl TransformPolicy {
    /// An empty policy: nothing ignored, nothing encoded, no case folding
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a policy from configuration, compiling every pattern once
    ///
    /// # Errors
    ///
    /// Returns `InvalidPattern` for the first ignore or encode pattern that
    /// does not compile.
    pub fn from_settings(settings: &PolicySettings) -> Result<Self> {
        let policy = Self::new()
            .with_ignore_names(settings.ignore_attributes.iter().flatten())
            .with_ignore_patterns(settings.ignore_attribute_patterns.iter().flatten())?
            .with_encode_names(settings.base64encode_attributes.iter().flatten())
            .with_encode_patterns(settings.base64encode_attribute_patterns.iter().flatten())?;

        Ok(match &settings.case_sensitive_attributes {
            Some(names) => policy.with_case_sensitive_names(names),
            None => policy,
        })
    }

    /// Add attribute names to drop
    pub fn with_ignore_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_names.extend(names.into_iter().map(Into::into));
        self
    }

    /// Add ignore patterns
    ///
    /// # Errors
    ///
    /// Returns `InvalidPattern` if any pattern does not compile.
    pub fn with_ignore_patterns<I, S>(mut self, patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ignore_patterns.extend(PatternSet::compile(patterns)?);
        Ok(self)
    }

    /// Add attribute names whose values are base64-encoded
    pub fn with_encode_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.encode_names.extend(names.into_iter().map(Into::into));
        self
    }

    /// Add encode patterns
    ///
    /// # Errors
    ///
    /// Returns `InvalidPattern` if any pattern does not compile.
    pub fn with_encode_patterns<I, S>(mut self, patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.encode_patterns.extend(PatternSet::compile(patterns)?);
        Ok(self)
    }

    /// Enable case folding, exempting the given names
    ///
    /// An empty list enables folding for every attribute.
    pub fn with_case_sensitive_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.case_sensitive_names
            .get_or_insert_with(BTreeSet::new)
            .extend(names.into_iter().map(Into::into));
        self
    }

    /// A copy of this policy with extra ignored names
    ///
    /// Used to fold naming-component attributes into the ignore set. The
    /// compiled patterns are shared, not recompiled.
    pub fn with_additional_ignores<I, S>(&self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.clone().with_ignore_names(names)
    }

    pub fn ignore_names(&self) -> &BTreeSet<String> {
        &self.ignore_names
    }

    pub fn case_sensitive_names(&self) -> Option<&BTreeSet<String>> {
        self.case_sensitive_names.as_ref()
    }

    /// True if the attribute is dropped by name or by pattern
    pub fn is_ignored(&self, attribute: &str) -> bool {
        self.ignore_names.contains(attribute) || self.ignore_patterns.matches_any(attribute)
    }

    /// True if the attribute's values are base64-encoded by name or by pattern
    ///
    /// Does not consult the ignore rules; see [`Self::filter`].
    pub fn is_encoded(&self, attribute: &str) -> bool {
        self.encode_names.contains(attribute) || self.encode_patterns.matches_any(attribute)
    }

    /// Drop ignored attributes
    pub fn filter(&self, entry: &Entry) -> Entry {
        Entry::with_attributes(
            entry.name.clone(),
            entry
                .attributes
                .iter()
                .filter(|(name, _)| !self.is_ignored(name))
                .map(|(name, values)| (name.clone(), values.clone()))
                .collect(),
        )
    }

    /// Filter, then base64-encode the values of targeted attributes
    ///
    /// Each targeted attribute is encoded exactly once even when it matches
    /// both a name rule and a pattern rule.
    pub fn encode(&self, entry: &Entry) -> Entry {
        let attributes = entry
            .attributes
            .iter()
            .filter(|(name, _)| !self.is_ignored(name))
            .map(|(name, values)| {
                let values = if self.is_encoded(name) {
                    values.iter().map(|v| STANDARD.encode(v.as_bytes())).collect()
                } else {
                    values.clone()
                };
                (name.clone(), values)
            })
            .collect();

        Entry::with_attributes(entry.name.clone(), attributes)
    }

    /// Filter, then base64-decode the values of targeted attributes
    ///
    /// # Errors
    ///
    /// Returns `MalformedEncoding` for the first value that is not valid
    /// base64 or does not decode to UTF-8. Nothing is returned for the rest
    /// of the entry; callers must not apply a partially decoded entry.
    pub fn decode(&self, entry: &Entry) -> Result<Entry> {
        let mut attributes = AttributeMap::new();

        for (name, values) in &entry.attributes {
            if self.is_ignored(name) {
                continue;
            }
            let values = if self.is_encoded(name) {
                values
                    .iter()
                    .map(|value| decode_value(name, value))
                    .collect::<Result<Vec<_>>>()?
            } else {
                values.clone()
            };
            attributes.insert(name.clone(), values);
        }

        Ok(Entry::with_attributes(entry.name.clone(), attributes))
    }

    /// Apply case folding when configured, otherwise return a copy
    pub fn normalize_case(&self, entry: &Entry) -> Entry {
        match &self.case_sensitive_names {
            Some(exceptions) => case::normalize(entry, exceptions),
            None => entry.clone(),
        }
    }
}

fn decode_value(attribute: &str, value: &str) -> Result<String> {
    let malformed = |reason: String| LdapSyncError::MalformedEncoding {
        attribute: attribute.to_string(),
        value: value.to_string(),
        reason,
    };

    let bytes = STANDARD.decode(value).map_err(|e| malformed(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| malformed(format!("decoded bytes are not UTF-8: {}", e)))
}
