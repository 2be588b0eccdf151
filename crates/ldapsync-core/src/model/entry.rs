use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Attribute name to ordered list of text values
pub type AttributeMap = BTreeMap<String, Vec<String>>;

/// A directory entry: distinguished name plus attributes
///
/// Built fresh for every directory read and every desired-state decode.
/// Policy stages take `&Entry` and hand back a new `Entry`, so value vectors
/// are never shared between stages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Distinguished name, most specific component first
    /// (e.g. `uid=jim,ou=users,dc=example,dc=com`)
    pub name: String,

    /// Attribute values keyed by attribute name. Value order is preserved for
    /// the wire but carries no meaning for equivalence.
    pub attributes: AttributeMap,
}

impl Entry {
    /// Create an entry with no attributes
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: AttributeMap::new(),
        }
    }

    /// Create an entry from an existing attribute map
    pub fn with_attributes(name: impl Into<String>, attributes: AttributeMap) -> Self {
        Self {
            name: name.into(),
            attributes,
        }
    }

    /// Builder-style attribute insertion; replaces any existing values
    ///
    /// # Example
    /// ```
    /// use ldapsync_core::Entry;
    ///
    /// let entry = Entry::new("uid=jim,dc=example,dc=com")
    ///     .with_attribute("sn", ["Mit"])
    ///     .with_attribute("mail", ["jim@example.com"]);
    /// assert_eq!(entry.values("sn"), Some(&["Mit".to_string()][..]));
    /// ```
    pub fn with_attribute<I, S>(mut self, attribute: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes.insert(
            attribute.into(),
            values.into_iter().map(Into::into).collect(),
        );
        self
    }

    /// Values of an attribute (exact name match)
    pub fn values(&self, attribute: &str) -> Option<&[String]> {
        self.attributes.get(attribute).map(Vec::as_slice)
    }

    pub fn contains(&self, attribute: &str) -> bool {
        self.attributes.contains_key(attribute)
    }

    /// The set of attribute names
    pub fn attribute_names(&self) -> BTreeSet<&str> {
        self.attributes.keys().map(String::as_str).collect()
    }

    /// A copy of this entry without the named attributes
    pub fn without<'a, I>(&self, names: I) -> Entry
    where
        I: IntoIterator<Item = &'a String>,
    {
        let drop: BTreeSet<&str> = names.into_iter().map(String::as_str).collect();
        Entry {
            name: self.name.clone(),
            attributes: self
                .attributes
                .iter()
                .filter(|(name, _)| !drop.contains(name.as_str()))
                .map(|(name, values)| (name.clone(), values.clone()))
                .collect(),
        }
    }

    /// Number of attributes
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}
