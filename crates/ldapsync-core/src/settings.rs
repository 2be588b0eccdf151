//! Attribute policy configuration surface
//!
//! Every list is optional. `None` means "not configured"; `Some(vec![])` is a
//! configured but empty list. The distinction matters for
//! `case_sensitive_attributes` (absent disables case folding, empty folds
//! every name) and for `restrict_attributes` (absent requests everything).

use serde::{Deserialize, Serialize};

/// Wildcard requesting all user attributes from the directory
pub const ALL_USER_ATTRIBUTES: &str = "*";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicySettings {
    /// Attribute names dropped after retrieval
    pub ignore_attributes: Option<Vec<String>>,
    /// Regular expressions; matching attributes are dropped after retrieval
    pub ignore_attribute_patterns: Option<Vec<String>>,
    /// Attribute names whose values are carried base64-encoded
    pub base64encode_attributes: Option<Vec<String>>,
    /// Regular expressions selecting base64-encoded attributes
    pub base64encode_attribute_patterns: Option<Vec<String>>,
    /// Attribute names exempt from lower-case folding
    pub case_sensitive_attributes: Option<Vec<String>>,
    /// Allow-list narrowing which attributes are requested from the directory
    pub restrict_attributes: Option<Vec<String>>,
}

impl PolicySettings {
    /// Attribute names to request from the directory
    ///
    /// Falls back to `["*"]` when no restriction is configured or the
    /// configured list is empty.
    pub fn requested_attributes(&self) -> Vec<String> {
        match &self.restrict_attributes {
            Some(list) if !list.is_empty() => list.clone(),
            _ => vec![ALL_USER_ATTRIBUTES.to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_deserialize_as_none() {
        let settings: PolicySettings =
            serde_json::from_str(r#"{"ignore_attributes": ["userPassword"]}"#).unwrap();

        assert_eq!(
            settings.ignore_attributes,
            Some(vec!["userPassword".to_string()])
        );
        assert_eq!(settings.ignore_attribute_patterns, None);
        assert_eq!(settings.case_sensitive_attributes, None);
    }

    #[test]
    fn test_empty_list_is_distinct_from_absent() {
        let settings: PolicySettings =
            serde_json::from_str(r#"{"case_sensitive_attributes": []}"#).unwrap();

        assert_eq!(settings.case_sensitive_attributes, Some(Vec::new()));
        assert_ne!(settings, PolicySettings::default());
    }

    #[test]
    fn test_requested_attributes_defaults_to_wildcard() {
        assert_eq!(
            PolicySettings::default().requested_attributes(),
            vec!["*".to_string()]
        );

        let empty = PolicySettings {
            restrict_attributes: Some(Vec::new()),
            ..Default::default()
        };
        assert_eq!(empty.requested_attributes(), vec!["*".to_string()]);

        let restricted = PolicySettings {
            restrict_attributes: Some(vec!["cn".to_string(), "mail".to_string()]),
            ..Default::default()
        };
        assert_eq!(
            restricted.requested_attributes(),
            vec!["cn".to_string(), "mail".to_string()]
        );
    }
}
