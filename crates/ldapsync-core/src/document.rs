//! Desired-state document codec
//!
//! A desired-state document is a JSON object mapping attribute names to
//! arrays of string values:
//!
//! ```json
//! { "objectClass": ["inetOrgPerson"], "sn": ["Mit"] }
//! ```

use serde_json::Value;

use crate::errors::{LdapSyncError, Result};
use crate::model::{AttributeMap, Entry};

/// Parse a desired-state document into an attribute map
///
/// Validation runs in stages so the error names the first problem found.
///
/// # Errors
///
/// Returns `InvalidDocument` when the text is not JSON, the root is not an
/// object, or any attribute is not an array of strings.
pub fn decode_attributes(json: &str) -> Result<AttributeMap> {
    // 1. JSON parse to generic Value
    let raw: Value = serde_json::from_str(json).map_err(|e| invalid(format!(
        "document is not valid JSON: {}",
        e
    )))?;

    // 2. Root must be an object
    let object = raw
        .as_object()
        .ok_or_else(|| invalid("document root must be an object".to_string()))?;

    // 3. Every attribute holds an array of strings
    let mut attributes = AttributeMap::new();
    for (name, values) in object {
        let array = values.as_array().ok_or_else(|| {
            invalid(format!("attribute `{}` must be an array of strings", name))
        })?;

        let values = array
            .iter()
            .map(|value| {
                value.as_str().map(str::to_string).ok_or_else(|| {
                    invalid(format!(
                        "attribute `{}` holds a non-string value: {}",
                        name, value
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        attributes.insert(name.clone(), values);
    }

    Ok(attributes)
}

/// Parse a desired-state document into an entry named `name`
///
/// # Errors
///
/// See [`decode_attributes`].
pub fn decode_entry(name: &str, json: &str) -> Result<Entry> {
    decode_attributes(json).map(|attributes| Entry::with_attributes(name, attributes))
}

/// Render an attribute map as a document with sorted keys
///
/// # Errors
///
/// Returns `Serialization` if the map cannot be rendered.
pub fn encode_attributes(attributes: &AttributeMap) -> Result<String> {
    serde_json::to_string(attributes).map_err(|e| LdapSyncError::Serialization {
        message: e.to_string(),
    })
}

fn invalid(reason: String) -> LdapSyncError {
    LdapSyncError::InvalidDocument { reason }
}
