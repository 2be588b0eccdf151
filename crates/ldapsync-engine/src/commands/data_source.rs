//! Read-only data sources: one entry or all entries matching a filter.
//!
//! Results pass through the ignore and base64 rules of the caller's
//! [`PolicySettings`] before they are rendered as `data_json`.

use std::time::Instant;

use ldapsync_core::document::encode_attributes;
use ldapsync_core::errors::{ExError, LdapSyncError, Result};
use ldapsync_core::{log_op_end, log_op_error, log_op_start};
use ldapsync_core::{Entry, PolicySettings, TransformPolicy};
use serde::Serialize;

use crate::directory::DirectoryClient;

/// One entry as exposed by a data source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryRecord {
    pub dn: String,
    pub data_json: String,
}

/// Result of a multi-entry lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntriesRecord {
    /// `(filter,ou)`
    pub id: String,
    pub entries: Vec<EntryRecord>,
}

/// Wrap a filter in parentheses unless it already is
///
/// ```
/// use ldapsync_engine::commands::data_source::wrap_filter;
///
/// assert_eq!(wrap_filter("uid=jim"), "(uid=jim)");
/// assert_eq!(wrap_filter("(&(uid=jim)(sn=Mit))"), "(&(uid=jim)(sn=Mit))");
/// ```
pub fn wrap_filter(filter: &str) -> String {
    let filter = filter.trim();
    if filter.starts_with('(') && filter.ends_with(')') {
        filter.to_string()
    } else {
        format!("({})", filter)
    }
}

/// Look up the single entry under `ou` matching `filter`
///
/// ## Errors
///
/// - `ERR_CONFIGURATION`: a pattern in `settings` does not compile
/// - `ERR_NOT_FOUND`: no entry matches
/// - `ERR_AMBIGUOUS_RESULT`: more than one entry matches
pub fn read_entry(
    client: &dyn DirectoryClient,
    ou: &str,
    filter: &str,
    settings: &PolicySettings,
) -> std::result::Result<EntryRecord, ExError> {
    log_op_start!("read_entry", base = ou, filter = filter);
    let start = Instant::now();

    let record = read_entry_impl(client, ou, filter, settings).map_err(|e| {
        log_op_error!(
            "read_entry",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        ExError::from(e).with_op("read_entry")
    })?;

    log_op_end!(
        "read_entry",
        duration_ms = start.elapsed().as_millis() as u64,
        dn = record.dn.as_str()
    );
    Ok(record)
}

fn read_entry_impl(
    client: &dyn DirectoryClient,
    ou: &str,
    filter: &str,
    settings: &PolicySettings,
) -> Result<EntryRecord> {
    let policy = TransformPolicy::from_settings(settings)?;
    let entry = client.search_one(ou, &wrap_filter(filter), &settings.requested_attributes())?;
    to_record(&policy, &entry)
}

/// Look up every entry under `ou` matching `filter`
///
/// `paging_size == 0` disables paging. A missing `ou` yields an empty list.
///
/// ## Errors
///
/// - `ERR_CONFIGURATION`: a pattern in `settings` does not compile
/// - `ERR_DIRECTORY`: the search failed
pub fn read_entries(
    client: &dyn DirectoryClient,
    ou: &str,
    filter: &str,
    settings: &PolicySettings,
    paging_size: usize,
) -> std::result::Result<EntriesRecord, ExError> {
    log_op_start!("read_entries", base = ou, filter = filter, paging_size = paging_size);
    let start = Instant::now();

    let record = read_entries_impl(client, ou, filter, settings, paging_size).map_err(|e| {
        log_op_error!(
            "read_entries",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        ExError::from(e).with_op("read_entries")
    })?;

    log_op_end!(
        "read_entries",
        duration_ms = start.elapsed().as_millis() as u64,
        count = record.entries.len()
    );
    Ok(record)
}

fn read_entries_impl(
    client: &dyn DirectoryClient,
    ou: &str,
    filter: &str,
    settings: &PolicySettings,
    paging_size: usize,
) -> Result<EntriesRecord> {
    let policy = TransformPolicy::from_settings(settings)?;
    let requested = settings.requested_attributes();

    let entries = match client.search_many(ou, &wrap_filter(filter), &requested, paging_size) {
        Ok(entries) => entries,
        Err(LdapSyncError::EntryNotFound { .. }) => {
            tracing::debug!(base = ou, "search base does not exist");
            Vec::new()
        }
        Err(e) => return Err(e),
    };

    Ok(EntriesRecord {
        id: format!("({},{})", filter, ou),
        entries: entries
            .iter()
            .map(|entry| to_record(&policy, entry))
            .collect::<Result<Vec<_>>>()?,
    })
}

fn to_record(policy: &TransformPolicy, entry: &Entry) -> Result<EntryRecord> {
    let encoded = policy.encode(entry);
    Ok(EntryRecord {
        dn: entry.name.clone(),
        data_json: encode_attributes(&encoded.attributes)?,
    })
}
