//! Entry resource lifecycle: create, read, update, delete, import.
//!
//! The resource id is the entry's distinguished name. `data_json` holds the
//! desired-state document; naming attributes are never part of what is read
//! back, since they are carried by the name itself.
//!
//! Every command takes the resource's [`TransformPolicy`]. Documents are
//! decoded through it on the way into the directory and state is filtered
//! and encoded through it on the way out, so a tracked `data_json` is in the
//! same form as the document that produced it.

use std::time::Instant;

use ldapsync_core::document::{decode_entry, encode_attributes};
use ldapsync_core::errors::{ExError, LdapSyncError, Result};
use ldapsync_core::settings::ALL_USER_ATTRIBUTES;
use ldapsync_core::{log_op_end, log_op_error, log_op_start};
use ldapsync_core::{plan, rdn, Entry, TransformPolicy};
use serde::Serialize;

use crate::directory::DirectoryClient;

/// Tracked state of one entry resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryState {
    pub id: String,
    pub dn: String,
    pub data_json: String,
}

/// Create the entry described by `data_json`
///
/// The document is decoded through `policy` and added as-is; no diffing
/// takes place. Ignored attributes are not written.
///
/// ## Returns
///
/// The resource id (the entry name).
///
/// ## Errors
///
/// - `ERR_INVALID_DOCUMENT`: `data_json` is not an object of string arrays
/// - `ERR_MALFORMED_ENCODING`: an encoded value is not valid base64
/// - `ERR_ALREADY_EXISTS`: an entry with this name exists
/// - `ERR_DIRECTORY`: the directory refused the add
pub fn entry_create(
    client: &dyn DirectoryClient,
    dn: &str,
    data_json: &str,
    policy: &TransformPolicy,
) -> std::result::Result<String, ExError> {
    log_op_start!("entry_create", dn = dn);
    let start = Instant::now();

    let entry = create_impl(client, dn, data_json, policy)
        .map_err(|e| fail("entry_create", dn, e, start))?;

    log_op_end!(
        "entry_create",
        duration_ms = start.elapsed().as_millis() as u64,
        dn = dn,
        attributes = entry.len()
    );
    Ok(dn.to_string())
}

fn create_impl(
    client: &dyn DirectoryClient,
    dn: &str,
    data_json: &str,
    policy: &TransformPolicy,
) -> Result<Entry> {
    let entry = policy.decode(&decode_entry(dn, data_json)?)?;
    client.add(&entry)?;
    Ok(entry)
}

/// Read the current state of an entry
///
/// A missing entry is not an error: `None` tells the host to drop the
/// resource from its tracked state.
///
/// ## Errors
///
/// - `ERR_DIRECTORY`: the read itself failed
pub fn entry_read(
    client: &dyn DirectoryClient,
    dn: &str,
    policy: &TransformPolicy,
) -> std::result::Result<Option<EntryState>, ExError> {
    log_op_start!("entry_read", dn = dn);
    let start = Instant::now();

    let state = match read_state(client, dn, policy) {
        Ok(state) => Some(state),
        Err(LdapSyncError::EntryNotFound { .. }) => {
            tracing::debug!(dn, "entry no longer exists");
            None
        }
        Err(e) => return Err(fail("entry_read", dn, e, start)),
    };

    log_op_end!(
        "entry_read",
        duration_ms = start.elapsed().as_millis() as u64,
        found = state.is_some()
    );
    Ok(state)
}

/// Move an entry from `old_json` to `new_json`
///
/// Both documents go through `policy` before diffing. When they are
/// equivalent the directory is not touched. The returned state is re-read
/// from the directory through the same policy.
///
/// ## Errors
///
/// - `ERR_INVALID_DOCUMENT`: either document is malformed
/// - `ERR_MALFORMED_ENCODING`: an encoded value is not valid base64
/// - `ERR_NOT_FOUND` / `ERR_DIRECTORY`: the modify or the re-read failed
pub fn entry_update(
    client: &dyn DirectoryClient,
    dn: &str,
    old_json: &str,
    new_json: &str,
    policy: &TransformPolicy,
) -> std::result::Result<EntryState, ExError> {
    log_op_start!("entry_update", dn = dn);
    let start = Instant::now();

    let (state, changes) = update_impl(client, dn, old_json, new_json, policy)
        .map_err(|e| fail("entry_update", dn, e, start))?;

    log_op_end!(
        "entry_update",
        duration_ms = start.elapsed().as_millis() as u64,
        dn = dn,
        changes = changes
    );
    Ok(state)
}

fn update_impl(
    client: &dyn DirectoryClient,
    dn: &str,
    old_json: &str,
    new_json: &str,
    policy: &TransformPolicy,
) -> Result<(EntryState, usize)> {
    let old = decode_entry(dn, old_json)?;
    let new = decode_entry(dn, new_json)?;
    let plan = plan(&old, &new, policy, dn)?;

    if plan.is_noop() {
        tracing::debug!(dn, "documents are equivalent; skipping modify");
    } else {
        client.apply_change_set(dn, &plan.change_set, &plan.write_values())?;
    }

    Ok((read_state(client, dn, policy)?, plan.change_set.len()))
}

/// Delete an entry, and its subtree when `recursive`
///
/// ## Errors
///
/// - `ERR_NOT_FOUND`: no such entry
/// - `ERR_DIRECTORY`: the entry has children and `recursive` is false
pub fn entry_delete(
    client: &dyn DirectoryClient,
    dn: &str,
    recursive: bool,
) -> std::result::Result<(), ExError> {
    log_op_start!("entry_delete", dn = dn, recursive = recursive);
    let start = Instant::now();

    client
        .delete(dn, recursive)
        .map_err(|e| fail("entry_delete", dn, e, start))?;

    log_op_end!("entry_delete", duration_ms = start.elapsed().as_millis() as u64);
    Ok(())
}

/// Adopt an existing entry as a resource
///
/// ## Errors
///
/// - `ERR_NOT_FOUND`: nothing to import under that name
pub fn entry_import(
    client: &dyn DirectoryClient,
    dn: &str,
    policy: &TransformPolicy,
) -> std::result::Result<EntryState, ExError> {
    log_op_start!("entry_import", dn = dn);
    let start = Instant::now();

    let state =
        read_state(client, dn, policy).map_err(|e| fail("entry_import", dn, e, start))?;

    log_op_end!("entry_import", duration_ms = start.elapsed().as_millis() as u64);
    Ok(state)
}

fn read_state(
    client: &dyn DirectoryClient,
    dn: &str,
    policy: &TransformPolicy,
) -> Result<EntryState> {
    let entry = client.read(dn, &[ALL_USER_ATTRIBUTES.to_string()])?;
    let naming = rdn::implied_ignores(&entry, dn);
    let visible = policy.encode(&entry.without(&naming));

    Ok(EntryState {
        id: dn.to_string(),
        dn: dn.to_string(),
        data_json: encode_attributes(&visible.attributes)?,
    })
}

// Errors without a directory context (document, encoding) get the resource name
fn fail(op: &'static str, dn: &str, err: LdapSyncError, start: Instant) -> ExError {
    log_op_error!(
        op,
        err.clone(),
        duration_ms = start.elapsed().as_millis() as u64
    );
    let ex = ExError::from(err).with_op(op);
    if ex.entry_name().is_some() {
        ex
    } else {
        ex.with_entry_name(dn)
    }
}
