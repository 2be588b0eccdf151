//! Directory access seam
//!
//! The commands only ever talk to a directory through [`DirectoryClient`].
//! A protocol client (bind, search, add, modify, delete over the wire)
//! implements the same trait; [`crate::memory::InMemoryDirectory`] is the
//! implementation used by tests and embedders.

use ldapsync_core::errors::Result;
use ldapsync_core::{AttributeMap, ChangeSet, Entry};

/// Filter matching every entry, used for base-object reads
pub const MATCH_ALL_FILTER: &str = "(objectClass=*)";

/// Synchronous directory operations
///
/// `requested_attributes` is an allow-list of attribute names to return;
/// an empty list or `["*"]` returns all user attributes.
pub trait DirectoryClient: Send + Sync {
    /// Read exactly the entry named `name`
    ///
    /// # Errors
    ///
    /// `EntryNotFound` when no entry has that name.
    fn read(&self, name: &str, requested_attributes: &[String]) -> Result<Entry>;

    /// Subtree search expected to match exactly one entry
    ///
    /// # Errors
    ///
    /// `EntryNotFound` for zero matches, `AmbiguousResult` for more than one.
    fn search_one(&self, base: &str, filter: &str, requested_attributes: &[String])
        -> Result<Entry>;

    /// Subtree search returning every match
    ///
    /// `page_size == 0` fetches everything in one request.
    ///
    /// # Errors
    ///
    /// `EntryNotFound` when `base` itself does not exist.
    fn search_many(
        &self,
        base: &str,
        filter: &str,
        requested_attributes: &[String],
        page_size: usize,
    ) -> Result<Vec<Entry>>;

    /// Create an entry
    ///
    /// # Errors
    ///
    /// `EntryAlreadyExists` or `Directory` when the server refuses the add.
    fn add(&self, entry: &Entry) -> Result<()>;

    /// Apply a change set as one modify request
    ///
    /// `values` supplies the new values for every added or changed attribute.
    ///
    /// # Errors
    ///
    /// `EntryNotFound` or `Directory` when the server refuses the modify.
    fn apply_change_set(&self, name: &str, changes: &ChangeSet, values: &AttributeMap)
        -> Result<()>;

    /// Delete an entry, and its subtree when `recursive`
    ///
    /// # Errors
    ///
    /// `EntryNotFound`, or `Directory` when a non-recursive delete hits
    /// an entry with children.
    fn delete(&self, name: &str, recursive: bool) -> Result<()>;
}
