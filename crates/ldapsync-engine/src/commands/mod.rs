//! Command orchestration layer.
//!
//! Host-facing operations that combine the reconciliation core with a
//! [`crate::DirectoryClient`].
//!
//! ## Logging Ownership
//!
//! Every public command owns its lifecycle logging:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! The core and the directory implementations use only `tracing::debug!`
//! and `tracing::warn!`.

pub mod data_source;
pub mod entry_resource;

pub use data_source::{read_entries, read_entry, EntriesRecord, EntryRecord};
pub use entry_resource::{
    entry_create, entry_delete, entry_import, entry_read, entry_update, EntryState,
};
