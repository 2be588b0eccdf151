//! Attribute diff engine.
//!
//! Compares two entries that have already been filtered, decoded and
//! case-normalized, and produces the three-way [`ChangeSet`] a directory
//! modify request needs.
//!
//! ## Entry point
//!
//! ```
//! use ldapsync_core::diff::{diff, equivalent};
//! use ldapsync_core::Entry;
//!
//! let old = Entry::new("").with_attribute("sn", ["Mit"]).with_attribute("mail", ["jim@example.com"]);
//! let new = Entry::new("").with_attribute("sn", ["Mit"]).with_attribute("cn", ["Jim Mit"]);
//!
//! let changes = diff(&old, &new);
//! assert!(changes.deleted.contains("mail"));
//! assert!(changes.added.contains("cn"));
//! assert!(changes.changed.is_empty());
//! assert!(!equivalent(&old, &new));
//! ```
//!
//! ## Guarantees
//!
//! - **Reflexivity**: `diff(e, e)` is empty.
//! - **Order insensitivity**: value order never produces a change.
//! - **Anti-symmetry**: swapping arguments swaps `added` and `deleted` and
//!   leaves `changed` as is.
//! - **Determinism**: sets are `BTreeSet`s, so iteration and serialization are
//!   stable.

pub mod engine;
pub mod model;

pub use engine::{diff, equivalent};
pub use model::{ChangeSet, Modification, ModifyOp};
