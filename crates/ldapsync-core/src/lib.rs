//! ldapsync Core - attribute reconciliation engine
//!
//! Pure, directory-protocol-free logic for keeping a directory entry in line
//! with a declarative desired-state document:
//! - Entry model and desired-state document codec
//! - Attribute filter and base64 encoding policy with compiled patterns
//! - Naming-component (RDN) detection
//! - Attribute-name case folding
//! - Three-way attribute diff and the `reconcile` entry point
//!
//! Directory access lives in `ldapsync-engine`.

pub mod case;
pub mod diff;
pub mod document;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod pattern;
pub mod policy;
pub mod rdn;
pub mod reconcile;
pub mod settings;

// Paths used by the logging macros
pub use ldapsync_core_types as core_types;
#[doc(hidden)]
pub use tracing as __tracing;

// Re-export commonly used types
pub use diff::ChangeSet;
pub use errors::{ExError, ExErrorKind, LdapSyncError, Result};
pub use model::{AttributeMap, Entry};
pub use pattern::PatternSet;
pub use policy::TransformPolicy;
pub use reconcile::{plan, reconcile, ReconcilePlan};
pub use settings::PolicySettings;
