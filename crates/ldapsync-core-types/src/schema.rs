//! Canonical field keys and event names for structured logging.
//!
//! The logging macros in `ldapsync-core` and the test capture layer both key
//! off these names, so they must stay stable.

// Boundary fields
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Directory identifiers
pub const FIELD_DN: &str = "dn";
pub const FIELD_BASE: &str = "base";
pub const FIELD_FILTER: &str = "filter";
pub const FIELD_ATTRIBUTE: &str = "attribute";

// Change set sizes
pub const FIELD_ADDED: &str = "added";
pub const FIELD_DELETED: &str = "deleted";
pub const FIELD_CHANGED: &str = "changed";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
