//! Leaf types shared by the ldapsync facilities
//!
//! - **Schema constants**: canonical structured-log field keys and event names
//! - **Sensitive data**: `Sensitive<T>` wrapper that redacts bind credentials

pub mod schema;
pub mod sensitive;

pub use sensitive::Sensitive;
