//! ldapsync Engine - host orchestration layer
//!
//! Connects the reconciliation core to a directory:
//! - `DirectoryClient` seam and an in-memory directory implementing it
//! - Provider connection settings
//! - Entry resource and data source commands with boundary logging

pub mod commands;
pub mod directory;
pub mod memory;
pub mod provider;

pub use directory::DirectoryClient;
pub use memory::InMemoryDirectory;
pub use provider::{ProviderConfig, ProviderSettings};
