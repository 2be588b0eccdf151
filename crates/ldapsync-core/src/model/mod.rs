pub mod entry;

pub use entry::{AttributeMap, Entry};
