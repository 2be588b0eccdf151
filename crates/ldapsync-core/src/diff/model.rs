//! Change set output types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Attribute names to delete, add and replace
///
/// The three sets are pairwise disjoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    /// Present in old, absent in new
    pub deleted: BTreeSet<String>,
    /// Present in new, absent in old
    pub added: BTreeSet<String>,
    /// Present in both with a different multiset of values
    pub changed: BTreeSet<String>,
}

/// Kind of change applied to a single attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModifyOp {
    Delete,
    Add,
    Replace,
}

/// One attribute-level step of a modify request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Modification<'a> {
    pub op: ModifyOp,
    pub attribute: &'a str,
}

impl ChangeSet {
    /// True when nothing needs to be written
    pub fn is_empty(&self) -> bool {
        self.deleted.is_empty() && self.added.is_empty() && self.changed.is_empty()
    }

    /// Total number of attribute modifications
    pub fn len(&self) -> usize {
        self.deleted.len() + self.added.len() + self.changed.len()
    }

    /// Names whose new values must be sent (`added` then `changed`)
    pub fn written_attributes(&self) -> impl Iterator<Item = &str> {
        self.added.iter().chain(&self.changed).map(String::as_str)
    }

    /// Modifications in request order: deletes, then adds, then replaces
    pub fn modifications(&self) -> impl Iterator<Item = Modification<'_>> {
        let deletes = self.deleted.iter().map(|a| Modification {
            op: ModifyOp::Delete,
            attribute: a,
        });
        let adds = self.added.iter().map(|a| Modification {
            op: ModifyOp::Add,
            attribute: a,
        });
        let replaces = self.changed.iter().map(|a| Modification {
            op: ModifyOp::Replace,
            attribute: a,
        });
        deletes.chain(adds).chain(replaces)
    }
}

impl fmt::Display for ChangeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "no changes");
        }
        let mut first = true;
        for m in self.modifications() {
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            let sign = match m.op {
                ModifyOp::Delete => '-',
                ModifyOp::Add => '+',
                ModifyOp::Replace => '~',
            };
            write!(f, "{}{}", sign, m.attribute)?;
        }
        Ok(())
    }
}
