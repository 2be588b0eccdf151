use ldapsync_core::errors::Result;
use ldapsync_core::{AttributeMap, ChangeSet, Entry};
use ldapsync_engine::{DirectoryClient, InMemoryDirectory};
use std::sync::atomic::{AtomicUsize, Ordering};

pub const BASE: &str = "dc=example,dc=com";
pub const USERS: &str = "ou=users,dc=example,dc=com";
pub const JIM_DN: &str = "uid=jim,ou=users,dc=example,dc=com";
pub const ANN_DN: &str = "uid=ann,ou=users,dc=example,dc=com";

/// In-memory directory that counts modify requests
pub struct RecordingDirectory {
    pub inner: InMemoryDirectory,
    modifies: AtomicUsize,
}

#[allow(dead_code)]
impl RecordingDirectory {
    pub fn modify_count(&self) -> usize {
        self.modifies.load(Ordering::SeqCst)
    }
}

impl DirectoryClient for RecordingDirectory {
    fn read(&self, name: &str, requested_attributes: &[String]) -> Result<Entry> {
        self.inner.read(name, requested_attributes)
    }

    fn search_one(&self, base: &str, filter: &str, requested_attributes: &[String]) -> Result<Entry> {
        self.inner.search_one(base, filter, requested_attributes)
    }

    fn search_many(
        &self,
        base: &str,
        filter: &str,
        requested_attributes: &[String],
        page_size: usize,
    ) -> Result<Vec<Entry>> {
        self.inner
            .search_many(base, filter, requested_attributes, page_size)
    }

    fn add(&self, entry: &Entry) -> Result<()> {
        self.inner.add(entry)
    }

    fn apply_change_set(&self, name: &str, changes: &ChangeSet, values: &AttributeMap) -> Result<()> {
        self.modifies.fetch_add(1, Ordering::SeqCst);
        self.inner.apply_change_set(name, changes, values)
    }

    fn delete(&self, name: &str, recursive: bool) -> Result<()> {
        self.inner.delete(name, recursive)
    }
}

/// Directory with `ou=users` and two people under it
#[allow(dead_code)]
pub fn seeded_directory() -> RecordingDirectory {
    let inner = InMemoryDirectory::new([BASE]);
    inner
        .add(&Entry::new(USERS).with_attribute("objectClass", ["organizationalUnit", "top"]))
        .expect("seed ou");
    inner
        .add(
            &Entry::new(JIM_DN)
                .with_attribute("objectClass", ["inetOrgPerson", "person", "top"])
                .with_attribute("cn", ["Jim Mit"])
                .with_attribute("givenName", ["Jim"])
                .with_attribute("sn", ["Mit"])
                .with_attribute("userPassword", ["{SSHA}secret"]),
        )
        .expect("seed jim");
    inner
        .add(
            &Entry::new(ANN_DN)
                .with_attribute("objectClass", ["inetOrgPerson", "person", "top"])
                .with_attribute("cn", ["Ann Lee"])
                .with_attribute("sn", ["Lee"]),
        )
        .expect("seed ann");

    RecordingDirectory {
        inner,
        modifies: AtomicUsize::new(0),
    }
}

/// Parse a `data_json` string for assertions
#[allow(dead_code)]
pub fn attributes(data_json: &str) -> AttributeMap {
    serde_json::from_str(data_json).expect("data_json must be valid")
}
