use ldapsync_core::{Entry, PolicySettings, TransformPolicy};

pub const JIM_DN: &str = "uid=jim,ou=users,dc=example,dc=com";

/// The directory's view of Jim, as read back after creation
#[allow(dead_code)]
pub fn jim() -> Entry {
    Entry::new(JIM_DN)
        .with_attribute("objectClass", ["inetOrgPerson", "person", "top"])
        .with_attribute("uid", ["jim"])
        .with_attribute("cn", ["Jim Mit"])
        .with_attribute("givenName", ["Jim"])
        .with_attribute("sn", ["Mit"])
}

/// Build a policy from settings, panicking on bad patterns
#[allow(dead_code)]
pub fn policy(settings: PolicySettings) -> TransformPolicy {
    TransformPolicy::from_settings(&settings).expect("test patterns must compile")
}

#[allow(dead_code)]
pub fn strings(items: &[&str]) -> Option<Vec<String>> {
    Some(items.iter().map(|s| s.to_string()).collect())
}
