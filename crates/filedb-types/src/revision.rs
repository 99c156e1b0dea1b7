use std::fmt;

use serde::{Deserialize, Serialize};

/// Domain tag mixed into every content hash, so revision tags never collide
/// with hashes computed for other purposes over the same bytes.
const REVISION_DOMAIN: &str = "filedb-rev-v1";

/// Opaque revision tag of a remote file.
///
/// The remote store hands out a tag with every read and checks it on every
/// write. An empty tag means "the file must not exist yet". Implementations
/// in this workspace derive tags from a BLAKE3 hash of the file content, but
/// callers must treat them as opaque strings.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RevisionTag(String);

impl RevisionTag {
    /// Wrap a tag handed out by a remote store.
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// The empty tag: the write must create a new file.
    pub const fn none() -> Self {
        Self(String::new())
    }

    /// Derive the tag of `content`.
    pub fn of_content(content: &[u8]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(REVISION_DOMAIN.as_bytes());
        hasher.update(b":");
        hasher.update(content);
        Self(hex::encode(hasher.finalize().as_bytes()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters, for logs.
    pub fn short(&self) -> &str {
        let end = self.0.len().min(8);
        self.0.get(..end).unwrap_or(&self.0)
    }
}

impl fmt::Debug for RevisionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "RevisionTag(none)")
        } else {
            write!(f, "RevisionTag({})", self.short())
        }
    }
}

impl fmt::Display for RevisionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RevisionTag {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_tag_is_deterministic() {
        assert_eq!(RevisionTag::of_content(b"a"), RevisionTag::of_content(b"a"));
        assert_ne!(RevisionTag::of_content(b"a"), RevisionTag::of_content(b"b"));
    }

    #[test]
    fn content_tag_is_hex_and_domain_separated() {
        let tag = RevisionTag::of_content(b"hello");
        assert_eq!(tag.as_str().len(), 64);
        assert_ne!(tag.as_str(), hex::encode(blake3::hash(b"hello").as_bytes()));
    }

    #[test]
    fn none_is_empty() {
        assert!(RevisionTag::none().is_empty());
        assert!(RevisionTag::default().is_empty());
        assert!(!RevisionTag::of_content(b"").is_empty());
    }

    #[test]
    fn short_and_debug() {
        let tag = RevisionTag::new("0123456789abcdef");
        assert_eq!(tag.short(), "01234567");
        assert_eq!(format!("{tag:?}"), "RevisionTag(01234567)");
        assert_eq!(format!("{:?}", RevisionTag::none()), "RevisionTag(none)");
        assert_eq!(RevisionTag::new("abc").short(), "abc");
    }
}
