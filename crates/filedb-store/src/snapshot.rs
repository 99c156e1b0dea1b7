use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use filedb_types::RevisionTag;

/// A file as read from the store, with the revision tag it was read at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileSnapshot {
    pub content: Vec<u8>,
    pub revision: RevisionTag,
}

impl FileSnapshot {
    /// Snapshot whose tag is derived from its content.
    pub fn of_content(content: Vec<u8>) -> Self {
        let revision = RevisionTag::of_content(&content);
        Self { content, revision }
    }
}

/// Kind of a directory entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
}

/// A direct child of a listed directory.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DirEntry {
    /// Entry name without the directory prefix.
    pub name: String,
    /// Full path of the entry inside the tree.
    pub path: String,
    pub kind: EntryKind,
}

/// What a recorded change did to its file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Write,
    Delete,
}

/// One entry of a store's change history.
///
/// Every successful write or delete records the change description the
/// caller attached, forming the audit trail of the tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEntry {
    pub path: String,
    pub message: String,
    pub kind: ChangeKind,
    /// Tag of the new content for writes; tag of the removed content for deletes.
    pub revision: RevisionTag,
    pub at: DateTime<Utc>,
}

impl ChangeEntry {
    pub fn new(path: impl Into<String>, message: impl Into<String>, kind: ChangeKind, revision: RevisionTag) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
            revision,
            at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_tag_matches_content() {
        let snap = FileSnapshot::of_content(b"title: A\n".to_vec());
        assert_eq!(snap.revision, RevisionTag::of_content(b"title: A\n"));
    }

    #[test]
    fn dir_entries_sort_by_name() {
        let mut entries = vec![
            DirEntry { name: "b".into(), path: "t/b".into(), kind: EntryKind::File },
            DirEntry { name: "a".into(), path: "t/a".into(), kind: EntryKind::Dir },
        ];
        entries.sort();
        assert_eq!(entries[0].name, "a");
    }

    #[test]
    fn change_entry_serializes_as_json_line() {
        let entry = ChangeEntry::new("t/a.yaml", "insert t/a", ChangeKind::Write, RevisionTag::new("abc"));
        let line = serde_json::to_string(&entry).unwrap();
        assert!(line.contains("\"kind\":\"write\""));
        let back: ChangeEntry = serde_json::from_str(&line).unwrap();
        assert_eq!(back, entry);
    }
}
