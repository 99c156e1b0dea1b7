//! Change descriptions attached to every write, forming the tree's history.

use std::fmt;

use filedb_types::RecordKey;

/// The mutation a change description reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChangeVerb {
    Insert,
    Set,
    Delete,
}

impl fmt::Display for ChangeVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insert => write!(f, "insert"),
            Self::Set => write!(f, "set"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Human-readable description of a record mutation.
///
/// ```
/// use filedb_core::{change_message, ChangeVerb};
/// use filedb_types::RecordKey;
///
/// let key = RecordKey::new("tags", "active");
/// assert_eq!(change_message(ChangeVerb::Insert, &key, None), "insert record tags/active");
/// ```
pub fn change_message(verb: ChangeVerb, key: &RecordKey, author: Option<&str>) -> String {
    match author {
        Some(author) => format!("{verb} record {key}\n\nAuthor: {author}"),
        None => format!("{verb} record {key}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn author_is_appended() {
        let key = RecordKey::new("tags", "a");
        assert_eq!(
            change_message(ChangeVerb::Delete, &key, Some("bob")),
            "delete record tags/a\n\nAuthor: bob"
        );
    }

    #[test]
    fn verbs() {
        let key = RecordKey::new("c", "k");
        assert_eq!(change_message(ChangeVerb::Set, &key, None), "set record c/k");
    }
}
