use filedb_types::clean_path;

use crate::error::{StoreError, StoreResult};

/// Normalize a store path and reject paths outside the tree.
///
/// Leading `/` is dropped, so `"/a/b"` and `"a/b"` name the same file. The
/// tree root itself normalizes to `"."`.
pub fn normalize_store_path(path: &str) -> StoreResult<String> {
    let cleaned = clean_path(path.trim_start_matches('/'));
    if cleaned == ".." || cleaned.starts_with("../") {
        return Err(StoreError::InvalidPath {
            path: path.to_string(),
            reason: "escapes the store root".into(),
        });
    }
    Ok(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_leading_slash_and_cleans() {
        assert_eq!(normalize_store_path("/a//b/./c.yaml").unwrap(), "a/b/c.yaml");
        assert_eq!(normalize_store_path("").unwrap(), ".");
        assert_eq!(normalize_store_path("a/..").unwrap(), ".");
    }

    #[test]
    fn rejects_escape() {
        assert!(normalize_store_path("../x").is_err());
        assert!(normalize_store_path("a/../../x").is_err());
        assert!(normalize_store_path("..").is_err());
    }
}
