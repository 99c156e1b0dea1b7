//! Record path resolution.
//!
//! Paths inside the file tree are always `/`-separated, independent of the
//! host platform. Keys are substituted literally; callers must ensure keys are
//! safe to embed in a file name.

/// Placeholder substituted with the record key in file-name templates.
pub const KEY_PLACEHOLDER: &str = "{key}";

/// Resolve the canonical path of the file holding `key`.
///
/// Every occurrence of [`KEY_PLACEHOLDER`] in `template` is replaced with
/// `key`, the result is joined onto `dir`, and the joined path is cleaned.
/// Templates without a placeholder resolve to the same path for every key.
///
/// # Examples
///
/// ```
/// use filedb_types::resolve_record_path;
///
/// assert_eq!(resolve_record_path("a/b", "{key}.yaml", "x"), "a/b/x.yaml");
/// assert_eq!(resolve_record_path("a/b", "data.json", "x"), "a/b/data.json");
/// ```
pub fn resolve_record_path(dir: &str, template: &str, key: &str) -> String {
    let file_name = template.replace(KEY_PLACEHOLDER, key);
    clean_path(&join(dir, &file_name))
}

fn join(dir: &str, name: &str) -> String {
    match (dir.is_empty(), name.is_empty()) {
        (true, _) => name.to_string(),
        (false, true) => dir.to_string(),
        (false, false) => format!("{dir}/{name}"),
    }
}

/// Lexically normalize a `/`-separated path.
///
/// Collapses duplicate separators, drops `.` components, and resolves `..`
/// against preceding components. A rooted path stays rooted and `..` never
/// climbs above the root. An empty result becomes `"."`.
pub fn clean_path(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for component in path.split('/') {
        match component {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if rooted => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }

    let body = parts.join("/");
    match (rooted, body.is_empty()) {
        (true, _) => format!("/{body}"),
        (false, true) => ".".to_string(),
        (false, false) => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn keyed_template() {
        assert_eq!(resolve_record_path("a/b", "{key}.yaml", "x"), "a/b/x.yaml");
    }

    #[test]
    fn shared_template_ignores_key() {
        assert_eq!(resolve_record_path("a/b", "data.json", "x"), "a/b/data.json");
        assert_eq!(resolve_record_path("a/b", "data.json", "y"), "a/b/data.json");
    }

    #[test]
    fn every_placeholder_is_substituted() {
        assert_eq!(
            resolve_record_path("tags", "{key}/{key}.json", "red"),
            "tags/red/red.json"
        );
    }

    #[test]
    fn empty_dir_uses_template_only() {
        assert_eq!(resolve_record_path("", "{key}.yaml", "x"), "x.yaml");
    }

    #[test]
    fn dir_is_normalized() {
        assert_eq!(resolve_record_path("./a//b/", "{key}.yaml", "x"), "a/b/x.yaml");
        assert_eq!(resolve_record_path("a/c/../b", "{key}.yaml", "x"), "a/b/x.yaml");
    }

    #[test]
    fn clean_examples() {
        assert_eq!(clean_path(""), ".");
        assert_eq!(clean_path("."), ".");
        assert_eq!(clean_path("a/./b"), "a/b");
        assert_eq!(clean_path("a//b"), "a/b");
        assert_eq!(clean_path("a/b/.."), "a");
        assert_eq!(clean_path("a/.."), ".");
        assert_eq!(clean_path("../a"), "../a");
        assert_eq!(clean_path("../../a/.."), "../..");
        assert_eq!(clean_path("/../a"), "/a");
        assert_eq!(clean_path("/"), "/");
        assert_eq!(clean_path("a/b/"), "a/b");
    }

    proptest! {
        #[test]
        fn resolved_path_never_contains_placeholder(
            key in "[a-z0-9_-]{1,16}",
            dir in "[a-z]{0,4}(/[a-z]{1,4}){0,3}",
        ) {
            let path = resolve_record_path(&dir, "{key}.yaml", &key);
            prop_assert!(!path.contains(KEY_PLACEHOLDER));
            let expected_suffix = format!("{key}.yaml");
            prop_assert!(path.ends_with(&expected_suffix));
        }

        #[test]
        fn clean_is_idempotent(path in "[a-z./]{0,24}") {
            let once = clean_path(&path);
            prop_assert_eq!(clean_path(&once), once);
        }

        #[test]
        fn resolution_is_deterministic(key in "[a-z0-9]{1,12}") {
            prop_assert_eq!(
                resolve_record_path("d", "{key}.json", &key),
                resolve_record_path("d", "{key}.json", &key)
            );
        }
    }
}
