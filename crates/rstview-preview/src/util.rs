//! Lexical path helpers.
//!
//! Nothing here touches the filesystem: symlinks are not resolved and
//! paths need not exist.

use std::path::{Component, Path, PathBuf};

/// Normalize a path lexically: drop `.` and collapse `..` against
/// preceding normal components.
///
/// `..` directly below the root is dropped; leading `..` of a relative
/// path is kept.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use rstview_preview::normalize_path;
///
/// assert_eq!(normalize_path(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
/// assert_eq!(normalize_path(Path::new("../a/b/..")), PathBuf::from("../a"));
/// ```
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                Some(Component::ParentDir | Component::CurDir) | None => parts.push(component),
            },
            _ => parts.push(component),
        }
    }
    parts.iter().collect()
}

/// Compute the path of `to` relative to the directory `from`.
///
/// Both paths are normalized first. When they share no common root (e.g.,
/// different Windows drives, or one absolute and one relative), `to` is
/// returned unchanged so that joining it onto `from` still yields `to`.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use rstview_preview::relative_path;
///
/// assert_eq!(relative_path(Path::new("/p/docs"), Path::new("/p/docs/_build")), PathBuf::from("_build"));
/// assert_eq!(relative_path(Path::new("/p/docs"), Path::new("/p/build/html")), PathBuf::from("../build/html"));
/// assert_eq!(relative_path(Path::new("/p"), Path::new("/p")), PathBuf::new());
/// ```
#[must_use]
pub fn relative_path(from: &Path, to: &Path) -> PathBuf {
    let from = normalize_path(from);
    let to = normalize_path(to);
    if from.has_root() != to.has_root() {
        return to;
    }

    let from_parts: Vec<Component<'_>> = from.components().collect();
    let to_parts: Vec<Component<'_>> = to.components().collect();

    let common = from_parts
        .iter()
        .zip(&to_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let roots_differ = from_parts
        .first()
        .is_some_and(|first| matches!(first, Component::Prefix(_)))
        && common == 0;
    if roots_differ {
        return to;
    }

    let mut result = PathBuf::new();
    for _ in common..from_parts.len() {
        result.push("..");
    }
    for part in &to_parts[common..] {
        result.push(part);
    }
    result
}
