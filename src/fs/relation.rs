//! Relations between two filesystem paths
//!
//! Both predicates work on resolved paths: absolute, with symlinks resolved
//! as far as the path exists on disk and `..` applied the way the OS applies
//! it, after the link. A path that does not exist yet is resolved through its
//! longest existing ancestor and the rest is normalized lexically. When no
//! resolution is possible the predicates answer `None` and callers must not
//! persist anything that depends on the answer.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// How two resolved paths relate to each other
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// Both resolve to the same location
    Identical,
    /// One lives inside the other
    Nested,
    /// Neither is an ancestor of the other
    Disjoint,
}

/// Resolve `path` to an absolute, normalized, symlink-free form
pub fn resolve(path: &Path) -> Option<PathBuf> {
    if path.as_os_str().is_empty() {
        return None;
    }

    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().ok()?.join(path)
    };

    // Symlinks are followed before `..` is applied, so canonicalize raw
    // prefixes first and only clean up the tail that does not exist
    let components: Vec<Component> = absolute.components().collect();
    for split in (1..=components.len()).rev() {
        let existing: PathBuf = components[..split].iter().collect();
        match fs::canonicalize(&existing) {
            Ok(canonical) => {
                let tail = &components[split..];
                if tail.is_empty() {
                    return Some(canonical);
                }
                let tail: PathBuf = tail.iter().collect();
                let rejoined = normalize_lexically(&canonical.join(&tail));
                // `..` in the tail may climb back into existing directories
                if tail.components().any(|c| c == Component::ParentDir) {
                    return resolve(&rejoined);
                }
                return Some(rejoined);
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => {
                tracing::debug!(path = %existing.display(), error = %e, "cannot resolve path");
                return None;
            }
        }
    }
    None
}

/// True iff both paths resolve to the same location
pub fn same_target(a: &Path, b: &Path) -> Option<bool> {
    Some(resolve(a)? == resolve(b)?)
}

/// True iff one resolved path lies inside the other, compared by component
///
/// A path is nested within itself.
pub fn nested(a: &Path, b: &Path) -> Option<bool> {
    let a = resolve(a)?;
    let b = resolve(b)?;
    Some(a.starts_with(&b) || b.starts_with(&a))
}

/// Classify two paths with a single resolution of each
pub fn relate(a: &Path, b: &Path) -> Option<Relation> {
    let a = resolve(a)?;
    let b = resolve(b)?;
    let relation = if a == b {
        Relation::Identical
    } else if a.starts_with(&b) || b.starts_with(&a) {
        Relation::Nested
    } else {
        Relation::Disjoint
    };
    Some(relation)
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
