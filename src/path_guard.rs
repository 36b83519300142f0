//! Filesystem boundary checks for every path the analyzer reads or writes
//!
//! Result files and history directories arrive indirectly through CI inputs,
//! so nothing is opened until it has been resolved and confirmed to live
//! inside its authorized root. All comparisons happen on canonical paths:
//! a string check on the raw input would let `../` or a symlink escape.

use crate::error::GuardError;
use std::path::{Component, Path, PathBuf};

fn canonicalize(path: &Path) -> Result<PathBuf, GuardError> {
    std::fs::canonicalize(path).map_err(|source| GuardError::Unresolvable {
        path: path.to_path_buf(),
        source,
    })
}

/// Where the directory entry itself lives (parent resolved, final name kept)
///
/// Differs from the canonical target only when the last component is a symlink.
fn entry_location(candidate: &Path, resolved: &Path) -> Result<PathBuf, GuardError> {
    match (candidate.parent(), candidate.file_name()) {
        (Some(parent), Some(name)) => {
            let parent = if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            };
            Ok(canonicalize(parent)?.join(name))
        }
        _ => Ok(resolved.to_path_buf()),
    }
}

/// Authorize a path for reading
///
/// Accepts `candidate` only if its canonical form equals or descends from the
/// canonical `allowed_root`, and the entry itself sits inside the root. The
/// second condition rejects a symlink placed outside the root that points
/// back in, so the check holds in both directions of symlink indirection.
///
/// # Example
/// ```no_run
/// use benchgate::path_guard::authorize;
/// use std::path::Path;
///
/// let file = authorize(Path::new("results/result-memory.json"), Path::new("results"));
/// assert!(file.is_ok());
/// ```
pub fn authorize(candidate: &Path, allowed_root: &Path) -> Result<PathBuf, GuardError> {
    let root = canonicalize(allowed_root)?;
    let resolved = canonicalize(candidate)?;

    if !resolved.starts_with(&root) {
        return Err(GuardError::PathEscape {
            path: candidate.to_path_buf(),
            root,
        });
    }

    if resolved != root {
        let location = entry_location(candidate, &resolved)?;
        if !location.starts_with(&root) {
            return Err(GuardError::PathEscape {
                path: candidate.to_path_buf(),
                root,
            });
        }
    }

    Ok(resolved)
}

/// Authorize a path for writing
///
/// Relative paths are interpreted against `working_root`. The deepest
/// existing ancestor is canonicalized and the remaining components may not
/// contain `..`. Missing parent directories are created only after the
/// target is known to stay inside the root, and the created parent is checked
/// again once it exists.
pub fn authorize_output(path: &Path, working_root: &Path) -> Result<PathBuf, GuardError> {
    let root = canonicalize(working_root)?;
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    };

    // Split into the deepest existing ancestor and the tail still to be created.
    // symlink_metadata does not follow links: a dangling symlink counts as
    // existing and fails canonicalization below instead of joining the tail.
    let mut existing = absolute.as_path();
    let mut tail = Vec::new();
    while std::fs::symlink_metadata(existing).is_err() {
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                tail.push(name.to_os_string());
                existing = parent;
            }
            _ => {
                return Err(GuardError::ParentTraversal {
                    path: path.to_path_buf(),
                })
            }
        }
    }

    let mut target = canonicalize(existing)?;
    for name in tail.iter().rev() {
        let component = Path::new(name);
        if component
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(GuardError::ParentTraversal {
                path: path.to_path_buf(),
            });
        }
        target.push(component);
    }

    if target == root || !target.starts_with(&root) {
        return Err(GuardError::PathEscape {
            path: path.to_path_buf(),
            root,
        });
    }

    let Some(parent) = target.parent() else {
        return Err(GuardError::PathEscape {
            path: path.to_path_buf(),
            root,
        });
    };
    std::fs::create_dir_all(parent).map_err(|source| GuardError::CreateParent {
        path: path.to_path_buf(),
        source,
    })?;

    let parent = canonicalize(parent)?;
    if !parent.starts_with(&root) {
        return Err(GuardError::PathEscape {
            path: path.to_path_buf(),
            root,
        });
    }

    match target.file_name() {
        Some(name) => Ok(parent.join(name)),
        None => Err(GuardError::ParentTraversal {
            path: path.to_path_buf(),
        }),
    }
}
