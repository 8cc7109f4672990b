//! Base-directory path resolution.
//!
//! Resolution is lexical: it never touches the filesystem, so a descriptor can
//! be built for a project that is not checked out yet. Existence is checked
//! separately by [`FsValidator`](crate::validation::FsValidator).

use std::path::{Component, Path, PathBuf};

use path_clean::PathClean;

use crate::error::{ConfigError, Result};

/// Resolve `path` against `base`, producing a normalized absolute path.
///
/// # Example
///
/// ```
/// use kiln_config::resolve_path;
/// use std::path::Path;
///
/// let entry = resolve_path(Path::new("/repo"), Path::new("config/../app/script.js"), "entries").unwrap();
/// assert_eq!(entry, Path::new("/repo/app/script.js"));
/// ```
pub fn resolve_path(base: &Path, path: &Path, field: &str) -> Result<PathBuf> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::PathResolution {
            field: field.to_string(),
            path: path.to_path_buf(),
            reason: "path is empty".to_string(),
        });
    }

    if !base.is_absolute() {
        return Err(ConfigError::PathResolution {
            field: field.to_string(),
            path: path.to_path_buf(),
            reason: format!("base directory `{}` is not absolute", base.display()),
        });
    }

    let joined = base.join(path);
    if climbs_above_root(&joined) {
        return Err(ConfigError::PathResolution {
            field: field.to_string(),
            path: path.to_path_buf(),
            reason: "path escapes the filesystem root".to_string(),
        });
    }

    Ok(joined.clean())
}

fn climbs_above_root(path: &Path) -> bool {
    let mut depth = 0usize;
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => depth = 0,
            Component::CurDir => {}
            Component::ParentDir => {
                if depth == 0 {
                    return true;
                }
                depth -= 1;
            }
            Component::Normal(_) => depth += 1,
        }
    }
    false
}
