//! Glob-driven artifact copies into the exploded directory.

use std::fs;
use std::path::{Component, Path, PathBuf};

use glob::{MatchOptions, Pattern};

use crate::error::{Error, Result};

const GLOB_CHARS: &[char] = &['*', '?', '[', '{'];

/// The literal leading directories of a glob, e.g. `src/main/resources` for
/// `src/main/resources/**/*.js`. Matches are copied relative to this base.
pub fn glob_base(pattern: &str) -> PathBuf {
    let mut base = PathBuf::new();
    let components: Vec<Component<'_>> = Path::new(pattern).components().collect();

    for (idx, component) in components.iter().enumerate() {
        let text = component.as_os_str().to_string_lossy();
        // The last literal component names a file, not a directory.
        if text.contains(GLOB_CHARS) || idx + 1 == components.len() {
            break;
        }
        base.push(component);
    }

    base
}

/// Glob text for `pattern` below `root`. Metacharacters in `root` itself are
/// escaped so a directory such as `work[1]` matches literally.
pub fn rooted_glob(root: &Path, pattern: &str) -> String {
    let escaped = PathBuf::from(Pattern::escape(&root.to_string_lossy()));
    escaped.join(pattern).to_string_lossy().into_owned()
}

/// Compiles a glob rooted at `root`.
pub fn rooted_pattern(root: &Path, pattern: &str) -> Result<Pattern> {
    Pattern::new(&rooted_glob(root, pattern)).map_err(|e| Error::Glob {
        pattern: pattern.to_string(),
        message: e.msg.to_string(),
    })
}

pub(crate) fn match_options() -> MatchOptions {
    MatchOptions {
        case_sensitive: true,
        require_literal_separator: false,
        require_literal_leading_dot: false,
    }
}

/// Copies every file under `root` matching `pattern` (and not `exclude`)
/// into `dest`, keeping each file's path below the glob base.
///
/// Returns the number of files copied.
pub fn copy_glob(root: &Path, pattern: &str, exclude: Option<&str>, dest: &Path) -> Result<usize> {
    let full = rooted_glob(root, pattern);
    let base = root.join(glob_base(pattern));
    let exclude = exclude
        .map(|exclude| rooted_pattern(root, exclude))
        .transpose()?;

    let entries = glob::glob_with(&full, match_options()).map_err(|e| {
        Error::Glob {
            pattern: pattern.to_string(),
            message: e.msg.to_string(),
        }
    })?;

    let mut copied = 0;
    for entry in entries {
        let source = match entry {
            Ok(path) => path,
            Err(e) => {
                tracing::debug!("Skipping unreadable path: {}", e);
                continue;
            }
        };

        if !source.is_file() {
            continue;
        }
        if let Some(ref exclude) = exclude {
            if exclude.matches_path_with(&source, match_options()) {
                continue;
            }
        }

        let relative = match source.strip_prefix(&base) {
            Ok(relative) => relative.to_path_buf(),
            Err(_) => match source.file_name() {
                Some(name) => PathBuf::from(name),
                None => continue,
            },
        };
        let target = dest.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&source, &target)?;
        copied += 1;
    }

    Ok(copied)
}
