//! Path checks performed before any command is built
//!
//! Arguments always reach the child as discrete argv entries, never through a
//! shell. The character checks here only catch misconfigured paths early.

use std::path::Path;

use crate::error::ValidationError;

/// How much of a repository must be present on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoRequirement {
    /// The directory must exist (pull targets)
    Exists,
    /// The directory must exist and contain a `.git` directory (log reads)
    GitWorkTree,
}

/// Check a stored repository path against the filesystem
pub fn validate_repository_path(
    path: &Path,
    requirement: RepoRequirement,
) -> Result<(), ValidationError> {
    if !path.is_dir() {
        return Err(ValidationError::NotFound {
            path: path.to_path_buf(),
        });
    }

    if requirement == RepoRequirement::GitWorkTree && !path.join(".git").is_dir() {
        return Err(ValidationError::NotAGitRepository {
            path: path.to_path_buf(),
        });
    }

    Ok(())
}

/// Whether `path` may be used as the pull script.
///
/// Absolute, no `..`, and only ASCII alphanumerics plus `/ _ - .`.
pub fn is_safe_script_path(path: &Path) -> bool {
    is_safe_absolute(path, |_| false)
}

/// Whether `path` may be passed to the pull script as its argument.
///
/// Same rules as [`is_safe_script_path`], additionally allowing spaces.
pub fn is_safe_repo_argument(path: &Path) -> bool {
    is_safe_absolute(path, |c| c == ' ')
}

fn is_safe_absolute(path: &Path, extra: impl Fn(char) -> bool) -> bool {
    let Some(raw) = path.to_str() else {
        return false;
    };

    if !raw.starts_with('/') || raw.contains("..") {
        return false;
    }

    raw.chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '_' | '-' | '.') || extra(c))
}

/// Check that the pull script exists and can be executed
pub fn check_script(path: &Path) -> Result<(), ValidationError> {
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) if metadata.is_file() => metadata,
        _ => {
            return Err(ValidationError::ScriptNotFound {
                path: path.to_path_buf(),
            })
        }
    };

    if !is_executable(&metadata) {
        return Err(ValidationError::ScriptNotExecutable {
            path: path.to_path_buf(),
        });
    }

    Ok(())
}

#[cfg(unix)]
fn is_executable(metadata: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_metadata: &std::fs::Metadata) -> bool {
    true
}
