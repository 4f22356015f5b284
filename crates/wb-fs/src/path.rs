//! Project paths with forward-slash separators
//!
//! Config file names, workspace roots and `${workspaceRoot}` values are all
//! carried as [`NormalizedPath`] so injected paths look the same on every
//! platform.

use std::path::{Component, Path, PathBuf};

/// A path stored with `/` separators.
///
/// Converted back to a native [`PathBuf`] only when touching the
/// filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedPath {
    inner: String,
}

impl NormalizedPath {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            inner: path.as_ref().to_string_lossy().replace('\\', "/"),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Native form for I/O.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Append a file or directory name.
    pub fn join(&self, segment: &str) -> Self {
        let segment = segment.replace('\\', "/");
        let separator = if self.inner.ends_with('/') { "" } else { "/" };
        Self {
            inner: format!("{}{separator}{segment}", self.inner),
        }
    }

    /// The enclosing directory; `None` for `/` and for bare names.
    pub fn parent(&self) -> Option<Self> {
        let trimmed = self.inner.trim_end_matches('/');
        let parent = match trimmed.rfind('/')? {
            0 if trimmed.len() > 1 => "/",
            0 => return None,
            idx => &trimmed[..idx],
        };
        Some(Self {
            inner: parent.to_string(),
        })
    }

    /// Last component, ignoring trailing separators.
    pub fn file_name(&self) -> Option<&str> {
        self.inner
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
    }

    /// Extension of the file name; dotfiles such as `.env` have none.
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name()?;
        match name.rfind('.') {
            Some(0) | None => None,
            Some(idx) => Some(&name[idx + 1..]),
        }
    }
}

/// Resolve the project root the way a shell would.
///
/// A relative `root` is joined onto `cwd`; `.` and `..` components are
/// folded lexically without touching the filesystem, so the root does not
/// need to exist. With no `root`, `cwd` itself is the project root.
pub fn resolve_root(root: Option<&Path>, cwd: &Path) -> NormalizedPath {
    let joined = match root {
        Some(root) if root.is_absolute() => root.to_path_buf(),
        Some(root) => cwd.join(root),
        None => cwd.to_path_buf(),
    };

    let mut resolved = PathBuf::new();
    for component in dunce::simplified(&joined).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other.as_os_str()),
        }
    }

    NormalizedPath::new(resolved)
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}
