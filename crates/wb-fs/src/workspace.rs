//! Workspace root and package descriptor discovery
//!
//! Both lookups walk from a starting directory towards the filesystem
//! root and stop at the first match.

use serde_json::Value;

use crate::constants::{ConfigFile, WORKSPACE_MARKERS};
use crate::{Error, NormalizedPath, Result, io};

/// Iterate `start` and each of its ancestors, nearest first.
fn ancestors(start: &NormalizedPath) -> impl Iterator<Item = NormalizedPath> {
    std::iter::successors(Some(start.clone()), NormalizedPath::parent)
}

/// Read and parse `package.json` in `dir`, if present.
///
/// A descriptor that is not valid JSON is logged and treated as absent.
async fn package_json_in(dir: &NormalizedPath) -> Result<Option<Value>> {
    let path = dir.join(ConfigFile::PackageJson.as_str());
    let Some(content) = io::read_text_if_exists(&path).await? else {
        return Ok(None);
    };

    match serde_json::from_str(&content) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            tracing::warn!(path = %path, error = %e, "Ignoring unparsable package.json");
            Ok(None)
        }
    }
}

/// Locate the enclosing multi-package workspace root.
///
/// A directory is a workspace root when it holds one of the
/// [`WORKSPACE_MARKERS`] or a `package.json` declaring `workspaces`.
/// Returns `None` when no ancestor qualifies.
pub async fn find_workspace_root(start: &NormalizedPath) -> Result<Option<NormalizedPath>> {
    for dir in ancestors(start) {
        for marker in WORKSPACE_MARKERS {
            let path = dir.join(marker).to_native();
            if tokio::fs::try_exists(&path)
                .await
                .map_err(|e| Error::io(&path, e))?
            {
                tracing::debug!(root = %dir, marker, "Found workspace root");
                return Ok(Some(dir));
            }
        }

        if let Some(pkg) = package_json_in(&dir).await? {
            if pkg.get("workspaces").is_some() {
                tracing::debug!(root = %dir, "Found workspace root via package.json workspaces");
                return Ok(Some(dir));
            }
        }
    }

    Ok(None)
}

/// Parse the nearest `package.json` at or above `start`.
pub async fn read_package_json(start: &NormalizedPath) -> Result<Option<Value>> {
    for dir in ancestors(start) {
        if let Some(pkg) = package_json_in(&dir).await? {
            tracing::debug!(dir = %dir, "Read package descriptor");
            return Ok(Some(pkg));
        }
    }

    Ok(None)
}
