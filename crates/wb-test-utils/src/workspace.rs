//! Multi-package workspace fixtures.
//!
//! Each helper turns `path` into a workspace root recognised by
//! `wb_fs::find_workspace_root`, using a different marker.

use std::fs;
use std::path::Path;

/// Mark `path` as a pnpm workspace.
///
/// # Panics
/// Panics if the marker cannot be written.
pub fn pnpm_workspace(path: &Path) {
    fs::write(path.join("pnpm-workspace.yaml"), "packages:\n  - 'packages/*'\n")
        .unwrap_or_else(|e| panic!("pnpm_workspace: failed to write marker: {e}"));
}

/// Mark `path` as an npm/yarn workspace via `package.json` `workspaces`.
///
/// # Panics
/// Panics if the descriptor cannot be written.
pub fn npm_workspace(path: &Path, name: &str) {
    let pkg = serde_json::json!({
        "name": name,
        "private": true,
        "workspaces": ["packages/*"]
    });
    fs::write(path.join("package.json"), pkg.to_string())
        .unwrap_or_else(|e| panic!("npm_workspace: failed to write package.json: {e}"));
}

/// Create `packages/<name>` under `root` and return its path.
///
/// # Panics
/// Panics if the directory cannot be created.
pub fn member_package(root: &Path, name: &str) -> std::path::PathBuf {
    let dir = root.join("packages").join(name);
    fs::create_dir_all(&dir)
        .unwrap_or_else(|e| panic!("member_package: failed to create {}: {e}", dir.display()));
    dir
}
