//! Where project configuration comes from

use async_trait::async_trait;
use serde_json::Value;
use wb_fs::{ConfigFile, NormalizedPath};

use crate::Result;
use crate::config::{ConfigEnv, UserConfig};

/// Reads the on-disk inputs of a resolution.
///
/// Each method is independent of the others, so the resolver may run
/// them concurrently.
#[async_trait]
pub trait ProjectSource: Send + Sync {
    /// The project's user config, if one exists under `root`.
    async fn load_user_config(&self, env: &ConfigEnv, root: &NormalizedPath)
    -> Result<Option<UserConfig>>;

    /// The raw manifest document, if one exists under `root`.
    async fn load_manifest(&self, root: &NormalizedPath) -> Result<Option<Value>>;

    /// The enclosing multi-package workspace root.
    async fn find_workspace_root(&self, root: &NormalizedPath) -> Result<Option<NormalizedPath>>;

    /// The nearest package descriptor.
    async fn read_package_json(&self, root: &NormalizedPath) -> Result<Option<Value>>;

    /// Whether the site marker file exists in `dir`.
    async fn has_site_marker(&self, dir: &NormalizedPath) -> Result<bool>;
}

/// Reads configuration from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsProjectSource;

#[async_trait]
impl ProjectSource for FsProjectSource {
    async fn load_user_config(
        &self,
        env: &ConfigEnv,
        root: &NormalizedPath,
    ) -> Result<Option<UserConfig>> {
        let loaded =
            wb_fs::load_config::<UserConfig>(root, ConfigFile::UserConfig.candidates()).await?;
        if let Some(loaded) = &loaded {
            tracing::debug!(
                path = %loaded.path,
                command = %env.command,
                mode = %env.mode,
                "Loaded user config"
            );
        }
        Ok(loaded.map(|loaded| loaded.value))
    }

    async fn load_manifest(&self, root: &NormalizedPath) -> Result<Option<Value>> {
        let loaded = wb_fs::load_config::<Value>(root, ConfigFile::Manifest.candidates()).await?;
        if let Some(loaded) = &loaded {
            tracing::debug!(path = %loaded.path, "Loaded manifest");
        }
        Ok(loaded.map(|loaded| loaded.value))
    }

    async fn find_workspace_root(&self, root: &NormalizedPath) -> Result<Option<NormalizedPath>> {
        Ok(wb_fs::find_workspace_root(root).await?)
    }

    async fn read_package_json(&self, root: &NormalizedPath) -> Result<Option<Value>> {
        Ok(wb_fs::read_package_json(root).await?)
    }

    async fn has_site_marker(&self, dir: &NormalizedPath) -> Result<bool> {
        let marker = dir.join(ConfigFile::SiteMarker.as_str());
        tokio::fs::try_exists(marker.to_native())
            .await
            .map_err(|e| wb_fs::Error::io(marker.to_native(), e).into())
    }
}
