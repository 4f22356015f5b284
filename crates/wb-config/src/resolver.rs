//! End-to-end configuration resolution
//!
//! ```text
//! inline + env ─┬─ load user config ─┐
//!               └─ load manifest ────┴─ validate ─ inject ─ env overrides
//!                                                     │
//!               ┌─ workspace root ─┐                  │
//!               └─ package.json ───┴─ context ────────┘
//!
//! merge(user, manifest, defaults) ─ inline overrides ─ re-check ─ adapt plugins ─ marker check
//! ```

use std::path::{Path, PathBuf};

use serde_json::Value;
use wb_fs::{NormalizedPath, resolve_root};

use crate::Result;
use crate::config::{BundlerType, Command, ConfigEnv, ConfigLayer, InlineConfig, ResolvedConfig};
use crate::defaults::{default_config, default_manifest};
use crate::inject::{InjectionContext, inject_variables_to_manifest};
use crate::merge::{Merge, merge_layers};
use crate::plugin::{DefaultPluginFactory, PluginAdapter, PluginFactory};
use crate::schema::Schema;
use crate::source::{FsProjectSource, ProjectSource};
use crate::validation::{check_layer, validate_manifest_config};

/// Mode used when neither the caller nor the inline config names one.
pub const DEFAULT_MODE: &str = "development";

/// Resolves the effective configuration of a project.
///
/// Holds no per-resolution state, so one resolver may serve any number of
/// concurrent resolutions.
#[derive(Debug, Clone, Default)]
pub struct Resolver<S = FsProjectSource, F = DefaultPluginFactory> {
    source: S,
    adapter: PluginAdapter<F>,
    schema: Option<Schema>,
    cwd: Option<PathBuf>,
}

impl Resolver {
    /// A resolver reading from the filesystem with the default plugin factory.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S, F> Resolver<S, F>
where
    S: ProjectSource,
    F: PluginFactory,
{
    /// Read project inputs from `source` instead.
    pub fn with_source<T: ProjectSource>(self, source: T) -> Resolver<T, F> {
        Resolver {
            source,
            adapter: self.adapter,
            schema: self.schema,
            cwd: self.cwd,
        }
    }

    /// Materialize plugins with `factory` instead.
    pub fn with_factory<G: PluginFactory>(self, factory: G) -> Resolver<S, G> {
        Resolver {
            source: self.source,
            adapter: PluginAdapter::with_factory(factory),
            schema: self.schema,
            cwd: self.cwd,
        }
    }

    /// Validate manifests against `schema` instead of the bundled one.
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Use `cwd` instead of the process working directory.
    ///
    /// Affects the default root and the site marker check.
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    fn cwd(&self) -> Result<PathBuf> {
        match &self.cwd {
            Some(cwd) => Ok(cwd.clone()),
            None => std::env::current_dir().map_err(|e| wb_fs::Error::io(".", e).into()),
        }
    }

    /// Resolve the configuration for `command`.
    ///
    /// Fails with the first load or validation error; never returns a
    /// partially resolved configuration.
    pub async fn resolve(
        &self,
        inline: InlineConfig,
        command: Command,
        default_mode: &str,
    ) -> Result<ResolvedConfig> {
        let mode = inline
            .mode
            .clone()
            .unwrap_or_else(|| default_mode.to_string());
        let env = ConfigEnv::new(command, mode);
        let cwd = self.cwd()?;
        let root = resolve_root(inline.root.as_deref(), &cwd);
        tracing::debug!(root = %root, command = %env.command, mode = %env.mode, "Resolving configuration");

        let (user_config, manifest_document) = tokio::try_join!(
            self.source.load_user_config(&env, &root),
            self.source.load_manifest(&root),
        )?;

        let manifest_document = match manifest_document {
            Some(document) if !is_empty_document(&document) => document,
            _ => {
                tracing::debug!(root = %root, "No manifest declared, using the default manifest");
                serde_json::to_value(default_manifest())?
            }
        };
        let manifest = validate_manifest_config(&manifest_document, self.schema.as_ref())?;

        let defaults = default_config();

        let context = self.injection_context(&root).await?;
        let manifest =
            inject_variables_to_manifest(manifest, Some(&context)).with_env_overrides(&env.mode);

        let mut layer = merge_layers(
            user_config.map(ConfigLayer::from).unwrap_or_default(),
            ConfigLayer::from(manifest),
            defaults,
        );
        layer.merge(inline.overrides);
        check_layer(&layer)?;

        let plugin_instance = self
            .adapter
            .adapt(layer.plugins.as_deref().unwrap_or_default())
            .await?;

        let mut resolved = ResolvedConfig::from_layer(layer, &root, env, plugin_instance);

        if self.source.has_site_marker(&NormalizedPath::new(&cwd)).await? {
            tracing::debug!(cwd = %cwd.display(), "Site marker found, using the web dev server");
            resolved.bundler_type = BundlerType::WebDevServer;
        }

        Ok(resolved)
    }

    async fn injection_context(&self, root: &NormalizedPath) -> Result<InjectionContext> {
        let (workspace_root, package) = tokio::try_join!(
            self.source.find_workspace_root(root),
            self.source.read_package_json(root),
        )?;
        Ok(InjectionContext::new(workspace_root.as_ref(), package))
    }
}

/// A manifest file holding nothing (`{}` or `null`) counts as absent.
fn is_empty_document(document: &Value) -> bool {
    match document {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Resolve with the default filesystem resolver.
pub async fn resolve_config(
    inline: InlineConfig,
    command: Command,
    default_mode: &str,
) -> Result<ResolvedConfig> {
    Resolver::new().resolve(inline, command, default_mode).await
}

/// Resolve the project at `root` with the default mode.
pub async fn resolve_project(root: impl AsRef<Path>, command: Command) -> Result<ResolvedConfig> {
    let inline = InlineConfig::new().with_root(root.as_ref());
    resolve_config(inline, command, DEFAULT_MODE).await
}
