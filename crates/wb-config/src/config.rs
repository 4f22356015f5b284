//! Configuration layers and the resolved configuration
//!
//! Every source of configuration (defaults, user config, manifest, inline
//! overrides) is lowered into a [`ConfigLayer`] before merging. The merged
//! layer is then completed into a [`ResolvedConfig`].

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use wb_fs::NormalizedPath;

use crate::error::Error;
use crate::manifest::{EntryDescriptor, EntryOverride, ManifestConfig};
use crate::plugin::{PluginDescriptor, PluginInstance};

/// Mode name that marks a production build.
pub const PRODUCTION_MODE: &str = "production";

/// The command a resolution is performed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    #[default]
    Build,
    Dev,
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "build" => Ok(Command::Build),
            "dev" => Ok(Command::Dev),
            _ => Err(Error::InvalidCommand {
                command: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Build => write!(f, "build"),
            Command::Dev => write!(f, "dev"),
        }
    }
}

/// Environment of one resolution call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEnv {
    pub command: Command,
    pub mode: String,
}

impl ConfigEnv {
    pub fn new(command: Command, mode: impl Into<String>) -> Self {
        Self {
            command,
            mode: mode.into(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.mode == PRODUCTION_MODE
    }
}

/// Build backend that consumes the resolved configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BundlerType {
    #[default]
    Vite,
    Rollup,
    Webpack,
    Esbuild,
    /// Set when the site marker file is present next to the process
    WebDevServer,
}

impl fmt::Display for BundlerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BundlerType::Vite => write!(f, "vite"),
            BundlerType::Rollup => write!(f, "rollup"),
            BundlerType::Webpack => write!(f, "webpack"),
            BundlerType::Esbuild => write!(f, "esbuild"),
            BundlerType::WebDevServer => write!(f, "webDevServer"),
        }
    }
}

/// Project-level configuration from `web-builder.config.*`.
///
/// Same shape as the resolved configuration minus the manifest-only
/// fields (`schemaVersion`, `env`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundler_type: Option<BundlerType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugins: Option<Vec<PluginDescriptor>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entries: Option<Vec<EntryDescriptor>>,
}

/// A partial configuration; every field is optional.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigLayer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundler_type: Option<BundlerType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugins: Option<Vec<PluginDescriptor>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entries: Option<Vec<EntryDescriptor>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<BTreeMap<String, EntryOverride>>,
}

impl From<UserConfig> for ConfigLayer {
    fn from(config: UserConfig) -> Self {
        Self {
            bundler_type: config.bundler_type,
            plugins: config.plugins,
            entries: config.entries,
            ..Self::default()
        }
    }
}

impl From<ManifestConfig> for ConfigLayer {
    fn from(manifest: ManifestConfig) -> Self {
        Self {
            schema_version: Some(manifest.schema_version),
            entries: Some(manifest.entries),
            env: manifest.env,
            ..Self::default()
        }
    }
}

/// Caller-supplied overrides for one resolution.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InlineConfig {
    /// Project root; relative paths resolve against the working directory
    pub root: Option<PathBuf>,
    /// Mode; falls back to the resolver's default mode
    pub mode: Option<String>,
    /// Highest-precedence configuration layer
    pub overrides: ConfigLayer,
}

impl InlineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }

    pub fn with_overrides(mut self, overrides: ConfigLayer) -> Self {
        self.overrides = overrides;
        self
    }
}

/// The authoritative configuration handed to build backends.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfig {
    pub root: PathBuf,
    pub command: Command,
    pub mode: String,
    pub bundler_type: BundlerType,
    pub plugins: Vec<PluginDescriptor>,
    pub schema_version: String,
    pub entries: Vec<EntryDescriptor>,
    pub env: BTreeMap<String, EntryOverride>,
    pub plugin_instance: PluginInstance,
}

impl ResolvedConfig {
    /// Complete a merged layer into a resolved configuration.
    ///
    /// Fields still absent after merging take their type's default.
    pub fn from_layer(
        layer: ConfigLayer,
        root: &NormalizedPath,
        env: ConfigEnv,
        plugin_instance: PluginInstance,
    ) -> Self {
        Self {
            root: root.to_native(),
            command: env.command,
            mode: env.mode,
            bundler_type: layer.bundler_type.unwrap_or_default(),
            plugins: layer.plugins.unwrap_or_default(),
            schema_version: layer.schema_version.unwrap_or_default(),
            entries: layer.entries.unwrap_or_default(),
            env: layer.env.unwrap_or_default(),
            plugin_instance,
        }
    }

    /// Value the host process should give `NODE_ENV`, if any.
    ///
    /// Resolution never touches process-wide state; callers that want
    /// downstream tools to see production mode apply this themselves.
    pub fn recommended_node_env(&self) -> Option<&'static str> {
        (self.mode == PRODUCTION_MODE).then_some(PRODUCTION_MODE)
    }
}
