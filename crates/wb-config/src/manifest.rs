//! Manifest data model
//!
//! The manifest (`project-manifest.json` and friends) is the versioned,
//! schema-governed declaration of a project's build entries.
//!
//! # Example
//!
//! ```json
//! {
//!   "schemaVersion": "1.0.0",
//!   "entries": [
//!     {
//!       "entry": "src/index.ts",
//!       "publicPath": "/app/",
//!       "output": { "name": "app", "formats": ["umd"], "meta": { "umdName": "App" } }
//!     }
//!   ],
//!   "env": {
//!     "production": { "publicPath": "https://cdn.example.com/app/" }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Name used for an entry whose `output.name` is not set.
pub const DEFAULT_OUTPUT_NAME: &str = "index";

/// A parsed manifest.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestConfig {
    /// Semantic version of the manifest format
    pub schema_version: String,
    /// Buildable units, in declaration order
    pub entries: Vec<EntryDescriptor>,
    /// Per-environment partial entry overrides, keyed by mode name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<BTreeMap<String, EntryOverride>>,
}

/// One buildable unit within a manifest.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EntryDescriptor {
    /// Application entry file
    pub entry: String,
    #[serde(flatten)]
    pub options: EntryOptions,
}

impl EntryDescriptor {
    /// Create an entry with no options set.
    pub fn new(entry: impl Into<String>) -> Self {
        Self {
            entry: entry.into(),
            options: EntryOptions::default(),
        }
    }

    /// The entry's output name, defaulting to [`DEFAULT_OUTPUT_NAME`].
    pub fn output_name(&self) -> &str {
        self.options
            .output
            .as_ref()
            .and_then(|output| output.name.as_deref())
            .unwrap_or(DEFAULT_OUTPUT_NAME)
    }

    /// Formats listed under `output.formats`.
    pub fn output_formats(&self) -> &[OutputFormat] {
        self.options
            .output
            .as_ref()
            .and_then(|output| output.formats.as_deref())
            .unwrap_or_default()
    }

    /// The UMD global name, if set and non-empty.
    pub fn umd_name(&self) -> Option<&str> {
        self.options
            .output
            .as_ref()
            .and_then(|output| output.meta.as_ref())
            .and_then(|meta| meta.umd_name.as_deref())
            .filter(|name| !name.is_empty())
    }
}

/// Optional entry settings, shared by entries and environment overrides.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryOptions {
    /// Public path assets are served from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_path: Option<String>,
    /// Shared dependencies, keyed by module pattern
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub externals: Option<BTreeMap<String, String>>,
    /// Local dev-server settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerConfig>,
    /// Build output directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<String>,
    /// Import map output; `null` in the manifest disables it
    #[serde(
        default,
        deserialize_with = "present_importmap",
        skip_serializing_if = "Option::is_none"
    )]
    pub importmap: Option<Importmap>,
    /// Build output formats
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formats: Option<Vec<OutputFormat>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputConfig>,
}

/// Partial entry applied for one environment.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EntryOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<String>,
    #[serde(flatten)]
    pub options: EntryOptions,
}

/// Import map setting: a file name, or explicitly disabled with `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Importmap {
    Path(String),
    Disabled,
}

/// An explicit `null` must survive as `Some(Importmap::Disabled)` rather
/// than collapsing into an absent field.
fn present_importmap<'de, D>(deserializer: D) -> Result<Option<Importmap>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)
        .map(|path| Some(path.map_or(Importmap::Disabled, Importmap::Path)))
}

/// Output module formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Es,
    Cjs,
    Umd,
    Iife,
}

impl OutputFormat {
    /// Formats that expose a global variable and therefore need a UMD name.
    pub fn requires_global_name(&self) -> bool {
        matches!(self, Self::Umd | Self::Iife)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Es => write!(f, "es"),
            Self::Cjs => write!(f, "cjs"),
            Self::Umd => write!(f, "umd"),
            Self::Iife => write!(f, "iife"),
        }
    }
}

/// Output naming and format settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formats: Option<Vec<OutputFormat>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<OutputMeta>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputMeta {
    /// Global variable name for `umd`/`iife` bundles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub umd_name: Option<String>,
}

/// Local dev-server configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(
        default,
        deserialize_with = "whole_port",
        skip_serializing_if = "Option::is_none"
    )]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<ServerHost>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<Vec<ProxyRule>>,
}

/// Accept `8080.0` as well as `8080`; JSON does not tell them apart.
fn whole_port<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Port {
        Integer(u16),
        Float(f64),
    }

    match Option::<Port>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Port::Integer(port)) => Ok(Some(port)),
        Some(Port::Float(port))
            if port.fract() == 0.0 && (0.0..=f64::from(u16::MAX)).contains(&port) =>
        {
            Ok(Some(port as u16))
        }
        Some(Port::Float(port)) => Err(D::Error::custom(format!(
            "invalid port {port}, expected an integer between 0 and 65535"
        ))),
    }
}

/// Host to bind: an address, or `true` to listen on all interfaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServerHost {
    Name(String),
    All(bool),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyRule {
    pub url: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_origin: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_rewrite: Option<Vec<PathRewrite>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PathRewrite {
    pub regular: String,
    pub replacement: String,
}
