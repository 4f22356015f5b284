//! Format-agnostic configuration loading

use serde::de::DeserializeOwned;

use crate::{Error, NormalizedPath, Result, io};

/// On-disk configuration formats, detected from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
    Yaml,
}

impl ConfigFormat {
    /// Detect the format of `path` from its extension.
    pub fn from_path(path: &NormalizedPath) -> Result<Self> {
        let extension = path.extension().unwrap_or("");
        match extension.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "toml" => Ok(Self::Toml),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(Error::UnsupportedFormat {
                extension: extension.to_string(),
            }),
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Toml => "TOML",
            Self::Yaml => "YAML",
        }
    }
}

/// Format-agnostic configuration store.
///
/// Automatically detects format from file extension and handles
/// deserialization transparently.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigStore;

impl ConfigStore {
    /// Create a new ConfigStore.
    pub fn new() -> Self {
        Self
    }

    /// Load configuration from a file, or `None` when it does not exist.
    ///
    /// Format is detected from file extension:
    /// - `.toml` -> TOML
    /// - `.json` -> JSON
    /// - `.yaml`, `.yml` -> YAML
    pub async fn load<T: DeserializeOwned>(&self, path: &NormalizedPath) -> Result<Option<T>> {
        let format = ConfigFormat::from_path(path)?;
        let Some(content) = io::read_text_if_exists(path).await? else {
            return Ok(None);
        };
        self.parse(path, format, &content).map(Some)
    }

    /// Parse already-read content as `format`.
    ///
    /// `path` is only used to label errors.
    pub fn parse<T: DeserializeOwned>(
        &self,
        path: &NormalizedPath,
        format: ConfigFormat,
        content: &str,
    ) -> Result<T> {
        let parsed = match format {
            ConfigFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            ConfigFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        };

        parsed.map_err(|message| Error::ConfigParse {
            path: path.to_native(),
            format: format.label().into(),
            message,
        })
    }
}

/// A config file found on the search path, with its parsed content.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfig<T> {
    /// File the content was read from
    pub path: NormalizedPath,
    /// Parsed content
    pub value: T,
}

/// Load the first existing candidate under `root`.
///
/// Candidates are tried in order; the first file that exists is parsed as
/// `T` and returned. A parse failure in that file is an error rather than
/// a reason to try the next candidate. Returns `Ok(None)` when no candidate
/// exists.
pub async fn load_config<T: DeserializeOwned>(
    root: &NormalizedPath,
    candidates: &[&str],
) -> Result<Option<LoadedConfig<T>>> {
    let store = ConfigStore::new();

    for candidate in candidates {
        let path = root.join(candidate);
        let Some(value) = store.load(&path).await? else {
            continue;
        };

        tracing::debug!(path = %path, "Loaded config file");
        return Ok(Some(LoadedConfig { path, value }));
    }

    tracing::debug!(root = %root, ?candidates, "No config file found");
    Ok(None)
}
