//! Error types for wb-config

use crate::manifest::OutputFormat;
use crate::plugin::BundlerKind;

/// Result type for wb-config operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a resolution
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The manifest failed structural or semantic validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A config file could not be read or parsed
    #[error(transparent)]
    Fs(#[from] wb_fs::Error),

    /// A schema document could not be used for validation
    #[error("Invalid schema document: {message}")]
    InvalidSchema { message: String },

    /// A plugin factory rejected a descriptor
    #[error("Failed to create {backend} plugin {name:?}: {message}")]
    Plugin {
        backend: BundlerKind,
        name: Option<String>,
        message: String,
    },

    /// Unknown build command
    #[error("Invalid command: {command} (expected `build` or `dev`)")]
    InvalidCommand { command: String },

    /// JSON conversion error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// The first rule a manifest violates.
///
/// `Structural` covers the schema document; the remaining variants are the
/// semantic rules checked once the manifest is structurally sound.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Manifest does not match the schema at `{pointer}`: {message}")]
    Structural { pointer: String, message: String },

    #[error(
        "schemaVersion property must comply with the semver specification. Received: {received}"
    )]
    InvalidSchemaVersion { received: String },

    #[error("entry.publicPath property must start with `/` or `http` (entry `{entry}`). Received: {received}")]
    InvalidPublicPath { entry: String, received: String },

    #[error(
        "Option \"entry.output.meta.umdName\" is required when output formats include \"umd\" or \"iife\" (entry `{entry}`). Received formats: {}",
        format_list(.formats)
    )]
    MissingUmdName {
        entry: String,
        formats: Vec<OutputFormat>,
    },

    #[error(
        "When the number of entries is greater than 1, entry.output.name needs to be unique. Received: {}",
        format_list(.names)
    )]
    DuplicateEntryName { names: Vec<String> },
}

impl ValidationError {
    /// Whether this is a schema violation rather than a semantic one.
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::Structural { .. })
    }
}

fn format_list<T: serde::Serialize + ?Sized>(items: &T) -> String {
    serde_json::to_string(items).unwrap_or_default()
}
