//! Manifest validation
//!
//! Checks run in a fixed order and stop at the first failure:
//!
//! 1. the structural schema
//! 2. `schemaVersion` is a semantic version
//! 3. per entry, in order: the `publicPath` prefix, then the UMD name
//!    requirement
//! 4. output names are unique, when there is more than one entry

use std::collections::HashSet;

use serde_json::Value;

use crate::config::ConfigLayer;
use crate::error::ValidationError;
use crate::manifest::{EntryDescriptor, ManifestConfig};
use crate::schema::Schema;

/// Validate a raw manifest document and return it typed.
///
/// `schema` defaults to the bundled manifest schema.
pub fn validate_manifest_config(
    document: &Value,
    schema: Option<&Schema>,
) -> Result<ManifestConfig, ValidationError> {
    schema.unwrap_or_else(|| Schema::manifest()).validate(document)?;

    let manifest: ManifestConfig =
        serde_json::from_value(document.clone()).map_err(|e| ValidationError::Structural {
            pointer: "/".to_string(),
            message: e.to_string(),
        })?;

    check_manifest(&manifest)?;
    Ok(manifest)
}

/// Run the semantic checks on an already-typed manifest.
pub fn check_manifest(manifest: &ManifestConfig) -> Result<(), ValidationError> {
    check_entries(&manifest.schema_version, &manifest.entries)?;
    tracing::debug!(entries = manifest.entries.len(), "Manifest validated");
    Ok(())
}

/// Run the semantic checks on a merged configuration layer.
///
/// Environment and inline overrides land after the manifest was
/// validated, so the final layer is checked again before it is returned.
pub fn check_layer(layer: &ConfigLayer) -> Result<(), ValidationError> {
    check_entries(
        layer.schema_version.as_deref().unwrap_or_default(),
        layer.entries.as_deref().unwrap_or_default(),
    )
}

fn check_entries(schema_version: &str, entries: &[EntryDescriptor]) -> Result<(), ValidationError> {
    check_schema_version(schema_version)?;

    for entry in entries {
        check_public_path(entry)?;
        check_umd_name(entry)?;
    }

    if entries.len() > 1 {
        check_unique_names(entries)?;
    }
    Ok(())
}

fn check_schema_version(version: &str) -> Result<(), ValidationError> {
    semver::Version::parse(semver_text(version))
        .map(|_| ())
        .map_err(|_| ValidationError::InvalidSchemaVersion {
            received: version.to_string(),
        })
}

/// Tolerate the leading `v` or `=` that loose semver parsers accept.
fn semver_text(version: &str) -> &str {
    let trimmed = version.trim();
    trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('='))
        .unwrap_or(trimmed)
}

fn check_public_path(entry: &EntryDescriptor) -> Result<(), ValidationError> {
    match entry.options.public_path.as_deref() {
        Some(path) if !path.is_empty() && !path.starts_with('/') && !path.starts_with("http") => {
            Err(ValidationError::InvalidPublicPath {
                entry: entry.entry.clone(),
                received: path.to_string(),
            })
        }
        _ => Ok(()),
    }
}

fn check_umd_name(entry: &EntryDescriptor) -> Result<(), ValidationError> {
    let formats = entry.output_formats();
    if formats.iter().any(|format| format.requires_global_name()) && entry.umd_name().is_none() {
        return Err(ValidationError::MissingUmdName {
            entry: entry.entry.clone(),
            formats: formats.to_vec(),
        });
    }
    Ok(())
}

fn check_unique_names(entries: &[EntryDescriptor]) -> Result<(), ValidationError> {
    let names: Vec<String> = entries
        .iter()
        .map(|entry| entry.output_name().to_string())
        .collect();
    let mut seen = HashSet::with_capacity(names.len());
    if names.iter().all(|name| seen.insert(name.as_str())) {
        return Ok(());
    }
    Err(ValidationError::DuplicateEntryName { names })
}
