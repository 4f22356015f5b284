//! Compiled-in defaults

use std::collections::BTreeMap;

use crate::config::{BundlerType, ConfigLayer};
use crate::manifest::{EntryDescriptor, ManifestConfig};

/// Manifest format version written into defaults.
pub const DEFAULT_SCHEMA_VERSION: &str = "1.0.0";

/// Entry file assumed when a project has no manifest.
pub const DEFAULT_ENTRY: &str = "src/main.ts";

pub const DEFAULT_PUBLIC_PATH: &str = "/";

pub const DEFAULT_OUT_DIR: &str = "dist";

fn default_entry() -> EntryDescriptor {
    let mut entry = EntryDescriptor::new(DEFAULT_ENTRY);
    entry.options.public_path = Some(DEFAULT_PUBLIC_PATH.to_string());
    entry.options.out_dir = Some(DEFAULT_OUT_DIR.to_string());
    entry
}

/// Manifest used when the project declares none.
pub fn default_manifest() -> ManifestConfig {
    ManifestConfig {
        schema_version: DEFAULT_SCHEMA_VERSION.to_string(),
        entries: vec![default_entry()],
        env: None,
    }
}

/// Lowest-precedence configuration layer.
pub fn default_config() -> ConfigLayer {
    ConfigLayer {
        bundler_type: Some(BundlerType::Vite),
        plugins: Some(Vec::new()),
        schema_version: Some(DEFAULT_SCHEMA_VERSION.to_string()),
        entries: Some(vec![default_entry()]),
        env: Some(BTreeMap::new()),
    }
}
