//! Filesystem collaborators for web-builder configuration resolution.
//!
//! Provides path normalization, format-agnostic config loading from a
//! search path of candidate file names, and discovery of the enclosing
//! workspace root and nearest `package.json`.

pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod path;
pub mod workspace;

pub use config::{ConfigFormat, ConfigStore, LoadedConfig, load_config};
pub use constants::ConfigFile;
pub use error::{Error, Result};
pub use path::{NormalizedPath, resolve_root};
pub use workspace::{find_workspace_root, read_package_json};
