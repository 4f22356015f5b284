//! Build configuration resolution for web-builder.
//!
//! Combines a project's user config, its manifest and compiled-in defaults
//! into one validated [`ResolvedConfig`]:
//!
//! - [`merge`]: typed precedence merge (manifest over user over defaults)
//! - [`inject`]: `${path}` substitution from the workspace and package.json
//! - [`validation`] and [`schema`]: structural and semantic manifest checks
//! - [`plugin`]: per-backend plugin adaptation
//! - [`resolver`]: the async orchestration of all of the above

pub mod config;
pub mod defaults;
pub mod error;
pub mod inject;
pub mod manifest;
pub mod merge;
pub mod plugin;
pub mod resolver;
pub mod schema;
pub mod source;
pub mod validation;

pub use config::{
    BundlerType, Command, ConfigEnv, ConfigLayer, InlineConfig, PRODUCTION_MODE, ResolvedConfig,
    UserConfig,
};
pub use defaults::{default_config, default_manifest};
pub use error::{Error, Result, ValidationError};
pub use inject::{InjectionContext, VisitStrings, inject_variables, inject_variables_to_manifest};
pub use manifest::{
    EntryDescriptor, EntryOptions, EntryOverride, Importmap, ManifestConfig, OutputConfig,
    OutputFormat, OutputMeta, ProxyRule, ServerConfig, ServerHost,
};
pub use merge::{Merge, merge_layers};
pub use plugin::{
    BundlerKind, DefaultPluginFactory, DevServerPlugin, NativePlugin, PluginAdapter,
    PluginDescriptor, PluginFactory, PluginInstance, UniversalPlugin, resolve_plugins,
    split_dev_server,
};
pub use resolver::{DEFAULT_MODE, Resolver, resolve_config, resolve_project};
pub use schema::Schema;
pub use source::{FsProjectSource, ProjectSource};
pub use validation::{check_layer, check_manifest, validate_manifest_config};
