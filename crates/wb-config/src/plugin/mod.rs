//! Plugin adaptation
//!
//! Plugins are declared once, backend-agnostic, as [`PluginDescriptor`]s.
//! The [`PluginAdapter`] turns them into one ordered sequence of
//! [`NativePlugin`]s per bundler, plus a separate sequence of dev-server
//! plugins split out of the descriptors.

mod adapter;
mod descriptor;
mod factory;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use adapter::{PluginAdapter, PluginInstance, resolve_plugins};
pub use descriptor::{DevServerPlugin, Enforce, PluginDescriptor, UniversalPlugin, split_dev_server};
pub use factory::{DefaultPluginFactory, NativePlugin, PluginFactory};

/// Bundler backends that receive adapted plugins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BundlerKind {
    Vite,
    Rollup,
    Webpack,
    Esbuild,
}

impl BundlerKind {
    /// Every bundler, in the order plugins are materialized.
    pub const ALL: [BundlerKind; 4] = [
        BundlerKind::Vite,
        BundlerKind::Rollup,
        BundlerKind::Webpack,
        BundlerKind::Esbuild,
    ];
}

impl fmt::Display for BundlerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BundlerKind::Vite => write!(f, "vite"),
            BundlerKind::Rollup => write!(f, "rollup"),
            BundlerKind::Webpack => write!(f, "webpack"),
            BundlerKind::Esbuild => write!(f, "esbuild"),
        }
    }
}
