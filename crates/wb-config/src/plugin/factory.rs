//! Backend plugin factories

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

use super::BundlerKind;
use super::descriptor::{Enforce, UniversalPlugin};
use crate::Result;

/// A plugin materialized for one bundler.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NativePlugin {
    pub backend: BundlerKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enforce: Option<Enforce>,
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

/// Converts universal plugins into a bundler's native plugin objects.
#[async_trait]
pub trait PluginFactory: Send + Sync {
    async fn create(&self, backend: BundlerKind, plugin: &UniversalPlugin) -> Result<NativePlugin>;
}

/// Factory that tags a copy of the universal plugin with its backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPluginFactory;

#[async_trait]
impl PluginFactory for DefaultPluginFactory {
    async fn create(&self, backend: BundlerKind, plugin: &UniversalPlugin) -> Result<NativePlugin> {
        Ok(NativePlugin {
            backend,
            name: plugin.name.clone(),
            enforce: plugin.enforce,
            options: plugin.options.clone(),
        })
    }
}
