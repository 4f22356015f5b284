//! Descriptor list to per-backend plugin sequences

use serde::Serialize;

use super::descriptor::{DevServerPlugin, PluginDescriptor, split_dev_server};
use super::factory::{DefaultPluginFactory, NativePlugin, PluginFactory};
use super::BundlerKind;
use crate::Result;

/// Adapted plugins, one ordered sequence per backend.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginInstance {
    pub vite: Vec<NativePlugin>,
    pub rollup: Vec<NativePlugin>,
    pub webpack: Vec<NativePlugin>,
    pub esbuild: Vec<NativePlugin>,
    pub web_dev_server: Vec<DevServerPlugin>,
}

impl PluginInstance {
    /// The sequence built for one bundler.
    pub fn for_backend(&self, backend: BundlerKind) -> &[NativePlugin] {
        match backend {
            BundlerKind::Vite => &self.vite,
            BundlerKind::Rollup => &self.rollup,
            BundlerKind::Webpack => &self.webpack,
            BundlerKind::Esbuild => &self.esbuild,
        }
    }

    fn for_backend_mut(&mut self, backend: BundlerKind) -> &mut Vec<NativePlugin> {
        match backend {
            BundlerKind::Vite => &mut self.vite,
            BundlerKind::Rollup => &mut self.rollup,
            BundlerKind::Webpack => &mut self.webpack,
            BundlerKind::Esbuild => &mut self.esbuild,
        }
    }

    /// Whether no backend received any plugin.
    pub fn is_empty(&self) -> bool {
        BundlerKind::ALL
            .iter()
            .all(|backend| self.for_backend(*backend).is_empty())
            && self.web_dev_server.is_empty()
    }
}

/// Materializes descriptors through a [`PluginFactory`].
#[derive(Debug, Clone, Default)]
pub struct PluginAdapter<F = DefaultPluginFactory> {
    factory: F,
}

impl PluginAdapter<DefaultPluginFactory> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<F: PluginFactory> PluginAdapter<F> {
    pub fn with_factory(factory: F) -> Self {
        Self { factory }
    }

    /// Build the per-backend sequences.
    ///
    /// Within every sequence, plugins keep the order of `descriptors`. Dev
    /// server parts go only to `web_dev_server`; bundler plugins never
    /// carry them.
    pub async fn adapt(&self, descriptors: &[PluginDescriptor]) -> Result<PluginInstance> {
        let mut instance = PluginInstance::default();

        for descriptor in descriptors {
            let (universal, dev_server) = split_dev_server(descriptor);

            if let Some(dev_server) = dev_server {
                tracing::debug!(plugin = ?dev_server.name, "Split dev-server plugin");
                instance.web_dev_server.push(dev_server);
            }

            for backend in BundlerKind::ALL {
                let native = self.factory.create(backend, &universal).await?;
                instance.for_backend_mut(backend).push(native);
            }
        }

        tracing::debug!(
            plugins = descriptors.len(),
            dev_server = instance.web_dev_server.len(),
            "Adapted plugins"
        );
        Ok(instance)
    }
}

/// Adapt `descriptors` with the default factory.
pub async fn resolve_plugins(descriptors: &[PluginDescriptor]) -> Result<PluginInstance> {
    PluginAdapter::new().adapt(descriptors).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::plugin::UniversalPlugin;
    use async_trait::async_trait;

    struct RejectingFactory(BundlerKind);

    #[async_trait]
    impl PluginFactory for RejectingFactory {
        async fn create(&self, backend: BundlerKind, plugin: &UniversalPlugin) -> Result<NativePlugin> {
            if backend == self.0 {
                return Err(Error::Plugin {
                    backend,
                    name: plugin.name.clone(),
                    message: "unsupported hook".into(),
                });
            }
            DefaultPluginFactory.create(backend, plugin).await
        }
    }

    #[tokio::test]
    async fn empty_list_gives_empty_sequences() {
        let instance = resolve_plugins(&[]).await.unwrap();
        assert!(instance.is_empty());
        assert_eq!(instance, PluginInstance::default());
    }

    #[tokio::test]
    async fn every_bundler_gets_every_plugin() {
        let instance = resolve_plugins(&[PluginDescriptor::new("a")]).await.unwrap();
        for backend in BundlerKind::ALL {
            let plugins = instance.for_backend(backend);
            assert_eq!(plugins.len(), 1, "{backend}");
            assert_eq!(plugins[0].backend, backend);
        }
    }

    #[tokio::test]
    async fn factory_errors_propagate() {
        let adapter = PluginAdapter::with_factory(RejectingFactory(BundlerKind::Esbuild));
        let error = adapter
            .adapt(&[PluginDescriptor::new("a")])
            .await
            .unwrap_err();
        assert!(error.to_string().contains("esbuild"), "{error}");
    }
}
