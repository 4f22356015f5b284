//! Typed recursive merge of configuration layers
//!
//! Rules, applied field by field:
//!
//! - A field absent in the higher-precedence value keeps the lower value.
//! - Nested structs and maps merge recursively, key by key.
//! - Scalars and enums are replaced.
//! - Arrays are replaced wholesale, never concatenated. An absent
//!   higher array leaves the lower array in place.
//!
//! Precedence, highest first: manifest, user config, defaults.

use std::collections::BTreeMap;

use crate::config::{BundlerType, ConfigLayer};
use crate::manifest::{
    EntryDescriptor, EntryOptions, EntryOverride, Importmap, ManifestConfig, OutputConfig,
    OutputMeta, ServerConfig, ServerHost,
};

/// Overlay a higher-precedence value onto `self`.
pub trait Merge {
    fn merge(&mut self, higher: Self);
}

macro_rules! merge_by_replace {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Merge for $ty {
                fn merge(&mut self, higher: Self) {
                    *self = higher;
                }
            }
        )*
    };
}

merge_by_replace!(String, bool, u16, BundlerType, Importmap, ServerHost);

impl<T> Merge for Vec<T> {
    fn merge(&mut self, higher: Self) {
        *self = higher;
    }
}

impl<T: Merge> Merge for Option<T> {
    fn merge(&mut self, higher: Self) {
        let Some(higher) = higher else {
            return;
        };
        match self {
            Some(current) => current.merge(higher),
            None => *self = Some(higher),
        }
    }
}

impl<V: Merge> Merge for BTreeMap<String, V> {
    fn merge(&mut self, higher: Self) {
        for (key, value) in higher {
            match self.get_mut(&key) {
                Some(current) => current.merge(value),
                None => {
                    self.insert(key, value);
                }
            }
        }
    }
}

impl Merge for ConfigLayer {
    fn merge(&mut self, higher: Self) {
        self.bundler_type.merge(higher.bundler_type);
        self.plugins.merge(higher.plugins);
        self.schema_version.merge(higher.schema_version);
        self.entries.merge(higher.entries);
        self.env.merge(higher.env);
    }
}

impl Merge for EntryOptions {
    fn merge(&mut self, higher: Self) {
        self.public_path.merge(higher.public_path);
        self.externals.merge(higher.externals);
        self.server.merge(higher.server);
        self.out_dir.merge(higher.out_dir);
        self.importmap.merge(higher.importmap);
        self.formats.merge(higher.formats);
        self.output.merge(higher.output);
    }
}

impl Merge for EntryOverride {
    fn merge(&mut self, higher: Self) {
        self.entry.merge(higher.entry);
        self.options.merge(higher.options);
    }
}

impl Merge for ServerConfig {
    fn merge(&mut self, higher: Self) {
        self.port.merge(higher.port);
        self.host.merge(higher.host);
        self.proxy.merge(higher.proxy);
    }
}

impl Merge for OutputConfig {
    fn merge(&mut self, higher: Self) {
        self.name.merge(higher.name);
        self.formats.merge(higher.formats);
        self.meta.merge(higher.meta);
    }
}

impl Merge for OutputMeta {
    fn merge(&mut self, higher: Self) {
        self.umd_name.merge(higher.umd_name);
    }
}

/// Combine the three configuration sources into one layer.
///
/// The manifest overrides the user config, and both override the defaults.
/// Pure: the result depends only on the three inputs.
pub fn merge_layers(user: ConfigLayer, manifest: ConfigLayer, defaults: ConfigLayer) -> ConfigLayer {
    let mut merged = defaults;
    merged.merge(user);
    merged.merge(manifest);
    merged
}

impl EntryDescriptor {
    /// Apply an environment override on top of this entry.
    pub fn apply_override(&mut self, environment: EntryOverride) {
        if let Some(entry) = environment.entry {
            self.entry = entry;
        }
        self.options.merge(environment.options);
    }
}

impl ManifestConfig {
    /// Apply `env[mode]`, if declared, to every entry.
    pub fn with_env_overrides(mut self, mode: &str) -> Self {
        let Some(environment) = self.env.as_ref().and_then(|env| env.get(mode)).cloned() else {
            return self;
        };

        tracing::debug!(mode, entries = self.entries.len(), "Applying environment overrides");
        for entry in &mut self.entries {
            entry.apply_override(environment.clone());
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::OutputFormat;
    use pretty_assertions::assert_eq;

    fn layer_with_bundler(bundler_type: BundlerType) -> ConfigLayer {
        ConfigLayer {
            bundler_type: Some(bundler_type),
            ..ConfigLayer::default()
        }
    }

    #[test]
    fn manifest_beats_user_beats_defaults() {
        let merged = merge_layers(
            layer_with_bundler(BundlerType::Webpack),
            layer_with_bundler(BundlerType::Rollup),
            layer_with_bundler(BundlerType::Vite),
        );
        assert_eq!(merged.bundler_type, Some(BundlerType::Rollup));

        let merged = merge_layers(
            layer_with_bundler(BundlerType::Webpack),
            ConfigLayer::default(),
            layer_with_bundler(BundlerType::Vite),
        );
        assert_eq!(merged.bundler_type, Some(BundlerType::Webpack));
    }

    #[test]
    fn defaults_survive_when_nothing_overrides() {
        let defaults = ConfigLayer {
            bundler_type: Some(BundlerType::Vite),
            schema_version: Some("1.0.0".into()),
            plugins: Some(vec![]),
            ..ConfigLayer::default()
        };
        let merged = merge_layers(ConfigLayer::default(), ConfigLayer::default(), defaults.clone());
        assert_eq!(merged, defaults);
    }

    #[test]
    fn arrays_are_replaced_not_concatenated() {
        let mut lower = OutputConfig {
            formats: Some(vec![OutputFormat::Es, OutputFormat::Cjs]),
            ..OutputConfig::default()
        };
        lower.merge(OutputConfig {
            formats: Some(vec![OutputFormat::Umd]),
            ..OutputConfig::default()
        });
        assert_eq!(lower.formats, Some(vec![OutputFormat::Umd]));

        lower.merge(OutputConfig::default());
        assert_eq!(lower.formats, Some(vec![OutputFormat::Umd]));
    }

    #[test]
    fn nested_structs_merge_recursively() {
        let mut lower = EntryOptions {
            server: Some(ServerConfig {
                port: Some(3000),
                host: Some(ServerHost::Name("localhost".into())),
                proxy: None,
            }),
            ..EntryOptions::default()
        };
        lower.merge(EntryOptions {
            server: Some(ServerConfig {
                port: Some(8080),
                ..ServerConfig::default()
            }),
            ..EntryOptions::default()
        });

        let server = lower.server.unwrap();
        assert_eq!(server.port, Some(8080));
        assert_eq!(server.host, Some(ServerHost::Name("localhost".into())));
    }

    #[test]
    fn maps_merge_key_by_key() {
        let mut lower: BTreeMap<String, String> =
            [("vue".to_string(), "Vue".to_string()), ("react".to_string(), "React".to_string())]
                .into_iter()
                .collect();
        lower.merge([("vue".to_string(), "VueGlobal".to_string())].into_iter().collect());

        assert_eq!(lower["vue"], "VueGlobal");
        assert_eq!(lower["react"], "React");
    }

    #[test]
    fn explicit_null_importmap_overrides_path() {
        let mut lower = EntryOptions {
            importmap: Some(Importmap::Path("importmap.json".into())),
            ..EntryOptions::default()
        };
        lower.merge(EntryOptions {
            importmap: Some(Importmap::Disabled),
            ..EntryOptions::default()
        });
        assert_eq!(lower.importmap, Some(Importmap::Disabled));
    }

    #[test]
    fn env_overrides_apply_to_every_entry() {
        let manifest: ManifestConfig = serde_json::from_value(serde_json::json!({
            "schemaVersion": "1.0.0",
            "entries": [
                { "entry": "src/a.ts", "publicPath": "/a/", "outDir": "dist/a" },
                { "entry": "src/b.ts", "output": { "name": "b" } }
            ],
            "env": {
                "production": { "publicPath": "https://cdn.example.com/" }
            }
        }))
        .unwrap();

        let production = manifest.clone().with_env_overrides("production");
        assert_eq!(
            production.entries[0].options.public_path.as_deref(),
            Some("https://cdn.example.com/")
        );
        assert_eq!(production.entries[0].options.out_dir.as_deref(), Some("dist/a"));
        assert_eq!(
            production.entries[1].options.public_path.as_deref(),
            Some("https://cdn.example.com/")
        );
        assert_eq!(production.entries[1].entry, "src/b.ts");

        let development = manifest.clone().with_env_overrides("development");
        assert_eq!(development, manifest);
    }
}
