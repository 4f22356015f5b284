//! Backend-agnostic plugin descriptions

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// When a plugin runs relative to the bundler's core plugins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Enforce {
    Pre,
    Post,
}

/// A plugin as declared in configuration.
///
/// Fields other than `name`, `enforce` and `webDevServer` are opaque hook
/// options passed through to every backend.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enforce: Option<Enforce>,
    /// Part of the plugin meant for the web dev server only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_dev_server: Option<DevServerPlugin>,
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

impl PluginDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }

    pub fn with_web_dev_server(mut self, plugin: DevServerPlugin) -> Self {
        self.web_dev_server = Some(plugin);
        self
    }
}

/// A dev-server plugin, named after the descriptor it came from.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DevServerPlugin {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

/// A descriptor with its dev-server part removed, ready for the bundler
/// factories.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct UniversalPlugin {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enforce: Option<Enforce>,
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

/// Separate a descriptor into its bundler part and its dev-server part.
///
/// The dev-server part takes the descriptor's `name`; a descriptor without
/// a name yields an unnamed dev-server plugin. The input is not modified.
pub fn split_dev_server(descriptor: &PluginDescriptor) -> (UniversalPlugin, Option<DevServerPlugin>) {
    let universal = UniversalPlugin {
        name: descriptor.name.clone(),
        enforce: descriptor.enforce,
        options: descriptor.options.clone(),
    };

    let dev_server = descriptor.web_dev_server.as_ref().map(|plugin| DevServerPlugin {
        name: descriptor.name.clone(),
        options: plugin.options.clone(),
    });

    (universal, dev_server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn split_stamps_name_and_leaves_input_intact() {
        let descriptor: PluginDescriptor = serde_json::from_value(json!({
            "name": "mock",
            "enforce": "pre",
            "transform": "inline",
            "webDevServer": { "name": "ignored", "serve": true }
        }))
        .unwrap();
        let before = descriptor.clone();

        let (universal, dev_server) = split_dev_server(&descriptor);

        assert_eq!(descriptor, before);
        assert_eq!(universal.name.as_deref(), Some("mock"));
        assert_eq!(universal.enforce, Some(Enforce::Pre));
        assert_eq!(
            serde_json::to_value(&universal).unwrap(),
            json!({ "name": "mock", "enforce": "pre", "transform": "inline" })
        );

        let dev_server = dev_server.unwrap();
        assert_eq!(dev_server.name.as_deref(), Some("mock"));
        assert_eq!(dev_server.options["serve"], json!(true));
    }

    #[test]
    fn unnamed_descriptor_yields_unnamed_dev_server_plugin() {
        let descriptor = PluginDescriptor {
            web_dev_server: Some(DevServerPlugin::default()),
            ..PluginDescriptor::default()
        };
        let (_, dev_server) = split_dev_server(&descriptor);
        assert_eq!(dev_server, Some(DevServerPlugin::default()));
    }

    #[test]
    fn descriptor_without_dev_server_part() {
        let (universal, dev_server) = split_dev_server(&PluginDescriptor::new("plain"));
        assert_eq!(universal.name.as_deref(), Some("plain"));
        assert!(dev_server.is_none());
    }
}
