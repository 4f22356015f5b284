//! Template-variable injection
//!
//! Replaces `${path.to.value}` tokens in string values with values looked
//! up in an [`InjectionContext`]. Only string leaves are visited; map keys
//! and non-string values are never rewritten.
//!
//! Unknown paths and falsy values (`""`, `0`, `false`, `null`) degrade to
//! the bare expression text, so `${missing.path}` becomes `missing.path`
//! instead of failing the resolution.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::{Map, Value};
use wb_fs::NormalizedPath;

use crate::manifest::{
    EntryDescriptor, EntryOptions, EntryOverride, Importmap, ManifestConfig, OutputConfig,
    OutputMeta, PathRewrite, ProxyRule, ServerConfig, ServerHost,
};

static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").unwrap());

/// Values available to `${...}` tokens.
///
/// Built from the workspace root and the package descriptor, exposed as
/// `workspaceRoot` and `package`.
#[derive(Debug, Clone, PartialEq)]
pub struct InjectionContext {
    data: Value,
}

impl InjectionContext {
    pub fn new(workspace_root: Option<&NormalizedPath>, package: Option<Value>) -> Self {
        let mut data = Map::new();
        data.insert(
            "workspaceRoot".into(),
            Value::String(workspace_root.map(|p| p.as_str().to_string()).unwrap_or_default()),
        );
        data.insert("package".into(), package.unwrap_or(Value::Null));
        Self {
            data: Value::Object(data),
        }
    }

    /// Use an arbitrary JSON document as the context.
    pub fn from_value(data: Value) -> Self {
        Self { data }
    }

    /// Look up a dotted path such as `package.name` or `package.files[0]`.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut segments = path_segments(path).peekable();
        segments.peek()?;
        segments.try_fold(&self.data, |value, segment| match value {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
    }

    /// Substitute every token in `input`.
    pub fn render<'a>(&self, input: &'a str) -> Cow<'a, str> {
        TOKEN_PATTERN.replace_all(input, |caps: &Captures<'_>| {
            let expression = &caps[1];
            match self.lookup(expression).filter(|value| !is_falsy(value)) {
                Some(value) => {
                    tracing::trace!(expression, "Injected variable");
                    render_value(value)
                }
                None => {
                    tracing::trace!(expression, "Unresolved variable, keeping expression");
                    expression.to_string()
                }
            }
        })
    }
}

/// Split `a.b[0].c` into `a`, `b`, `0`, `c`.
fn path_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(['.', '[', ']'])
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Types whose string leaves can be rewritten in place.
pub trait VisitStrings {
    fn visit_strings(&mut self, visit: &mut dyn FnMut(&mut String));
}

impl VisitStrings for String {
    fn visit_strings(&mut self, visit: &mut dyn FnMut(&mut String)) {
        visit(self);
    }
}

impl<T: VisitStrings> VisitStrings for Option<T> {
    fn visit_strings(&mut self, visit: &mut dyn FnMut(&mut String)) {
        if let Some(inner) = self {
            inner.visit_strings(visit);
        }
    }
}

impl<T: VisitStrings> VisitStrings for Vec<T> {
    fn visit_strings(&mut self, visit: &mut dyn FnMut(&mut String)) {
        for item in self {
            item.visit_strings(visit);
        }
    }
}

impl<V: VisitStrings> VisitStrings for BTreeMap<String, V> {
    fn visit_strings(&mut self, visit: &mut dyn FnMut(&mut String)) {
        for value in self.values_mut() {
            value.visit_strings(visit);
        }
    }
}

impl VisitStrings for Value {
    fn visit_strings(&mut self, visit: &mut dyn FnMut(&mut String)) {
        match self {
            Value::String(s) => visit(s),
            Value::Array(items) => items.visit_strings(visit),
            Value::Object(map) => {
                for value in map.values_mut() {
                    value.visit_strings(visit);
                }
            }
            Value::Null | Value::Bool(_) | Value::Number(_) => {}
        }
    }
}

impl VisitStrings for ManifestConfig {
    fn visit_strings(&mut self, visit: &mut dyn FnMut(&mut String)) {
        self.schema_version.visit_strings(visit);
        self.entries.visit_strings(visit);
        self.env.visit_strings(visit);
    }
}

impl VisitStrings for EntryDescriptor {
    fn visit_strings(&mut self, visit: &mut dyn FnMut(&mut String)) {
        self.entry.visit_strings(visit);
        self.options.visit_strings(visit);
    }
}

impl VisitStrings for EntryOverride {
    fn visit_strings(&mut self, visit: &mut dyn FnMut(&mut String)) {
        self.entry.visit_strings(visit);
        self.options.visit_strings(visit);
    }
}

impl VisitStrings for EntryOptions {
    fn visit_strings(&mut self, visit: &mut dyn FnMut(&mut String)) {
        self.public_path.visit_strings(visit);
        self.externals.visit_strings(visit);
        self.server.visit_strings(visit);
        self.out_dir.visit_strings(visit);
        self.importmap.visit_strings(visit);
        self.output.visit_strings(visit);
    }
}

impl VisitStrings for Importmap {
    fn visit_strings(&mut self, visit: &mut dyn FnMut(&mut String)) {
        if let Importmap::Path(path) = self {
            visit(path);
        }
    }
}

impl VisitStrings for ServerConfig {
    fn visit_strings(&mut self, visit: &mut dyn FnMut(&mut String)) {
        self.host.visit_strings(visit);
        self.proxy.visit_strings(visit);
    }
}

impl VisitStrings for ServerHost {
    fn visit_strings(&mut self, visit: &mut dyn FnMut(&mut String)) {
        if let ServerHost::Name(name) = self {
            visit(name);
        }
    }
}

impl VisitStrings for ProxyRule {
    fn visit_strings(&mut self, visit: &mut dyn FnMut(&mut String)) {
        self.url.visit_strings(visit);
        self.target.visit_strings(visit);
        self.path_rewrite.visit_strings(visit);
    }
}

impl VisitStrings for PathRewrite {
    fn visit_strings(&mut self, visit: &mut dyn FnMut(&mut String)) {
        self.regular.visit_strings(visit);
        self.replacement.visit_strings(visit);
    }
}

impl VisitStrings for OutputConfig {
    fn visit_strings(&mut self, visit: &mut dyn FnMut(&mut String)) {
        self.name.visit_strings(visit);
        self.meta.visit_strings(visit);
    }
}

impl VisitStrings for OutputMeta {
    fn visit_strings(&mut self, visit: &mut dyn FnMut(&mut String)) {
        self.umd_name.visit_strings(visit);
    }
}

/// Substitute `${...}` tokens throughout `config`.
///
/// With no context, `config` is returned untouched. A context whose values
/// are all missing still rewrites every token to its expression text.
pub fn inject_variables<T: VisitStrings>(mut config: T, context: Option<&InjectionContext>) -> T {
    let Some(context) = context else {
        return config;
    };

    config.visit_strings(&mut |value: &mut String| {
        let rendered = match context.render(value) {
            Cow::Borrowed(_) => return,
            Cow::Owned(rendered) => rendered,
        };
        *value = rendered;
    });
    config
}

/// Substitute `${...}` tokens throughout a manifest.
pub fn inject_variables_to_manifest(
    manifest: ManifestConfig,
    context: Option<&InjectionContext>,
) -> ManifestConfig {
    inject_variables(manifest, context)
}
