//! Well-known file names consulted during resolution.

/// Candidate names for the project-level user config, in lookup order.
pub const USER_CONFIG_FILES: &[&str] = &[
    "web-builder.config.json",
    "web-builder.config.toml",
    "web-builder.config.yaml",
    "web-builder.config.yml",
];

/// Candidate names for the project manifest, in lookup order.
pub const MANIFEST_FILES: &[&str] = &[
    "project-manifest.json",
    "project-manifest.toml",
    "project-manifest.yaml",
    "project-manifest.yml",
];

/// Files whose presence marks a multi-package workspace root.
pub const WORKSPACE_MARKERS: &[&str] = &["pnpm-workspace.yaml", "lerna.json", "rush.json"];

/// Standard files read by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFile {
    /// `web-builder.config.*` user configuration
    UserConfig,
    /// `project-manifest.*` manifest declaration
    Manifest,
    /// `web-site.config.json`, whose presence switches the bundler to the dev server
    SiteMarker,
    /// `package.json` package descriptor
    PackageJson,
}

impl ConfigFile {
    /// Primary file name for this kind of file.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserConfig => USER_CONFIG_FILES[0],
            Self::Manifest => MANIFEST_FILES[0],
            Self::SiteMarker => "web-site.config.json",
            Self::PackageJson => "package.json",
        }
    }

    /// Every accepted file name, in lookup order.
    pub fn candidates(&self) -> &'static [&'static str] {
        match self {
            Self::UserConfig => USER_CONFIG_FILES,
            Self::Manifest => MANIFEST_FILES,
            Self::SiteMarker => &["web-site.config.json"],
            Self::PackageJson => &["package.json"],
        }
    }
}
