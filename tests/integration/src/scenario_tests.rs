//! Scenario tests for configuration resolution
//!
//! Each module covers one user-facing behavior, resolving real project
//! layouts on disk.

use predicates::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use wb_config::{
    BundlerType, Command, DEFAULT_MODE, Error, InlineConfig, ResolvedConfig, Resolver,
    ValidationError,
};
use wb_test_utils::TestProject;

// =============================================================================
// Test Infrastructure
// =============================================================================

async fn try_resolve(project: &TestProject, command: Command) -> wb_config::Result<ResolvedConfig> {
    Resolver::new()
        .with_cwd(project.root())
        .resolve(InlineConfig::new(), command, DEFAULT_MODE)
        .await
}

async fn resolve(project: &TestProject) -> ResolvedConfig {
    try_resolve(project, Command::Build).await.unwrap()
}

async fn validation_error(manifest: Value) -> ValidationError {
    let project = TestProject::new().manifest(manifest);
    match try_resolve(&project, Command::Build).await {
        Err(Error::Validation(error)) => error,
        other => panic!("expected a validation error, got {other:?}"),
    }
}

// =============================================================================
// Scenario 1: Projects without configuration
// =============================================================================

mod s1_defaults {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn bare_directory_builds_src_main() {
        let project = TestProject::new();

        let resolved = resolve(&project).await;

        assert_eq!(resolved.bundler_type, BundlerType::Vite);
        assert_eq!(resolved.entries[0].entry, "src/main.ts");
        assert_eq!(resolved.entries[0].options.out_dir.as_deref(), Some("dist"));
        assert!(resolved.plugins.is_empty());
        assert!(resolved.plugin_instance.is_empty());
    }

    #[tokio::test]
    async fn yaml_user_config_is_discovered() {
        let project = TestProject::new().file(
            "web-builder.config.yml",
            "bundlerType: webpack\nplugins:\n  - name: env\n",
        );

        let resolved = resolve(&project).await;

        assert_eq!(resolved.bundler_type, BundlerType::Webpack);
        assert_eq!(resolved.plugins[0].name.as_deref(), Some("env"));
    }

    #[tokio::test]
    async fn json_candidate_wins_over_toml() {
        let project = TestProject::new()
            .user_config(json!({ "bundlerType": "esbuild" }))
            .file("web-builder.config.toml", "bundlerType = \"webpack\"\n");

        assert_eq!(resolve(&project).await.bundler_type, BundlerType::Esbuild);
    }
}

// =============================================================================
// Scenario 2: Precedence
// =============================================================================

mod s2_precedence {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn manifest_entries_replace_user_entries() {
        let project = TestProject::new()
            .user_config(json!({
                "entries": [{ "entry": "src/a.ts" }, { "entry": "src/b.ts", "output": { "name": "b" } }]
            }))
            .manifest(json!({
                "schemaVersion": "1.0.0",
                "entries": [{ "entry": "src/only.ts" }]
            }));

        let resolved = resolve(&project).await;

        let entries: Vec<_> = resolved.entries.iter().map(|e| e.entry.as_str()).collect();
        assert_eq!(entries, ["src/only.ts"]);
    }

    #[tokio::test]
    async fn user_plugins_survive_a_manifest() {
        let project = TestProject::new()
            .user_config(json!({ "plugins": [{ "name": "svg" }] }))
            .manifest(json!({ "schemaVersion": "1.0.0", "entries": [{ "entry": "src/a.ts" }] }));

        let resolved = resolve(&project).await;

        assert_eq!(resolved.plugins.len(), 1);
        assert_eq!(resolved.plugin_instance.rollup.len(), 1);
    }
}

// =============================================================================
// Scenario 3: Manifest validation
// =============================================================================

mod s3_validation {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn relative_public_path_is_rejected() {
        let error = validation_error(json!({
            "schemaVersion": "1.0.0",
            "entries": [{ "entry": "src/a.ts", "publicPath": "assets/" }]
        }))
        .await;

        let message = error.to_string();
        assert!(predicate::str::contains("publicPath").eval(&message), "{message}");
        assert!(predicate::str::contains("assets/").eval(&message), "{message}");
    }

    #[tokio::test]
    async fn umd_without_name_is_rejected() {
        let error = validation_error(json!({
            "schemaVersion": "1.0.0",
            "entries": [{ "entry": "src/a.ts", "output": { "formats": ["umd"] } }]
        }))
        .await;

        assert!(matches!(error, ValidationError::MissingUmdName { .. }));
        assert!(predicate::str::contains("umdName").eval(&error.to_string()));
    }

    #[tokio::test]
    async fn duplicate_names_are_listed() {
        let error = validation_error(json!({
            "schemaVersion": "1.0.0",
            "entries": [{ "entry": "src/a.ts" }, { "entry": "src/b.ts" }]
        }))
        .await;

        assert!(predicate::str::contains(r#"["index","index"]"#).eval(&error.to_string()));
    }

    #[tokio::test]
    async fn version_error_wins_over_duplicate_names() {
        let error = validation_error(json!({
            "schemaVersion": "latest",
            "entries": [{ "entry": "src/a.ts" }, { "entry": "src/b.ts" }]
        }))
        .await;

        assert!(matches!(error, ValidationError::InvalidSchemaVersion { .. }));
    }

    #[tokio::test]
    async fn unknown_format_is_structural() {
        let error = validation_error(json!({
            "schemaVersion": "1.0.0",
            "entries": [{ "entry": "src/a.ts", "output": { "formats": ["system"] } }]
        }))
        .await;

        assert!(error.is_structural());
        assert!(predicate::str::contains("/entries/0/output/formats/0").eval(&error.to_string()));
    }

    #[tokio::test]
    async fn env_override_with_unknown_field_is_structural() {
        let error = validation_error(json!({
            "schemaVersion": "1.0.0",
            "entries": [{ "entry": "src/a.ts" }],
            "env": { "production": { "minify": true } }
        }))
        .await;

        assert!(error.is_structural());
    }
}

// =============================================================================
// Scenario 4: Dev server selection
// =============================================================================

mod s4_dev_server {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn site_marker_switches_to_dev_server() {
        let project = TestProject::new()
            .user_config(json!({ "bundlerType": "webpack" }))
            .site_marker();

        let resolved = try_resolve(&project, Command::Dev).await.unwrap();

        assert_eq!(resolved.bundler_type, BundlerType::WebDevServer);
        assert_eq!(
            serde_json::to_value(&resolved).unwrap()["bundlerType"],
            "webDevServer"
        );
    }

    #[tokio::test]
    async fn marker_also_applies_to_builds() {
        let project = TestProject::new().site_marker();

        let resolved = try_resolve(&project, Command::Build).await.unwrap();

        assert_eq!(resolved.bundler_type, BundlerType::WebDevServer);
    }
}
