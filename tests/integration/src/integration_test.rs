//! End-to-end resolution of a multi-package workspace
//!
//! Exercises the complete flow: file discovery -> validation -> injection
//! -> merge -> plugin adaptation, for several packages of one workspace.

use pretty_assertions::assert_eq;
use serde_json::json;
use wb_config::{
    BundlerKind, BundlerType, Command, DEFAULT_MODE, InlineConfig, ResolvedConfig, Resolver,
};
use wb_test_utils::{TestProject, workspace};

/// Workspace with a shared user config at each package and two packages.
fn setup_workspace() -> TestProject {
    let project = TestProject::new();
    workspace::npm_workspace(project.root(), "acme");

    for (name, version) in [("web", "1.4.0"), ("admin", "0.9.2")] {
        let dir = workspace::member_package(project.root(), name);
        let files = [
            (
                "package.json",
                json!({ "name": format!("@acme/{name}"), "version": version }),
            ),
            (
                "project-manifest.json",
                json!({
                    "schemaVersion": "1.0.0",
                    "entries": [
                        {
                            "entry": "src/main.ts",
                            "publicPath": "/${package.name}/${package.version}/",
                            "outDir": "${workspaceRoot}/dist/packages/"
                        },
                        {
                            "entry": "src/sdk.ts",
                            "output": {
                                "name": "sdk",
                                "formats": ["es", "umd"],
                                "meta": { "umdName": "AcmeSdk" }
                            }
                        }
                    ],
                    "env": { "production": { "publicPath": "https://cdn.acme.dev/" } }
                }),
            ),
            (
                "web-builder.config.json",
                json!({
                    "bundlerType": "rollup",
                    "plugins": [
                        { "name": "html", "webDevServer": { "inject": true } },
                        { "name": "legacy", "targets": ["defaults"] }
                    ]
                }),
            ),
        ];
        for (file, content) in files {
            std::fs::write(dir.join(file), content.to_string()).unwrap();
        }
    }

    project
}

async fn resolve_package(project: &TestProject, name: &str, mode: &str) -> ResolvedConfig {
    Resolver::new()
        .with_cwd(project.root())
        .resolve(
            InlineConfig::new()
                .with_root(format!("packages/{name}"))
                .with_mode(mode),
            Command::Build,
            DEFAULT_MODE,
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn test_resolve_member_package() {
    let project = setup_workspace();

    let resolved = resolve_package(&project, "web", DEFAULT_MODE).await;

    assert_eq!(resolved.bundler_type, BundlerType::Rollup);
    assert_eq!(resolved.entries.len(), 2);
    assert_eq!(
        resolved.entries[0].options.public_path.as_deref(),
        Some("/@acme/web/1.4.0/")
    );
    assert_eq!(
        resolved.entries[0].options.out_dir.as_deref(),
        Some(format!("{}/dist/packages/", project.normalized_root()).as_str())
    );
    assert_eq!(resolved.entries[1].umd_name(), Some("AcmeSdk"));
    assert_eq!(resolved.plugins.len(), 2);
}

#[tokio::test]
async fn test_production_mode_applies_env_overrides() {
    let project = setup_workspace();

    let resolved = resolve_package(&project, "admin", "production").await;

    for entry in &resolved.entries {
        assert_eq!(entry.options.public_path.as_deref(), Some("https://cdn.acme.dev/"));
    }
    assert_eq!(resolved.recommended_node_env(), Some("production"));
}

#[tokio::test]
async fn test_plugins_are_adapted_for_every_backend() {
    let project = setup_workspace();

    let resolved = resolve_package(&project, "web", DEFAULT_MODE).await;
    let instance = &resolved.plugin_instance;

    assert_eq!(instance.web_dev_server.len(), 1);
    assert_eq!(instance.web_dev_server[0].name.as_deref(), Some("html"));
    for backend in BundlerKind::ALL {
        let names: Vec<_> = instance
            .for_backend(backend)
            .iter()
            .filter_map(|plugin| plugin.name.as_deref())
            .collect();
        assert_eq!(names, ["html", "legacy"], "{backend}");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_resolutions_are_independent() {
    let project = setup_workspace();
    let root = project.root().to_path_buf();

    let handles: Vec<_> = [("web", DEFAULT_MODE), ("admin", "production")]
        .into_iter()
        .map(|(name, mode)| {
            let root = root.clone();
            tokio::spawn(async move {
                Resolver::new()
                    .with_cwd(root)
                    .resolve(
                        InlineConfig::new()
                            .with_root(format!("packages/{name}"))
                            .with_mode(mode),
                        Command::Build,
                        DEFAULT_MODE,
                    )
                    .await
            })
        })
        .collect();

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap().unwrap());
    }

    assert_eq!(
        results[0].entries[0].options.public_path.as_deref(),
        Some("/@acme/web/1.4.0/")
    );
    assert_eq!(
        results[1].entries[0].options.public_path.as_deref(),
        Some("https://cdn.acme.dev/")
    );
    assert_eq!(results[0].recommended_node_env(), None);
    assert_eq!(results[1].recommended_node_env(), Some("production"));
}
