use super::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use domy_core::{ErrorKind, Manifest, SyncError, UserConfig, WebComponentIndex};
use domy_installer::{read_pin, ProjectLayout};
use domy_registry::MemoryRegistry;

const MANIFEST: &str = r#"{
  "components": [
    {
      "componentClass": "app-home",
      "tag": "app-home",
      "componentPath": "components/app-home/app-home.js",
      "styles": {
        "$": { "stylePaths": ["components/app-home/app-home.css"] }
      }
    },
    {
      "componentClass": "app-root",
      "tag": "app-root",
      "componentPath": "components/app-root/app-root.js",
      "styles": {
        "$": { "stylePaths": ["components/app-root/app-root.css"] },
        "md": { "stylePaths": ["components/app-root/app-root.md.css"] }
      }
    }
  ],
  "collections": [],
  "compiler": { "name": "@stencil/core", "version": "0.9.1" },
  "global": null
}"#;

const INDEX: &str = r#"{
  "tags": [
    { "label": "app-home", "description": "Landing page" },
    { "label": "app-root", "description": "Shell" }
  ]
}"#;

#[test]
fn gather_uploads_every_artifact_of_named_component() {
    let root = compiled_project();
    let layout = ProjectLayout::new(&root);
    let registry = MemoryRegistry::with_token("secret");

    let report = gather(
        &registry,
        &layout,
        Some(&config()),
        &request(Some("app-home"), Some("latest"), Some("catalog")),
    )
    .expect("must publish");

    assert_eq!(report.catalog.as_deref(), Some("catalog"));
    assert_eq!(report.components, ["app-home"]);
    assert_eq!(
        report.uploaded,
        [
            "lib/catalog/app-home/latest/dist/collection/collection-manifest.json",
            "lib/catalog/app-home/latest/dist/web-components.json",
            "lib/catalog/app-home/latest/dist/collection/components/app-home/app-home.js",
            "lib/catalog/app-home/latest/dist/collection/components/app-home/app-home.css",
        ]
    );
    let puts = registry
        .requests()
        .into_iter()
        .filter(|request| request.method == "PUT")
        .count();
    assert_eq!(puts, 4);
    assert_eq!(
        registry
            .blob("catalog/app-home/latest/dist/collection/components/app-home/app-home.js")
            .expect("script must be stored"),
        b"export class AppHome {}"
    );

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn gather_uploads_manifest_and_index_slices() {
    let root = compiled_project();
    let layout = ProjectLayout::new(&root);
    let registry = MemoryRegistry::new();

    gather(
        &registry,
        &layout,
        Some(&config()),
        &request(Some("app-root"), None, None),
    )
    .expect("must publish");

    let manifest_blob = registry
        .blob("acme/app-root/master/dist/collection/collection-manifest.json")
        .expect("manifest slice must be stored");
    let manifest = Manifest::from_json_str(
        std::str::from_utf8(&manifest_blob).expect("manifest slice is utf-8"),
    )
    .expect("manifest slice must parse");
    assert_eq!(manifest.components.len(), 1);
    assert_eq!(manifest.components[0].component_class, "app-root");
    assert_eq!(
        manifest.compiler,
        Some(serde_json::json!({ "name": "@stencil/core", "version": "0.9.1" }))
    );

    let index_blob = registry
        .blob("acme/app-root/master/dist/web-components.json")
        .expect("index slice must be stored");
    let index = WebComponentIndex::from_json_str(
        std::str::from_utf8(&index_blob).expect("index slice is utf-8"),
    )
    .expect("index slice must parse");
    assert_eq!(index.tags.len(), 1);
    assert_eq!(index.tags[0].label, "app-root");
    assert!(registry
        .blob("acme/app-root/master/dist/collection/components/app-root/app-root.md.css")
        .is_some());

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn gather_without_name_publishes_every_component() {
    let root = compiled_project();
    let layout = ProjectLayout::new(&root);
    let registry = MemoryRegistry::new();

    let report = gather(&registry, &layout, Some(&config()), &GatherRequest::default())
        .expect("must publish");

    assert_eq!(report.components, ["app-home", "app-root"]);
    assert_eq!(report.version, "master");
    assert_eq!(report.uploaded.len(), 9);
    assert!(!report.pinned);

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn gather_aborts_before_upload_when_any_compiled_file_is_missing() {
    let root = compiled_project();
    fs::remove_file(root.join("dist/collection/components/app-root/app-root.md.css"))
        .expect("must remove style");
    let layout = ProjectLayout::new(&root);
    let registry = MemoryRegistry::new();

    let err = gather(&registry, &layout, Some(&config()), &GatherRequest::default())
        .expect_err("must abort");

    match &err {
        SyncError::CompiledFilesMissing { paths } => {
            assert_eq!(paths.len(), 1);
            assert!(paths[0].ends_with("components/app-root/app-root.md.css"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(registry.requests().is_empty());

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn gather_unknown_name_is_a_no_op() {
    let root = compiled_project();
    let layout = ProjectLayout::new(&root);
    let registry = MemoryRegistry::new();

    let report = gather(
        &registry,
        &layout,
        None,
        &request(Some("app-missing"), Some("1.0.0"), None),
    )
    .expect("unknown name publishes nothing");

    assert!(report.components.is_empty());
    assert!(report.uploaded.is_empty());
    assert!(!report.pinned);
    assert!(registry.requests().is_empty());

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn gather_rejects_invalid_name_before_reading_build_output() {
    let root = test_root();
    let layout = ProjectLayout::new(&root);
    let registry = MemoryRegistry::new();

    let err = gather(&registry, &layout, Some(&config()), &request(Some("x"), None, None))
        .expect_err("must reject");
    assert!(matches!(err, SyncError::InvalidComponentName(_)));
}

#[test]
fn gather_requires_token_for_uploads() {
    let root = compiled_project();
    let layout = ProjectLayout::new(&root);
    let registry = MemoryRegistry::new();

    let err = gather(
        &registry,
        &layout,
        None,
        &request(Some("app-home"), None, Some("catalog")),
    )
    .expect_err("must require login");
    assert_eq!(err.kind(), ErrorKind::Auth);
    assert!(registry.requests().is_empty());

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn gather_uploads_newline_for_empty_file() {
    let root = compiled_project();
    fs::write(root.join("dist/collection/components/app-home/app-home.css"), "")
        .expect("must empty style");
    let layout = ProjectLayout::new(&root);
    let registry = MemoryRegistry::new();

    gather(
        &registry,
        &layout,
        Some(&config()),
        &request(Some("app-home"), None, None),
    )
    .expect("must publish");

    assert_eq!(
        registry
            .blob("acme/app-home/master/dist/collection/components/app-home/app-home.css")
            .expect("style must be stored"),
        b"\n"
    );

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn gather_stops_at_first_failed_upload() {
    let root = compiled_project();
    let layout = ProjectLayout::new(&root);
    let registry = MemoryRegistry::new();
    registry.fail_requests_matching("dist/web-components.json");

    let err = gather(
        &registry,
        &layout,
        Some(&config()),
        &request(Some("app-home"), None, None),
    )
    .expect_err("must fail");

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(registry.requests().len(), 2);
    assert_eq!(
        registry.keys(),
        ["acme/app-home/master/dist/collection/collection-manifest.json"]
    );

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn gather_with_name_and_version_records_pin() {
    let root = compiled_project();
    let layout = ProjectLayout::new(&root);
    let registry = MemoryRegistry::new();

    let report = gather(
        &registry,
        &layout,
        Some(&config()),
        &request(Some("app-home"), Some("2.1.0"), None),
    )
    .expect("must publish");

    assert!(report.pinned);
    assert_eq!(
        read_pin(&layout, "app-home").expect("must read pin").as_deref(),
        Some("2.1.0")
    );

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn plan_lists_units_in_upload_order_without_registry() {
    let root = compiled_project();
    let layout = ProjectLayout::new(&root);

    let plan = plan(&layout, None, &request(Some("app-root"), None, Some("shared")))
        .expect("must plan");

    assert_eq!(plan.catalog.as_deref(), Some("shared"));
    let paths: Vec<&str> = plan
        .units
        .iter()
        .map(|unit| unit.relative_path.as_str())
        .collect();
    assert_eq!(
        paths,
        [
            "dist/collection/collection-manifest.json",
            "dist/web-components.json",
            "dist/collection/components/app-root/app-root.js",
            "dist/collection/components/app-root/app-root.css",
            "dist/collection/components/app-root/app-root.md.css",
        ]
    );
    assert_eq!(plan.components(), ["app-root"]);

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn check_compiled_files_reports_every_missing_path() {
    let root = test_root();
    fs::create_dir_all(&root).expect("must create root");
    let layout = ProjectLayout::new(&root);
    let manifest = Manifest::from_json_str(MANIFEST).expect("must parse manifest");

    let err = check_compiled_files(&layout, &manifest.select(None)).expect_err("must fail");
    let SyncError::CompiledFilesMissing { paths } = err else {
        panic!("unexpected error kind");
    };
    assert_eq!(paths.len(), 5);
    assert!(paths.contains(&layout.collection_dir().join("components/app-home/app-home.js")));

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn command_builder_defaults_to_stencil_build() {
    let builder = CommandBuilder::default();
    assert_eq!(builder.program(), "npx");
    assert_eq!(builder.command_line(), "npx stencil build --docs");
}

#[cfg(unix)]
#[test]
fn command_builder_runs_in_project_root() {
    let root = test_root();
    fs::create_dir_all(&root).expect("must create root");

    CommandBuilder::new("sh", ["-c", "touch built.marker"])
        .build(&root)
        .expect("build must succeed");
    assert!(root.join("built.marker").is_file());

    let _ = fs::remove_dir_all(&root);
}

#[cfg(unix)]
#[test]
fn command_builder_reports_failed_status() {
    let root = test_root();
    fs::create_dir_all(&root).expect("must create root");

    let err = CommandBuilder::new("sh", ["-c", "echo broken >&2; exit 3"])
        .build(&root)
        .expect_err("build must fail");
    let message = err.to_string();
    assert!(message.contains("build 'sh -c"));
    assert!(message.contains("stderr='broken'"));

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn command_builder_reports_missing_program() {
    let root = test_root();
    fs::create_dir_all(&root).expect("must create root");

    let err = CommandBuilder::new("domy-test-missing-builder", Vec::<String>::new())
        .build(&root)
        .expect_err("must fail to start");
    assert!(err.to_string().contains("command failed to start"));

    let _ = fs::remove_dir_all(&root);
}

fn request(name: Option<&str>, version: Option<&str>, catalog: Option<&str>) -> GatherRequest {
    GatherRequest {
        name: name.map(str::to_string),
        version: version.map(str::to_string),
        catalog: catalog.map(str::to_string),
    }
}

fn config() -> UserConfig {
    UserConfig {
        user: "acme".to_string(),
        dir: "acme".to_string(),
        key: "secret".to_string(),
    }
}

fn compiled_project() -> PathBuf {
    let root = test_root();
    write(&root, "package.json", r#"{"name":"demo"}"#);
    write(&root, "dist/collection/collection-manifest.json", MANIFEST);
    write(&root, "dist/web-components.json", INDEX);
    write(
        &root,
        "dist/collection/components/app-home/app-home.js",
        "export class AppHome {}",
    );
    write(
        &root,
        "dist/collection/components/app-home/app-home.css",
        "app-home { display: block; }",
    );
    write(
        &root,
        "dist/collection/components/app-root/app-root.js",
        "export class AppRoot {}",
    );
    write(
        &root,
        "dist/collection/components/app-root/app-root.css",
        "app-root { display: block; }",
    );
    write(
        &root,
        "dist/collection/components/app-root/app-root.md.css",
        "app-root { color: red; }",
    );
    root
}

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("must create parent");
    }
    fs::write(path, content).expect("must write fixture");
}

fn test_root() -> PathBuf {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time")
        .as_nanos();
    std::env::temp_dir().join(format!(
        "domy-publisher-tests-{}-{}-{}",
        std::process::id(),
        nanos,
        COUNTER.fetch_add(1, Ordering::Relaxed)
    ))
}
