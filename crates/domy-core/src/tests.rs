use super::*;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

const MANIFEST: &str = r#"{
  "components": [
    {
      "componentClass": "AppHome",
      "tag": "app-home",
      "componentPath": "components/app-home/app-home.js",
      "styles": {
        "$": { "stylePaths": ["components/app-home/app-home.css"] }
      },
      "listeners": []
    },
    {
      "componentClass": "AppRoot",
      "tag": "app-root",
      "componentPath": "components/app-root/app-root.js",
      "styles": {
        "$": { "stylePaths": ["components/app-root/app-root.css"] },
        "ios": { "stylePaths": ["components/app-root/app-root.ios.css", "components/app-root/app-root.css"] }
      }
    }
  ],
  "collections": [],
  "compiler": { "name": "@stencil/core", "version": "0.9.1" },
  "global": null
}"#;

#[test]
fn validate_component_name_treats_missing_name_as_not_provided() {
    assert_eq!(
        validate_component_name(None).expect("missing name is not an error"),
        NameCheck::NotProvided
    );
    assert_eq!(
        validate_component_name(Some("")).expect("empty name is not an error"),
        NameCheck::NotProvided
    );
}

#[test]
fn validate_component_name_rejects_single_character() {
    let err = validate_component_name(Some("a")).expect_err("must reject short name");
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.to_string().contains("at least 2"));
}

#[test]
fn validate_component_name_rejects_disallowed_characters() {
    for name in ["app home", "app/home", "app.home", "äpp"] {
        let err = validate_component_name(Some(name)).expect_err("must reject name");
        assert!(matches!(err, SyncError::InvalidComponentName(ref value) if value == name));
    }
}

#[test]
fn validate_component_name_accepts_alphanumeric_dash_underscore() {
    for name in ["Example", "app-home", "my_widget2", "ab"] {
        assert_eq!(
            validate_component_name(Some(name)).expect("must accept name"),
            NameCheck::Valid
        );
    }
}

#[test]
fn resolve_version_defaults_to_master() {
    assert_eq!(resolve_version(None), "master");
    assert_eq!(resolve_version(Some("")), "master");
    assert_eq!(resolve_version(Some("v2")), "v2");
    assert_eq!(resolve_version(Some("latest")), "latest");
}

#[test]
fn resolve_catalog_prefers_explicit_argument() {
    let config = UserConfig::for_user("someone", "token");
    assert_eq!(
        resolve_catalog(Some("shared"), Some(&config)).expect("must resolve"),
        "shared"
    );
    assert_eq!(
        resolve_catalog(Some("shared"), None).expect("explicit catalog needs no config"),
        "shared"
    );
}

#[test]
fn resolve_catalog_falls_back_to_user_dir() {
    let config = UserConfig {
        user: "someone".to_string(),
        dir: "team-space".to_string(),
        key: "token".to_string(),
    };
    assert_eq!(
        resolve_catalog(None, Some(&config)).expect("must resolve"),
        "team-space"
    );
}

#[test]
fn resolve_catalog_without_config_is_auth_error() {
    let err = resolve_catalog(None, None).expect_err("must require config");
    assert_eq!(err.kind(), ErrorKind::Auth);
}

#[test]
fn require_token_reads_key_from_config() {
    let config = UserConfig::for_user("someone", "secret");
    assert_eq!(require_token(Some(&config)).expect("must read token"), "secret");
    assert_eq!(
        require_token(None).expect_err("must require config").kind(),
        ErrorKind::Auth
    );
}

#[test]
fn manifest_select_by_component_class() {
    let manifest = Manifest::from_json_str(MANIFEST).expect("manifest should parse");
    let selected = manifest.select(Some("AppRoot"));
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].tag, "app-root");

    assert_eq!(manifest.select(None).len(), 2);
    assert!(manifest.select(Some("Missing")).is_empty());
}

#[test]
fn manifest_slice_keeps_shared_sections_and_one_component() {
    let manifest = Manifest::from_json_str(MANIFEST).expect("manifest should parse");
    let slice = manifest.slice_for(&manifest.components[0]);
    let value = serde_json::to_value(&slice).expect("slice should serialize");

    assert_eq!(value["components"].as_array().map(Vec::len), Some(1));
    assert_eq!(value["components"][0]["componentClass"], "AppHome");
    assert_eq!(value["components"][0]["listeners"], serde_json::json!([]));
    assert_eq!(value["compiler"]["name"], "@stencil/core");
    assert_eq!(value["collections"], serde_json::json!([]));
}

#[test]
fn manifest_slice_keeps_explicit_null_sections() {
    let manifest = Manifest::from_json_str(
        r#"{"components":[],"collections":[],"compiler":{},"global":null}"#,
    )
    .expect("manifest should parse");
    assert_eq!(manifest.global, Some(serde_json::Value::Null));

    let serialized = serde_json::to_string(&manifest).expect("manifest should serialize");
    assert_eq!(
        serialized,
        r#"{"components":[],"collections":[],"compiler":{},"global":null}"#
    );

    let absent = Manifest::from_json_str(r#"{"components":[]}"#).expect("manifest should parse");
    assert_eq!(absent.global, None);
    assert_eq!(
        serde_json::to_string(&absent).expect("manifest should serialize"),
        r#"{"components":[]}"#
    );
}

#[test]
fn style_paths_merge_scopes_without_duplicates() {
    let manifest = Manifest::from_json_str(MANIFEST).expect("manifest should parse");
    let root = &manifest.components[1];
    assert_eq!(
        root.style_paths(),
        vec![
            "components/app-root/app-root.css",
            "components/app-root/app-root.ios.css",
        ]
    );
}

#[test]
fn component_without_styles_has_no_style_paths() {
    let manifest = Manifest::from_json_str(
        r#"{"components":[{"componentClass":"Bare","tag":"bare-el","componentPath":"bare.js"}]}"#,
    )
    .expect("manifest should parse");
    assert!(manifest.components[0].style_paths().is_empty());
}

#[test]
fn web_component_index_slice_matches_label() {
    let index = WebComponentIndex::from_json_str(
        r#"{"tags":[{"label":"app-home","attributes":[]},{"label":"app-root"}]}"#,
    )
    .expect("index should parse");
    let slice = index.slice_for("app-home");
    assert_eq!(slice.tags.len(), 1);
    assert_eq!(slice.tags[0].label, "app-home");
    assert!(slice.tags[0].metadata.contains_key("attributes"));

    assert!(index.slice_for("nope").tags.is_empty());
}

#[test]
fn manifest_read_reports_invalid_json_as_document_error() {
    let root = test_root();
    fs::create_dir_all(&root).expect("must create root");
    let path = root.join("collection-manifest.json");
    fs::write(&path, "{ not json").expect("must write manifest");

    let err = Manifest::read(&path).expect_err("must reject invalid json");
    assert!(matches!(err, SyncError::InvalidDocument { .. }));
    assert_eq!(err.kind(), ErrorKind::FileSystem);

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn manifest_read_reports_missing_file() {
    let root = test_root();
    let err = Manifest::read(&root.join("missing.json")).expect_err("must fail");
    assert!(matches!(err, SyncError::FileSystem { .. }));
}

#[test]
fn user_config_store_round_trip() {
    let root = test_root();
    let store = UserConfigStore::new(&root);

    assert!(store.load().expect("missing config is not an error").is_none());

    let config = UserConfig::for_user("someone", "abc123");
    let path = store.save(&config).expect("must save config");
    assert_eq!(path, root.join("user.toml"));

    let loaded = store.load().expect("must load config");
    assert_eq!(loaded, Some(config));

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn user_config_store_rejects_incomplete_config() {
    let root = test_root();
    fs::create_dir_all(&root).expect("must create root");
    fs::write(
        root.join("user.toml"),
        "user = \"someone\"\ndir = \"someone\"\nkey = \"\"\n",
    )
    .expect("must write config");

    let err = UserConfigStore::new(&root)
        .load()
        .expect_err("must reject empty key");
    assert_eq!(err.kind(), ErrorKind::Auth);

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn compiled_files_missing_lists_every_path() {
    let err = SyncError::CompiledFilesMissing {
        paths: vec![PathBuf::from("dist/a.js"), PathBuf::from("dist/a.css")],
    };
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(
        err.to_string(),
        "compiled files missing: dist/a.js, dist/a.css"
    );
}

fn test_root() -> PathBuf {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time")
        .as_nanos();
    std::env::temp_dir().join(format!(
        "domy-core-tests-{}-{}-{}",
        std::process::id(),
        nanos,
        COUNTER.fetch_add(1, Ordering::Relaxed)
    ))
}
