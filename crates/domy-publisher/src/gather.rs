use std::fs;

use domy_core::{
    require_token, resolve_catalog, resolve_version, validate_component_name, ComponentDescriptor,
    Manifest, Result, SyncError, UserConfig, WebComponentIndex,
};
use domy_installer::{
    write_pin, ProjectLayout, COLLECTION_DIR, COLLECTION_MANIFEST, WEB_COMPONENTS_INDEX,
};
use domy_registry::{RegistryClient, RegistryPath};

use crate::preflight::{check_compiled_files, compiled_files};

/// Stored in place of empty files; the registry treats empty bodies as missing.
const EMPTY_ARTIFACT: &[u8] = b"\n";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatherRequest {
    /// Component class to publish; every component when absent.
    pub name: Option<String>,
    pub version: Option<String>,
    pub catalog: Option<String>,
}

/// One artifact upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishUnit {
    pub catalog: String,
    pub component: String,
    pub version: String,
    /// Path of the artifact relative to the project root.
    pub relative_path: String,
    pub content: Vec<u8>,
}

impl PublishUnit {
    pub fn registry_path(&self) -> Result<RegistryPath> {
        RegistryPath::artifact(
            &self.catalog,
            &self.component,
            &self.version,
            &self.relative_path,
        )
    }
}

/// Everything a publish would upload, in upload order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatherPlan {
    /// Resolved catalog; absent when nothing was selected.
    pub catalog: Option<String>,
    pub version: String,
    pub units: Vec<PublishUnit>,
}

impl GatherPlan {
    pub fn components(&self) -> Vec<&str> {
        let mut components: Vec<&str> = Vec::new();
        for unit in &self.units {
            if !components.contains(&unit.component.as_str()) {
                components.push(&unit.component);
            }
        }
        components
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatherReport {
    pub catalog: Option<String>,
    pub version: String,
    pub components: Vec<String>,
    /// Registry paths written, in upload order.
    pub uploaded: Vec<String>,
    pub pinned: bool,
}

/// Reads the build output and prepares every upload without touching the
/// registry.
pub fn plan(
    layout: &ProjectLayout,
    config: Option<&UserConfig>,
    request: &GatherRequest,
) -> Result<GatherPlan> {
    validate_component_name(request.name.as_deref())?;

    let manifest = Manifest::read(&layout.collection_manifest_path())?;
    let index = WebComponentIndex::read(&layout.web_components_index_path())?;
    let name = request.name.as_deref().filter(|name| !name.is_empty());
    let selection = manifest.select(name);

    check_compiled_files(layout, &selection)?;
    let version = resolve_version(request.version.as_deref());

    if selection.is_empty() {
        return Ok(GatherPlan {
            catalog: None,
            version,
            units: Vec::new(),
        });
    }

    let catalog = resolve_catalog(request.catalog.as_deref(), config)?;
    let mut units = Vec::new();
    for component in selection {
        units.extend(component_units(
            layout, &manifest, &index, component, &catalog, &version,
        )?);
    }

    Ok(GatherPlan {
        catalog: Some(catalog),
        version,
        units,
    })
}

/// Publishes the selected components of the project build output.
///
/// Uploads run one after another and stop at the first failure; artifacts
/// stored before it stay in the registry. Selecting no component succeeds
/// without uploading.
pub fn gather<R>(
    registry: &R,
    layout: &ProjectLayout,
    config: Option<&UserConfig>,
    request: &GatherRequest,
) -> Result<GatherReport>
where
    R: RegistryClient + ?Sized,
{
    let prepared = plan(layout, config, request)?;
    let mut report = GatherReport {
        catalog: prepared.catalog.clone(),
        version: prepared.version.clone(),
        components: prepared.components().into_iter().map(str::to_string).collect(),
        ..GatherReport::default()
    };
    if prepared.units.is_empty() {
        log::info!("nothing selected for publishing");
        return Ok(report);
    }

    let token = require_token(config)?;
    for unit in &prepared.units {
        let path = unit.registry_path()?;
        registry.put(&path, token, &unit.content)?;
        log::debug!("uploaded {path} ({} bytes)", unit.content.len());
        report.uploaded.push(path.to_string());
    }
    for component in &report.components {
        log::info!(
            "published {component}@{} to '{}'",
            report.version,
            report.catalog.as_deref().unwrap_or_default()
        );
    }

    if let (Some(name), Some(version)) = (
        request.name.as_deref().filter(|name| !name.is_empty()),
        request.version.as_deref().filter(|version| !version.is_empty()),
    ) {
        write_pin(layout, name, version)?;
        report.pinned = true;
    }

    Ok(report)
}

fn component_units(
    layout: &ProjectLayout,
    manifest: &Manifest,
    index: &WebComponentIndex,
    component: &ComponentDescriptor,
    catalog: &str,
    version: &str,
) -> Result<Vec<PublishUnit>> {
    let unit = |relative_path: String, content: Vec<u8>| PublishUnit {
        catalog: catalog.to_string(),
        component: component.component_class.clone(),
        version: version.to_string(),
        relative_path,
        content: if content.is_empty() {
            EMPTY_ARTIFACT.to_vec()
        } else {
            content
        },
    };

    let manifest_slice = serde_json::to_vec(&manifest.slice_for(component))
        .map_err(|err| SyncError::document(layout.collection_manifest_path(), err))?;
    let index_slice = serde_json::to_vec(&index.slice_for(&component.tag))
        .map_err(|err| SyncError::document(layout.web_components_index_path(), err))?;

    let mut units = vec![
        unit(COLLECTION_MANIFEST.to_string(), manifest_slice),
        unit(WEB_COMPONENTS_INDEX.to_string(), index_slice),
    ];
    for relative in compiled_files(component) {
        let relative = relative.trim_start_matches('/');
        let path = layout.collection_dir().join(relative);
        let content =
            fs::read(&path).map_err(|err| SyncError::fs("failed reading compiled file", &path, err))?;
        units.push(unit(format!("{COLLECTION_DIR}/{relative}"), content));
    }
    Ok(units)
}
