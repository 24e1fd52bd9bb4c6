use std::path::{Path, PathBuf};

use domy_core::{Result, SyncError};

/// Files whose presence marks a directory as the project root.
pub const ROOT_MARKERS: [&str; 4] = [
    "package.json",
    "stencil.config.js",
    "stencil.config.ts",
    "ionic.config.json",
];

pub const PROJECT_MANIFEST: &str = "package.json";
pub const COLLECTION_DIR: &str = "dist/collection";
pub const COLLECTION_MANIFEST: &str = "dist/collection/collection-manifest.json";
pub const WEB_COMPONENTS_INDEX: &str = "dist/web-components.json";

const CACHE_DIR: &str = "node_modules/@domy";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Nearest ancestor of `start` (itself included) holding a root marker.
    pub fn discover(start: &Path) -> Result<Self> {
        for dir in start.ancestors() {
            if ROOT_MARKERS.iter().any(|marker| dir.join(marker).is_file()) {
                log::debug!("project root: {}", dir.display());
                return Ok(Self::new(dir));
            }
        }

        Err(SyncError::NotFound(format!(
            "couldn't find a project root (none of {}) above {}",
            ROOT_MARKERS.join(", "),
            start.display()
        )))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn project_manifest_path(&self) -> PathBuf {
        self.root.join(PROJECT_MANIFEST)
    }

    pub fn collection_dir(&self) -> PathBuf {
        self.root.join(COLLECTION_DIR)
    }

    pub fn collection_manifest_path(&self) -> PathBuf {
        self.root.join(COLLECTION_MANIFEST)
    }

    pub fn web_components_index_path(&self) -> PathBuf {
        self.root.join(WEB_COMPONENTS_INDEX)
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.root.join(CACHE_DIR)
    }

    /// Install root for a catalog. Without an explicit catalog files go to the
    /// unnamed default root.
    pub fn catalog_cache_dir(&self, catalog: Option<&str>) -> PathBuf {
        match catalog.filter(|catalog| !catalog.is_empty()) {
            Some(catalog) => self.cache_dir().join(catalog),
            None => self.cache_dir(),
        }
    }

    pub fn component_cache_dir(&self, catalog: Option<&str>, component: &str) -> PathBuf {
        self.catalog_cache_dir(catalog).join(component)
    }
}

/// Local path of a downloaded file, relative to the catalog cache root.
///
/// Registry-side prefixes are dropped: the result starts at the first
/// directory segment equal to `component`. A path without such a segment is
/// placed under `component/` whole, so every file of a component stays inside
/// its own subtree.
pub fn local_relative_path(remote: &str, component: &str) -> Result<PathBuf> {
    let segments: Vec<&str> = remote
        .split(['/', '\\'])
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect();

    if segments.is_empty() {
        return Err(SyncError::Validation(format!(
            "registry listed an empty file path for '{component}'"
        )));
    }
    if segments.iter().any(|segment| *segment == "..") {
        return Err(SyncError::Validation(format!(
            "registry path escapes the component directory: {remote}"
        )));
    }

    let directories = &segments[..segments.len() - 1];
    let relative: PathBuf = match directories.iter().position(|segment| *segment == component) {
        Some(start) => segments[start..].iter().collect(),
        None => std::iter::once(component)
            .chain(segments.iter().copied())
            .collect(),
    };
    Ok(relative)
}
