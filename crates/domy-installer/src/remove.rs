use domy_core::{
    require_token, resolve_catalog, resolve_version, validate_component_name, NameCheck, Result,
    SyncError, UserConfig,
};
use domy_registry::{RegistryClient, RegistryPath};

use crate::fs_utils::remove_dir_tree;
use crate::pins::remove_pin;
use crate::ProjectLayout;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoveRequest {
    pub catalog: Option<String>,
    pub component: String,
    pub version: Option<String>,
    /// Also drop the local install and the pin.
    pub purge: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoveReport {
    pub catalog: String,
    pub version: String,
    pub deleted: Vec<String>,
    pub purged_cache: bool,
    pub removed_pin: bool,
}

/// Deletes every published file of a component version from the registry.
///
/// Deletions stop at the first failure; files removed before it stay removed.
pub fn remove<R>(
    registry: &R,
    layout: Option<&ProjectLayout>,
    config: Option<&UserConfig>,
    request: &RemoveRequest,
) -> Result<RemoveReport>
where
    R: RegistryClient + ?Sized,
{
    if validate_component_name(Some(&request.component))? == NameCheck::NotProvided {
        return Err(SyncError::Validation(
            "a component name is required to remove".to_string(),
        ));
    }
    if request.purge && layout.is_none() {
        return Err(SyncError::Validation(
            "purging needs a project root".to_string(),
        ));
    }

    let token = require_token(config)?;
    let catalog = resolve_catalog(request.catalog.as_deref(), config)?;
    let version = resolve_version(request.version.as_deref());

    let listing = RegistryPath::listing(&catalog, &request.component, &version)?;
    let files = registry.list(&listing)?;

    let mut report = RemoveReport {
        catalog,
        version,
        ..RemoveReport::default()
    };
    for file in files {
        registry.delete(&RegistryPath::removal(&file)?, token)?;
        log::debug!("deleted {file}");
        report.deleted.push(file);
    }
    log::info!(
        "removed {}@{} from '{}' ({} files)",
        request.component,
        report.version,
        report.catalog,
        report.deleted.len()
    );

    if let Some(layout) = layout.filter(|_| request.purge) {
        let component_dir =
            layout.component_cache_dir(request.catalog.as_deref(), &request.component);
        report.purged_cache = remove_dir_tree(&component_dir)?;
        report.removed_pin = remove_pin(layout, &request.component)?;
    }

    Ok(report)
}
