use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::thread::{self, ScopedJoinHandle};

use domy_core::{resolve_catalog, resolve_version, validate_component_name, Result, UserConfig};
use domy_registry::{RegistryClient, RegistryPath};

use crate::fs_utils::{remove_dir_tree, write_file};
use crate::layout::local_relative_path;
use crate::pins::{read_pins, write_pin};
use crate::ProjectLayout;

/// Upper bound on concurrent file downloads per component.
pub const MAX_PARALLEL_DOWNLOADS: usize = 8;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScatterRequest {
    pub catalog: Option<String>,
    pub component: Option<String>,
    pub version: Option<String>,
}

/// Result of installing one pinned component.
#[derive(Debug)]
pub struct ScatterOutcome {
    pub component: String,
    pub version: String,
    /// Local files written for the component.
    pub result: Result<Vec<PathBuf>>,
}

#[derive(Debug, Default)]
pub struct ScatterReport {
    pub catalog: Option<String>,
    pub outcomes: Vec<ScatterOutcome>,
}

impl ScatterReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.result.is_ok())
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// One `true` per entry, or the first failure in pin order.
    pub fn into_result(self) -> Result<Vec<bool>> {
        self.outcomes
            .into_iter()
            .map(|outcome| outcome.result.map(|_| true))
            .collect()
    }
}

/// Installs pinned components into the project cache.
pub fn scatter<R>(
    registry: &R,
    layout: &ProjectLayout,
    config: Option<&UserConfig>,
    request: &ScatterRequest,
) -> Result<Vec<bool>>
where
    R: RegistryClient + ?Sized,
{
    scatter_with_report(registry, layout, config, request)?.into_result()
}

/// Installs every target concurrently and reports each entry separately.
///
/// Without a component the whole pin map is reinstalled and pins stay as
/// they are. With a component only that entry is installed, and its pin is
/// updated once the install succeeded.
pub fn scatter_with_report<R>(
    registry: &R,
    layout: &ProjectLayout,
    config: Option<&UserConfig>,
    request: &ScatterRequest,
) -> Result<ScatterReport>
where
    R: RegistryClient + ?Sized,
{
    validate_component_name(request.component.as_deref())?;
    let targets = install_targets(layout, request)?;
    if targets.is_empty() {
        log::info!("no pinned components to install");
        return Ok(ScatterReport {
            catalog: request.catalog.clone(),
            outcomes: Vec::new(),
        });
    }

    let catalog = resolve_catalog(request.catalog.as_deref(), config)?;
    let cache_root = layout.catalog_cache_dir(request.catalog.as_deref());
    log::info!(
        "installing {} component(s) from catalog '{catalog}' into {}",
        targets.len(),
        cache_root.display()
    );

    let catalog = catalog.as_str();
    let cache_root = cache_root.as_path();
    let outcomes = thread::scope(|scope| {
        let workers: Vec<_> = targets
            .iter()
            .map(|(component, version)| {
                let worker = scope.spawn(move || {
                    install_component(registry, catalog, cache_root, component, version)
                });
                (component, version, worker)
            })
            .collect();

        workers
            .into_iter()
            .map(|(component, version, worker)| ScatterOutcome {
                component: component.clone(),
                version: version.clone(),
                result: join_worker(worker),
            })
            .collect::<Vec<_>>()
    });

    for outcome in &outcomes {
        match &outcome.result {
            Ok(files) => log::info!(
                "installed {}@{} ({} files)",
                outcome.component,
                outcome.version,
                files.len()
            ),
            Err(err) => log::warn!(
                "failed installing {}@{}: {err}",
                outcome.component,
                outcome.version
            ),
        }
    }

    if let Some(component) = request.component.as_deref() {
        let installed = outcomes
            .iter()
            .find(|outcome| outcome.component == component && outcome.result.is_ok());
        if let Some(outcome) = installed {
            write_pin(layout, component, &outcome.version)?;
        }
    }

    Ok(ScatterReport {
        catalog: request.catalog.clone(),
        outcomes,
    })
}

fn install_targets(
    layout: &ProjectLayout,
    request: &ScatterRequest,
) -> Result<BTreeMap<String, String>> {
    if let Some(component) = request.component.as_deref().filter(|name| !name.is_empty()) {
        let mut targets = BTreeMap::new();
        targets.insert(
            component.to_string(),
            resolve_version(request.version.as_deref()),
        );
        return Ok(targets);
    }

    Ok(read_pins(layout)?
        .into_iter()
        .map(|(component, version)| {
            let version = resolve_version(Some(&version));
            (component, version)
        })
        .collect())
}

fn install_component<R>(
    registry: &R,
    catalog: &str,
    cache_root: &Path,
    component: &str,
    version: &str,
) -> Result<Vec<PathBuf>>
where
    R: RegistryClient + ?Sized,
{
    let component_dir = cache_root.join(component);
    if remove_dir_tree(&component_dir)? {
        log::debug!("cleared {}", component_dir.display());
    }

    let listing = RegistryPath::listing(catalog, component, version)?;
    let files = registry.list(&listing)?;
    log::debug!("{component}@{version}: {} remote file(s)", files.len());

    let mut written = Vec::with_capacity(files.len());
    for batch in files.chunks(MAX_PARALLEL_DOWNLOADS) {
        let fetched = thread::scope(|scope| {
            let workers: Vec<_> = batch
                .iter()
                .map(|file| scope.spawn(move || fetch_file(registry, cache_root, component, file)))
                .collect();
            workers.into_iter().map(join_worker).collect::<Vec<_>>()
        });
        for path in fetched {
            written.push(path?);
        }
    }
    Ok(written)
}

fn fetch_file<R>(registry: &R, cache_root: &Path, component: &str, file: &str) -> Result<PathBuf>
where
    R: RegistryClient + ?Sized,
{
    let relative = local_relative_path(file, component)?;
    let content = registry.get(&RegistryPath::blob(file)?)?;
    let path = write_file(cache_root, &relative, &content)?;
    log::debug!("wrote {}", path.display());
    Ok(path)
}

fn join_worker<T>(worker: ScopedJoinHandle<'_, Result<T>>) -> Result<T> {
    match worker.join() {
        Ok(result) => result,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}
