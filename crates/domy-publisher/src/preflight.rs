use std::path::PathBuf;

use domy_core::{ComponentDescriptor, Result, SyncError};
use domy_installer::ProjectLayout;

/// Compiled files a component ships, relative to the collection directory:
/// the script first, then every style.
pub fn compiled_files(component: &ComponentDescriptor) -> Vec<&str> {
    std::iter::once(component.component_path.as_str())
        .chain(component.style_paths())
        .collect()
}

/// Fails with every missing compiled file of the selection, before anything is
/// uploaded.
pub fn check_compiled_files(
    layout: &ProjectLayout,
    components: &[&ComponentDescriptor],
) -> Result<()> {
    let collection_dir = layout.collection_dir();
    let mut missing: Vec<PathBuf> = Vec::new();

    for component in components {
        for relative in compiled_files(component) {
            let path = collection_dir.join(relative.trim_start_matches('/'));
            if !path.is_file() && !missing.contains(&path) {
                log::debug!(
                    "{}: missing compiled file {}",
                    component.component_class,
                    path.display()
                );
                missing.push(path);
            }
        }
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(SyncError::CompiledFilesMissing { paths: missing })
    }
}
