use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use domy_core::{Result, SyncError};
use serde_json::{Map, Value};

use crate::ProjectLayout;

/// Key of the pin map inside the project manifest.
pub const PINS_KEY: &str = "webcomponents";

pub fn read_pins(layout: &ProjectLayout) -> Result<BTreeMap<String, String>> {
    let path = layout.project_manifest_path();
    let Some(document) = read_project_manifest(&path)? else {
        return Ok(BTreeMap::new());
    };

    match document.get(PINS_KEY) {
        None | Some(Value::Null) => Ok(BTreeMap::new()),
        Some(pins) => serde_json::from_value(pins.clone()).map_err(|err| {
            SyncError::document(&path, format!("'{PINS_KEY}' must map names to versions: {err}"))
        }),
    }
}

pub fn read_pin(layout: &ProjectLayout, name: &str) -> Result<Option<String>> {
    Ok(read_pins(layout)?.remove(name))
}

/// Records `name -> version`, keeping every other key of the project manifest
/// in place.
pub fn write_pin(layout: &ProjectLayout, name: &str, version: &str) -> Result<PathBuf> {
    let path = layout.project_manifest_path();
    let mut document = read_project_manifest(&path)?.unwrap_or_default();

    let pins = document
        .entry(PINS_KEY)
        .or_insert_with(|| Value::Object(Map::new()));
    if pins.is_null() {
        *pins = Value::Object(Map::new());
    }
    let Some(pins) = pins.as_object_mut() else {
        return Err(SyncError::document(
            &path,
            format!("'{PINS_KEY}' is not an object"),
        ));
    };
    pins.insert(name.to_string(), Value::String(version.to_string()));

    write_project_manifest(&path, &document)?;
    log::debug!("pinned {name} to {version}");
    Ok(path)
}

pub fn remove_pin(layout: &ProjectLayout, name: &str) -> Result<bool> {
    let path = layout.project_manifest_path();
    let Some(mut document) = read_project_manifest(&path)? else {
        return Ok(false);
    };

    let removed = document
        .get_mut(PINS_KEY)
        .and_then(Value::as_object_mut)
        .and_then(|pins| pins.shift_remove(name))
        .is_some();
    if removed {
        write_project_manifest(&path, &document)?;
    }
    Ok(removed)
}

fn read_project_manifest(path: &Path) -> Result<Option<Map<String, Value>>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(SyncError::fs("failed reading project manifest", path, err)),
    };

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|err| SyncError::document(path, err))
}

fn write_project_manifest(path: &Path, document: &Map<String, Value>) -> Result<()> {
    let mut content =
        serde_json::to_string_pretty(document).map_err(|err| SyncError::document(path, err))?;
    content.push('\n');
    fs::write(path, content).map_err(|err| SyncError::fs("failed writing project manifest", path, err))
}
