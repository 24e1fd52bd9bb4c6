use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, SyncError};

/// Collection manifest emitted by the external component compiler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub components: Vec<ComponentDescriptor>,
    /// `None` only when the key is absent; an explicit `null` is kept.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub collections: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub compiler: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub global: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDescriptor {
    pub component_class: String,
    pub tag: String,
    pub component_path: String,
    #[serde(default)]
    pub styles: BTreeMap<String, StyleGroup>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleGroup {
    #[serde(default)]
    pub style_paths: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Web-component documentation index (`web-components.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebComponentIndex {
    #[serde(default)]
    pub tags: Vec<WebComponentTag>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebComponentTag {
    pub label: String,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl Manifest {
    pub fn from_json_str(input: &str) -> serde_json::Result<Self> {
        serde_json::from_str(input)
    }

    pub fn read(path: &Path) -> Result<Self> {
        read_json_document(path)
    }

    /// Components addressed by `name`, or every component when no name is given.
    /// An unknown name selects nothing.
    pub fn select(&self, name: Option<&str>) -> Vec<&ComponentDescriptor> {
        match name {
            Some(name) => self
                .components
                .iter()
                .filter(|component| component.component_class == name)
                .collect(),
            None => self.components.iter().collect(),
        }
    }

    pub fn slice_for(&self, component: &ComponentDescriptor) -> Manifest {
        Manifest {
            components: vec![component.clone()],
            collections: self.collections.clone(),
            compiler: self.compiler.clone(),
            global: self.global.clone(),
        }
    }
}

impl ComponentDescriptor {
    /// Style paths across every scope, first occurrence wins.
    pub fn style_paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = Vec::new();
        for group in self.styles.values() {
            for path in &group.style_paths {
                if !paths.contains(&path.as_str()) {
                    paths.push(path);
                }
            }
        }
        paths
    }
}

impl WebComponentIndex {
    pub fn from_json_str(input: &str) -> serde_json::Result<Self> {
        serde_json::from_str(input)
    }

    pub fn read(path: &Path) -> Result<Self> {
        read_json_document(path)
    }

    pub fn slice_for(&self, tag: &str) -> WebComponentIndex {
        WebComponentIndex {
            tags: self
                .tags
                .iter()
                .filter(|entry| entry.label == tag)
                .cloned()
                .collect(),
        }
    }
}

fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

fn read_json_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)
        .map_err(|err| SyncError::fs("failed reading build output", path, err))?;
    serde_json::from_str(&content).map_err(|err| SyncError::document(path, err))
}
