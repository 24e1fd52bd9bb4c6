use std::fmt;

use domy_core::{Result, SyncError};

/// Slash-joined address of a registry resource.
///
/// ```text
/// etc/<catalog>/<name>/<version>            file listing of a published version
/// lib/<catalog>/<name>/<version>/<path>     upload target
/// <file>                                    raw download of a listed file
/// lib/<file>                                removal of a listed file
/// usr/<action>                              signup / login
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegistryPath {
    segments: Vec<String>,
}

impl RegistryPath {
    pub fn new<I, S>(segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized = Vec::new();
        for segment in segments {
            let trimmed = segment.as_ref().trim_matches('/');
            if trimmed.is_empty() {
                return Err(SyncError::Validation(
                    "registry path segments must not be empty".to_string(),
                ));
            }
            normalized.push(trimmed.to_string());
        }

        if normalized.is_empty() {
            return Err(SyncError::Validation(
                "unable to create a registry path from zero segments".to_string(),
            ));
        }

        Ok(Self {
            segments: normalized,
        })
    }

    pub fn listing(catalog: &str, name: &str, version: &str) -> Result<Self> {
        Self::new(["etc", catalog, name, version])
    }

    pub fn artifact(catalog: &str, name: &str, version: &str, relative_path: &str) -> Result<Self> {
        Self::new(["lib", catalog, name, version, relative_path])
    }

    pub fn blob(file: &str) -> Result<Self> {
        Self::new([file])
    }

    pub fn removal(file: &str) -> Result<Self> {
        Self::new(["lib", file])
    }

    pub fn auth(action: &str) -> Result<Self> {
        Self::new(["usr", action])
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// First segment, which selects the registry endpoint family.
    pub fn root(&self) -> &str {
        &self.segments[0]
    }

    /// Everything after the first segment, slash-joined.
    pub fn tail(&self) -> String {
        self.segments[1..].join("/")
    }
}

impl fmt::Display for RegistryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}
