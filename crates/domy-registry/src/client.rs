use domy_core::{Result, SyncError};

use crate::path::RegistryPath;

/// Keyed blob store holding published component artifacts.
///
/// Implementations are shared across install worker threads.
pub trait RegistryClient: Send + Sync {
    /// Relative file paths of a published version. An empty or malformed
    /// listing is a not-found failure.
    fn list(&self, path: &RegistryPath) -> Result<Vec<String>>;

    /// Raw file content. An empty body is a not-found failure.
    fn get(&self, path: &RegistryPath) -> Result<Vec<u8>>;

    fn put(&self, path: &RegistryPath, token: &str, content: &[u8]) -> Result<String>;

    fn delete(&self, path: &RegistryPath, token: &str) -> Result<String>;
}

pub(crate) fn parse_listing(path: &RegistryPath, body: &[u8]) -> Result<Vec<String>> {
    if body.is_empty() {
        return Err(listing_not_found(path));
    }

    let files: Vec<String> = serde_json::from_slice(body).map_err(|err| {
        SyncError::NotFound(format!("can't list component contents at /{path}: {err}"))
    })?;
    if files.is_empty() {
        return Err(listing_not_found(path));
    }
    Ok(files)
}

pub(crate) fn require_body(path: &RegistryPath, body: Vec<u8>) -> Result<Vec<u8>> {
    if body.is_empty() {
        return Err(SyncError::NotFound(format!(
            "registry returned no content for /{path}"
        )));
    }
    Ok(body)
}

fn listing_not_found(path: &RegistryPath) -> SyncError {
    SyncError::NotFound(format!("can't list component contents at /{path}"))
}
