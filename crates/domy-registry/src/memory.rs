use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use domy_core::{Result, SyncError};

use crate::client::{parse_listing, require_body, RegistryClient};
use crate::path::RegistryPath;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub path: String,
}

/// In-process registry with the same addressing rules as the HTTP service.
///
/// Blobs are keyed by their path below `lib/`; listings under
/// `etc/<catalog>/<name>/<version>` return every key with that prefix.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    accepted_token: Option<String>,
    blobs: Mutex<BTreeMap<String, Vec<u8>>>,
    requests: Mutex<Vec<RecordedRequest>>,
    failing: Mutex<Vec<String>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutations carrying any other token are rejected as unauthorized.
    pub fn with_token(token: &str) -> Self {
        Self {
            accepted_token: Some(token.to_string()),
            ..Self::default()
        }
    }

    pub fn insert(&self, key: &str, content: impl Into<Vec<u8>>) {
        lock(&self.blobs).insert(key.trim_matches('/').to_string(), content.into());
    }

    pub fn blob(&self, key: &str) -> Option<Vec<u8>> {
        lock(&self.blobs).get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        lock(&self.blobs).keys().cloned().collect()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    /// Every later request whose path contains `fragment` fails with a
    /// server error.
    pub fn fail_requests_matching(&self, fragment: &str) {
        lock(&self.failing).push(fragment.to_string());
    }

    fn record(&self, method: &'static str, path: &RegistryPath) -> Result<()> {
        let rendered = path.to_string();
        lock(&self.requests).push(RecordedRequest {
            method,
            path: rendered.clone(),
        });

        if lock(&self.failing)
            .iter()
            .any(|fragment| rendered.contains(fragment.as_str()))
        {
            return Err(SyncError::transport(
                method,
                rendered,
                "500 Internal Server Error",
            ));
        }
        Ok(())
    }

    fn authorize(&self, method: &'static str, path: &RegistryPath, token: &str) -> Result<()> {
        match &self.accepted_token {
            Some(accepted) if accepted != token => Err(SyncError::transport(
                method,
                path.to_string(),
                "401 Unauthorized",
            )),
            _ => Ok(()),
        }
    }
}

impl RegistryClient for MemoryRegistry {
    fn list(&self, path: &RegistryPath) -> Result<Vec<String>> {
        self.record("GET", path)?;
        if path.root() != "etc" {
            return parse_listing(path, &[]);
        }

        let prefix = format!("{}/", path.tail());
        let files: Vec<String> = lock(&self.blobs)
            .keys()
            .filter(|key| key.starts_with(&prefix))
            .cloned()
            .collect();
        let body = serde_json::to_vec(&files)
            .map_err(|err| SyncError::transport("GET", path.to_string(), err.to_string()))?;
        parse_listing(path, &body)
    }

    fn get(&self, path: &RegistryPath) -> Result<Vec<u8>> {
        self.record("GET", path)?;
        let body = self.blob(&path.to_string()).unwrap_or_default();
        require_body(path, body)
    }

    fn put(&self, path: &RegistryPath, token: &str, content: &[u8]) -> Result<String> {
        self.record("PUT", path)?;
        self.authorize("PUT", path, token)?;
        if path.root() != "lib" {
            return Err(SyncError::transport("PUT", path.to_string(), "405 Method Not Allowed"));
        }

        lock(&self.blobs).insert(path.tail(), content.to_vec());
        Ok("true".to_string())
    }

    fn delete(&self, path: &RegistryPath, token: &str) -> Result<String> {
        self.record("DELETE", path)?;
        self.authorize("DELETE", path, token)?;
        if path.root() != "lib" {
            return Err(SyncError::transport(
                "DELETE",
                path.to_string(),
                "405 Method Not Allowed",
            ));
        }

        match lock(&self.blobs).remove(&path.tail()) {
            Some(_) => Ok("true".to_string()),
            None => Err(SyncError::transport("DELETE", path.to_string(), "404 Not Found")),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
