use std::time::Duration;

use domy_core::{Result, SyncError};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, Url};

use crate::client::{parse_listing, require_body, RegistryClient};
use crate::path::RegistryPath;

pub const TOKEN_HEADER: &str = "X-Domy-Token";
pub const DEFAULT_REGISTRY_URL: &str = "http://localhost:8080";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct HttpRegistry {
    base_url: Url,
    client: Client,
}

impl HttpRegistry {
    pub fn new(base_url: &str) -> Result<Self> {
        let parsed = Url::parse(base_url).map_err(|err| {
            SyncError::Validation(format!("invalid registry url '{base_url}': {err}"))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.cannot_be_a_base() {
            return Err(SyncError::Validation(format!(
                "unsupported registry url scheme '{}': {base_url}",
                parsed.scheme()
            )));
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("domy/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| SyncError::transport("INIT", "", err.to_string()))?;

        Ok(Self {
            base_url: parsed,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Appends every `/`-separated part of `path` as its own percent-encoded segment.
    pub fn url_for(&self, path: &RegistryPath) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                SyncError::Validation(format!("registry url cannot take a path: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(path.segments().iter().flat_map(|segment| segment.split('/')));
        Ok(url)
    }

    /// Unauthenticated JSON POST, used by the auth endpoints.
    pub fn post_json(&self, path: &RegistryPath, body: Vec<u8>) -> Result<String> {
        let response = self.send(
            Method::POST,
            path,
            None,
            Some((body, "application/json")),
        )?;
        Ok(String::from_utf8_lossy(&response).into_owned())
    }

    fn send(
        &self,
        method: Method,
        path: &RegistryPath,
        token: Option<&str>,
        body: Option<(Vec<u8>, &str)>,
    ) -> Result<Vec<u8>> {
        let url = self.url_for(path)?;
        log::debug!("{method} {url}");

        let mut request = self.client.request(method.clone(), url);
        if let Some(token) = token {
            request = request.header(TOKEN_HEADER, token);
        }
        if let Some((content, content_type)) = body {
            request = request.header(CONTENT_TYPE, content_type).body(content);
        }

        let response = request
            .send()
            .map_err(|err| SyncError::transport(method.as_str(), path.to_string(), err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::transport(
                method.as_str(),
                path.to_string(),
                status.to_string(),
            ));
        }

        let bytes = response
            .bytes()
            .map_err(|err| SyncError::transport(method.as_str(), path.to_string(), err.to_string()))?;
        Ok(bytes.to_vec())
    }
}

impl RegistryClient for HttpRegistry {
    fn list(&self, path: &RegistryPath) -> Result<Vec<String>> {
        let body = self.send(Method::GET, path, None, None)?;
        parse_listing(path, &body)
    }

    fn get(&self, path: &RegistryPath) -> Result<Vec<u8>> {
        let body = self.send(Method::GET, path, None, None)?;
        require_body(path, body)
    }

    fn put(&self, path: &RegistryPath, token: &str, content: &[u8]) -> Result<String> {
        let body = self.send(
            Method::PUT,
            path,
            Some(token),
            Some((content.to_vec(), "application/octet-stream")),
        )?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    fn delete(&self, path: &RegistryPath, token: &str) -> Result<String> {
        let body = self.send(Method::DELETE, path, Some(token), None)?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}
