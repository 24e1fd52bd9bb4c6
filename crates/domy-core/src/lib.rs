mod catalog;
mod config;
mod error;
mod manifest;
mod naming;
mod version;

pub use catalog::resolve_catalog;
pub use config::{default_config_root, require_token, UserConfig, UserConfigStore};
pub use error::{ErrorKind, Result, SyncError};
pub use manifest::{ComponentDescriptor, Manifest, StyleGroup, WebComponentIndex, WebComponentTag};
pub use naming::{is_valid_component_name, validate_component_name, NameCheck};
pub use version::{resolve_version, DEFAULT_VERSION};

#[cfg(test)]
mod tests;
