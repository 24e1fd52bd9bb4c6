mod auth;
mod client;
mod http;
mod memory;
mod path;

pub use auth::{login, looks_like_mail, signup, validate_credentials};
pub use client::RegistryClient;
pub use http::{HttpRegistry, DEFAULT_REGISTRY_URL, TOKEN_HEADER};
pub use memory::{MemoryRegistry, RecordedRequest};
pub use path::RegistryPath;
