use crate::error::{Result, SyncError};

/// Outcome of a successful component name check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameCheck {
    /// No name was given; callers operate on every component.
    NotProvided,
    Valid,
}

pub fn validate_component_name(name: Option<&str>) -> Result<NameCheck> {
    let Some(name) = name.filter(|name| !name.is_empty()) else {
        return Ok(NameCheck::NotProvided);
    };

    if is_valid_component_name(name) {
        Ok(NameCheck::Valid)
    } else {
        Err(SyncError::InvalidComponentName(name.to_string()))
    }
}

pub fn is_valid_component_name(name: &str) -> bool {
    name.len() >= 2 && name.chars().all(is_name_char)
}

fn is_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '-' || ch == '_'
}
