use domy_core::{Result, SyncError, UserConfig};
use serde::Serialize;

use crate::http::HttpRegistry;
use crate::path::RegistryPath;

const MIN_CREDENTIAL_LEN: usize = 6;

#[derive(Debug, Serialize)]
struct AuthRequest<'a> {
    user: &'a str,
    pass: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    mail: Option<&'a str>,
}

pub fn signup(registry: &HttpRegistry, user: &str, pass: &str, mail: &str) -> Result<UserConfig> {
    validate_credentials(user, pass)?;
    if !looks_like_mail(mail) {
        return Err(SyncError::Validation(format!(
            "expecting a valid email address, got '{mail}'"
        )));
    }

    authenticate(registry, "signup", user, pass, Some(mail))
}

pub fn login(registry: &HttpRegistry, user: &str, pass: &str) -> Result<UserConfig> {
    validate_credentials(user, pass)?;
    authenticate(registry, "login", user, pass, None)
}

pub fn validate_credentials(user: &str, pass: &str) -> Result<()> {
    if user.is_empty()
        || !user
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
    {
        return Err(SyncError::Validation(format!(
            "expecting an alphanumeric username, got '{user}'"
        )));
    }
    if user.len() < MIN_CREDENTIAL_LEN || pass.len() < MIN_CREDENTIAL_LEN {
        return Err(SyncError::Validation(format!(
            "expecting username and password to be at least {MIN_CREDENTIAL_LEN} characters long"
        )));
    }
    Ok(())
}

pub fn looks_like_mail(mail: &str) -> bool {
    if mail.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = mail.split_once('@') else {
        return false;
    };
    let Some(dot) = domain.rfind('.') else {
        return false;
    };
    !local.is_empty() && dot > 0 && dot + 1 < domain.len()
}

fn authenticate(
    registry: &HttpRegistry,
    action: &str,
    user: &str,
    pass: &str,
    mail: Option<&str>,
) -> Result<UserConfig> {
    let path = RegistryPath::auth(action)?;
    let body = serde_json::to_vec(&AuthRequest { user, pass, mail })
        .map_err(|err| SyncError::Validation(format!("failed encoding {action} request: {err}")))?;

    let token = registry.post_json(&path, body)?;
    let token = token.trim().trim_matches('"');
    if token.is_empty() {
        return Err(SyncError::Auth(format!("registry issued no token on {action}")));
    }

    log::info!("authenticated '{user}' via {action}");
    Ok(UserConfig::for_user(user, token))
}
