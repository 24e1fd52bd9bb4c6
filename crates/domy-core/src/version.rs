pub const DEFAULT_VERSION: &str = "master";

/// Effective version for an operation: the literal given, or `master`.
pub fn resolve_version(version: Option<&str>) -> String {
    match version {
        Some(version) if !version.is_empty() => version.to_string(),
        _ => DEFAULT_VERSION.to_string(),
    }
}
