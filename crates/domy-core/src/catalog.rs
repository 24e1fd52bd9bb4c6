use crate::config::UserConfig;
use crate::error::{Result, SyncError};

/// Target catalog for an operation.
///
/// An explicit catalog wins; otherwise the user's own catalog (`dir`) from the
/// local config is used.
pub fn resolve_catalog(catalog: Option<&str>, config: Option<&UserConfig>) -> Result<String> {
    if let Some(catalog) = catalog.filter(|catalog| !catalog.is_empty()) {
        return Ok(catalog.to_string());
    }

    config.map(|config| config.dir.clone()).ok_or_else(|| {
        SyncError::Auth(
            "no catalog given and no local user config to default from; pass --catalog or run `domy login`"
                .to_string(),
        )
    })
}
