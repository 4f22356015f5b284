//! Text reads used by the config loaders

use std::io::ErrorKind;

use crate::{Error, NormalizedPath, Result};

/// Read text content, treating a missing file as `None`.
///
/// Any other I/O failure (permissions, a directory in place of the file)
/// is still an error.
pub async fn read_text_if_exists(path: &NormalizedPath) -> Result<Option<String>> {
    let native_path = path.to_native();
    match tokio::fs::read_to_string(&native_path).await {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io(&native_path, e)),
    }
}
