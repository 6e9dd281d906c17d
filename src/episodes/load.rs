use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::InputError;

/// Read and parse a JSON file of provider episodes or episode metadata
pub fn load_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, InputError> {
    let bytes = std::fs::read(path).map_err(|e| InputError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    serde_json::from_slice(&bytes).map_err(|e| InputError::ParseFailed {
        path: path.to_path_buf(),
        source: e,
    })
}
