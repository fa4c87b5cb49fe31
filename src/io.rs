use std::fs::File;
use std::io::{BufReader, ErrorKind, Write as _};
use std::path::Path;

use anyhow::Context as _;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::foundation::error::{GridError, GridResult};
use crate::model::FeatureCollection;

/// Parse a JSON document from disk. A missing file is reported as [`GridError::SourceNotFound`].
pub fn read_json<T: DeserializeOwned>(path: &Path) -> GridResult<T> {
    let f = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => GridError::SourceNotFound {
            path: path.to_path_buf(),
        },
        _ => GridError::io(path, e),
    })?;
    serde_json::from_reader(BufReader::new(f)).map_err(|e| GridError::parse(path, e.to_string()))
}

pub fn read_collection(path: &Path) -> GridResult<FeatureCollection> {
    read_json(path)
}

/// Write `value` as compact UTF-8 JSON, creating parent directories. Returns bytes written.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> GridResult<u64> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| GridError::io(parent, e))?;
    }

    let bytes = serde_json::to_vec(value)
        .with_context(|| format!("serialize JSON for '{}'", path.display()))?;

    let mut file = File::create(path).map_err(|e| GridError::io(path, e))?;
    file.write_all(&bytes).map_err(|e| GridError::io(path, e))?;
    file.sync_all().map_err(|e| GridError::io(path, e))?;

    Ok(bytes.len() as u64)
}

pub fn file_size(path: &Path) -> GridResult<u64> {
    std::fs::metadata(path)
        .map(|m| m.len())
        .map_err(|e| GridError::io(path, e))
}
