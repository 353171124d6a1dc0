pub mod catalog;
pub mod clients;
pub mod sqlite;

pub use catalog::{load_catalog, Catalog, CatalogStore};
pub use clients::ClientDirectory;
pub use sqlite::SqliteStorage;

use crate::model::DataFileError;
use serde::de::DeserializeOwned;
use std::fs;

/// Reads one flat JSON array file into records.
pub fn read_json_file<T: DeserializeOwned>(path: &str) -> Result<Vec<T>, DataFileError> {
    let content = fs::read_to_string(path).map_err(|source| DataFileError::Io {
        path: path.to_string(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| DataFileError::Parse {
        path: path.to_string(),
        source,
    })
}
