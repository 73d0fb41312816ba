//! Reading RON data files from disk.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use super::error::DataLoadError;

/// Read and parse a single RON file.
pub fn read_ron_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let display = path.display().to_string();

    if !path.exists() {
        return Err(DataLoadError::FileNotFound(display));
    }

    let contents = fs::read_to_string(path).map_err(|e| DataLoadError::ReadError {
        path: display.clone(),
        details: e.to_string(),
    })?;

    parse_ron(&display, &contents)
}

/// Parse RON text; `source` names the text in error messages.
pub fn parse_ron<T: DeserializeOwned>(source: &str, contents: &str) -> Result<T, DataLoadError> {
    ron::from_str(contents).map_err(|e| DataLoadError::ParseError {
        path: source.to_string(),
        details: e.to_string(),
    })
}
