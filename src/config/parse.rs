//! Completion spec document loading

use crate::config::schema::validate;
use crate::config::types::Config;
use crate::error::{CompspecError, Result};
use serde_yaml::Value;
use std::fs;
use std::path::Path;

/// Parse source text into a raw document
///
/// YAML is a superset of JSON, so JSON sources are accepted as well.
pub fn parse_document(text: &str) -> Result<Value> {
    Ok(serde_yaml::from_str(text)?)
}

/// Parse and validate configuration from a string
pub fn parse_config(text: &str) -> Result<Config> {
    let raw = parse_document(text)?;
    validate(&raw).map_err(CompspecError::Schema)
}

/// Parse and validate a configuration file
pub fn parse_config_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path).map_err(|source| CompspecError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config(&contents)
}
