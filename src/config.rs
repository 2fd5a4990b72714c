//! Loader configuration.

use ::std::fs;
use ::std::path::{Path, PathBuf};

use serde::Deserialize;

use super::error::EndfError;

/// Loader configuration, read from a TOML file:
///
/// ```toml
/// [endf]
/// library_dir = "/data/endf"
///
/// [db]
/// db_host = "localhost"
/// db_name = "endf"
/// user = "loader"
/// password = "secret"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// `[endf]` options
    pub endf: EndfOptions,
    /// `[db]` options, handed to the store backend
    pub db: DbOptions,
}

/// `[endf]` options
#[derive(Debug, Clone, Deserialize)]
pub struct EndfOptions {
    /// Filesystem root walked for tape files and archives
    pub library_dir: PathBuf,
}

/// `[db]` options for the relational store backend
#[derive(Debug, Clone, Deserialize)]
pub struct DbOptions {
    /// Store host
    pub db_host: String,
    /// Database name
    pub db_name: String,
    /// Credentials: user
    pub user: String,
    /// Credentials: password
    pub password: String,
}

impl Config {
    /// Read configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config, EndfError> {
        let text = fs::read_to_string(path)?;
        toml::from_str(&text).map_err(|e| EndfError::Config(e.to_string()))
    }
}
