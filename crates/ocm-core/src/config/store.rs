//! Read-modify-write access to opencode.json.

use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use super::document::ConfigDocument;
use super::schema::ServerEntry;
use crate::paths::OcmPaths;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("MCP server '{name}' not found in {}", path.display())]
    ServerNotFound { name: String, path: PathBuf },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write config file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Parse the config at `path`.
///
/// A missing, unreadable or malformed file yields the default document.
pub fn read_config(path: &Path) -> ConfigDocument {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "config not readable, using default");
            return ConfigDocument::new();
        }
    };
    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(map)) => ConfigDocument::from_map(map),
        Ok(_) => {
            tracing::debug!(path = %path.display(), "config root is not an object, using default");
            ConfigDocument::new()
        }
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "config is not valid JSON, using default");
            ConfigDocument::new()
        }
    }
}

/// Serialize `document` to `path` with `$schema` as the first key.
pub fn write_config(document: &ConfigDocument, path: &Path) -> Result<(), ConfigError> {
    let ordered = Value::Object(document.to_ordered_map());
    let content = serde_json::to_string_pretty(&ordered)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, content).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Set (`Some`) or delete (`None`) `mcp[name]` and rewrite the file.
pub fn upsert_server(
    name: &str,
    entry: Option<&ServerEntry>,
    path: &Path,
) -> Result<(), ConfigError> {
    ConfigStore::new(path.to_path_buf()).upsert_server(name, entry)
}

#[derive(Debug, Clone)]
pub struct ConfigStore {
    config_path: PathBuf,
}

impl ConfigStore {
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    pub fn from_paths(paths: &OcmPaths) -> Self {
        Self::new(paths.config_path().to_path_buf())
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn read(&self) -> ConfigDocument {
        read_config(&self.config_path)
    }

    pub fn write(&self, document: &ConfigDocument) -> Result<(), ConfigError> {
        write_config(document, &self.config_path)
    }

    /// Fresh read, in-memory edit, full rewrite.
    pub fn update<T>(
        &self,
        edit: impl FnOnce(&mut ConfigDocument) -> Result<T, ConfigError>,
    ) -> Result<T, ConfigError> {
        let mut document = self.read();
        let result = edit(&mut document)?;
        self.write(&document)?;
        Ok(result)
    }

    pub fn upsert_server(&self, name: &str, entry: Option<&ServerEntry>) -> Result<(), ConfigError> {
        self.update(|document| {
            match entry {
                Some(entry) => document.set_server(name, entry.to_value()),
                None => {
                    document.remove_server(name);
                }
            }
            Ok(())
        })
    }

    /// Delete `mcp[name]`, reporting whether it existed.
    pub fn remove_server(&self, name: &str) -> Result<bool, ConfigError> {
        self.update(|document| Ok(document.remove_server(name).is_some()))
    }

    /// Flip `enabled` on an existing entry, leaving its other fields alone.
    pub fn set_server_enabled(&self, name: &str, enabled: bool) -> Result<(), ConfigError> {
        let path = self.config_path.clone();
        self.update(|document| {
            let entry = document
                .server_mut(name)
                .and_then(Value::as_object_mut)
                .ok_or_else(|| ConfigError::ServerNotFound {
                    name: name.to_string(),
                    path,
                })?;
            entry.insert("enabled".to_string(), Value::Bool(enabled));
            Ok(())
        })
    }

    /// Whether an existing, parseable config declares at least one server.
    pub fn has_servers(&self) -> bool {
        if !self.config_path.exists() {
            return false;
        }
        self.read()
            .servers()
            .is_some_and(|servers| !servers.is_empty())
    }
}
