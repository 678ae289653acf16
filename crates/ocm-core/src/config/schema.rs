//! MCP server entry schema for opencode.json
//!
//! OpenCode format:
//! - local: { "type": "local", "command": [...], "environment": {...} }
//! - remote: { "type": "remote", "url": "...", "headers": {...}, "oauth": false }

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::MIN_TIMEOUT_MS;
use crate::validation::ValidationError;

/// One MCP server definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerEntry {
    Local(LocalServer),
    Remote(RemoteServer),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalServer {
    /// argv, executable first
    pub command: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteServer {
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth: Option<OAuthSetting>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

/// `oauth: false` disables discovery; an object carries client credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OAuthSetting {
    Flag(bool),
    Credentials(Map<String, Value>),
}

impl ServerEntry {
    pub fn local(command: Vec<String>) -> Self {
        ServerEntry::Local(LocalServer {
            command,
            environment: None,
            enabled: None,
            timeout: None,
        })
    }

    pub fn remote(url: impl Into<String>) -> Self {
        ServerEntry::Remote(RemoteServer {
            url: url.into(),
            headers: None,
            oauth: None,
            enabled: None,
            timeout: None,
        })
    }

    /// Parse an entry from raw JSON.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    pub fn to_value(&self) -> Value {
        // Every field is a plain string/map/number, serialization cannot fail.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// The `type` tag as written to disk.
    pub fn kind(&self) -> &'static str {
        match self {
            ServerEntry::Local(_) => "local",
            ServerEntry::Remote(_) => "remote",
        }
    }

    /// A missing `enabled` counts as enabled.
    pub fn is_enabled(&self) -> bool {
        let enabled = match self {
            ServerEntry::Local(server) => server.enabled,
            ServerEntry::Remote(server) => server.enabled,
        };
        enabled.unwrap_or(true)
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        match self {
            ServerEntry::Local(server) => server.enabled = Some(enabled),
            ServerEntry::Remote(server) => server.enabled = Some(enabled),
        }
    }

    pub fn timeout(&self) -> Option<u64> {
        match self {
            ServerEntry::Local(server) => server.timeout,
            ServerEntry::Remote(server) => server.timeout,
        }
    }

    pub fn validate(&self, name: &str) -> Result<(), ValidationError> {
        match self {
            ServerEntry::Local(server) => {
                let has_program = server
                    .command
                    .first()
                    .is_some_and(|program| !program.trim().is_empty());
                if !has_program {
                    return Err(ValidationError::EmptyCommand(name.to_string()));
                }
            }
            ServerEntry::Remote(server) => {
                if let Err(e) = url::Url::parse(&server.url) {
                    return Err(ValidationError::InvalidUrl {
                        name: name.to_string(),
                        url: server.url.clone(),
                        reason: e.to_string(),
                    });
                }
                if matches!(server.oauth, Some(OAuthSetting::Flag(true))) {
                    return Err(ValidationError::InvalidOAuth(name.to_string()));
                }
            }
        }

        if let Some(timeout) = self.timeout() {
            if timeout < MIN_TIMEOUT_MS {
                return Err(ValidationError::TimeoutTooSmall {
                    name: name.to_string(),
                    min: MIN_TIMEOUT_MS,
                    actual: timeout,
                });
            }
        }

        Ok(())
    }
}

/// Enabled state of a raw entry as stored on disk.
///
/// Only an explicit `"enabled": false` disables a server.
pub fn is_enabled_value(entry: &Value) -> bool {
    entry.get("enabled").and_then(Value::as_bool) != Some(false)
}

/// `type` tag of a raw entry, if present.
pub fn kind_of_value(entry: &Value) -> Option<&str> {
    entry.get("type").and_then(Value::as_str)
}
