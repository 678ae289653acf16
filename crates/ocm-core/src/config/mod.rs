//! opencode.json handling
//!
//! The file is re-read for every mutation and rewritten whole. There is no
//! locking: concurrent writers from separate processes may lose updates.

pub mod document;
pub mod schema;
pub mod store;

pub use document::ConfigDocument;
pub use schema::{LocalServer, OAuthSetting, RemoteServer, ServerEntry};
pub use store::{ConfigError, ConfigStore, read_config, upsert_server, write_config};
