//! In-memory view of opencode.json.

use serde_json::{Map, Value};

use crate::constants::{CONFIG_SCHEMA, MCP_KEY, SCHEMA_KEY};

/// The whole config object, passthrough keys included.
///
/// Keys keep their file order; [`ConfigDocument::to_ordered_map`] moves
/// `$schema` to the front without touching the relative order of the rest.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDocument {
    root: Map<String, Value>,
}

impl Default for ConfigDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigDocument {
    /// A document with only the schema and an empty server map.
    pub fn new() -> Self {
        let mut root = Map::new();
        root.insert(SCHEMA_KEY.to_string(), Value::String(CONFIG_SCHEMA.into()));
        root.insert(MCP_KEY.to_string(), Value::Object(Map::new()));
        Self { root }
    }

    /// Wrap an existing object as-is.
    pub fn from_map(root: Map<String, Value>) -> Self {
        Self { root }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.root
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.root
    }

    /// The `$schema` value, falling back to the fixed schema URL.
    pub fn schema(&self) -> &str {
        self.root
            .get(SCHEMA_KEY)
            .and_then(Value::as_str)
            .unwrap_or(CONFIG_SCHEMA)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    /// Set a top-level key. Existing keys keep their position.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.root.insert(key.into(), value);
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.root.keys().map(String::as_str)
    }

    /// The `mcp` map, if present and an object.
    pub fn servers(&self) -> Option<&Map<String, Value>> {
        self.root.get(MCP_KEY).and_then(Value::as_object)
    }

    pub fn server(&self, name: &str) -> Option<&Value> {
        self.servers().and_then(|servers| servers.get(name))
    }

    pub fn server_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.root
            .get_mut(MCP_KEY)
            .and_then(Value::as_object_mut)
            .and_then(|servers| servers.get_mut(name))
    }

    pub fn server_names(&self) -> Vec<String> {
        self.servers()
            .map(|servers| servers.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Mutable `mcp` map, created (or replaced, if not an object) on demand.
    pub fn servers_mut(&mut self) -> &mut Map<String, Value> {
        let slot = self
            .root
            .entry(MCP_KEY.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        match slot {
            Value::Object(map) => map,
            _ => unreachable!("mcp slot was just normalized to an object"),
        }
    }

    /// Insert or replace a server entry.
    pub fn set_server(&mut self, name: &str, entry: Value) {
        self.servers_mut().insert(name.to_string(), entry);
    }

    /// Remove a server entry. Removing an absent name is a no-op.
    pub fn remove_server(&mut self, name: &str) -> Option<Value> {
        self.root
            .get_mut(MCP_KEY)
            .and_then(Value::as_object_mut)
            .and_then(|servers| servers.shift_remove(name))
    }

    /// Copy of the document with `$schema` as the first key.
    pub fn to_ordered_map(&self) -> Map<String, Value> {
        let schema = match self.root.get(SCHEMA_KEY) {
            Some(Value::String(s)) if !s.is_empty() => Value::String(s.clone()),
            _ => Value::String(CONFIG_SCHEMA.to_string()),
        };

        let mut ordered = Map::with_capacity(self.root.len() + 1);
        ordered.insert(SCHEMA_KEY.to_string(), schema);
        for (key, value) in &self.root {
            if key != SCHEMA_KEY {
                ordered.insert(key.clone(), value.clone());
            }
        }
        ordered
    }
}
