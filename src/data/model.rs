use crate::ast::Value;
use crate::backend::VariableSource;
use crate::config::TemplateConfig;
use crate::error::DataError;
use crate::variables::VariableCatalog;
use ahash::AHashMap;
use serde_json::Value as Json;
use std::fs;
use std::path::Path;

/// Sampled state values keyed by qualified path (`stat_data.player.hp`).
///
/// JSON input may be flat (`{"stat_data.hp": 30}`) or nested
/// (`{"stat_data": {"hp": 30}}`); nested objects are flattened with dots.
/// Strings go through [`Value::from_input`], so `"30"` samples the number 30.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleData {
    values: AHashMap<String, Value>,
}

impl SampleData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load sample data from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| DataError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, DataError> {
        let document: Json = serde_json::from_str(json)?;
        let mut values = AHashMap::new();
        flatten(&document, String::new(), &mut values);
        Ok(Self { values })
    }

    /// Seeds samples from the values declared in a variable catalog.
    pub fn from_catalog(catalog: &VariableCatalog, config: &TemplateConfig) -> Self {
        Self {
            values: catalog.sample_values(config),
        }
    }

    pub fn insert(&mut self, path: impl Into<String>, value: Value) -> &mut Self {
        self.values.insert(path.into(), value);
        self
    }

    /// Sets a value from raw input text, as typed into a sample field.
    pub fn set_input(&mut self, path: impl Into<String>, raw: &str) -> &mut Self {
        self.insert(path, Value::from_input(raw))
    }

    pub fn values(&self) -> &AHashMap<String, Value> {
        &self.values
    }
}

impl VariableSource for SampleData {
    fn get(&self, path: &str) -> Option<&Value> {
        VariableSource::get(&self.values, path)
    }
}

fn flatten(json: &Json, prefix: String, out: &mut AHashMap<String, Value>) {
    let value = match json {
        Json::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten(child, path, out);
            }
            return;
        }
        Json::Null => return,
        Json::Number(n) => match n.as_f64() {
            Some(n) => Value::Number(n),
            None => return,
        },
        Json::String(s) => Value::from_input(s),
        Json::Bool(b) => Value::Bool(*b),
        Json::Array(_) => Value::Text(json.to_string()),
    };
    if !prefix.is_empty() {
        out.insert(prefix, value);
    }
}
