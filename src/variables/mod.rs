//! The variable catalog: a YAML description of the state object conditions read.
//!
//! Each mapping key becomes a node. A value written as a sequence of at most
//! two items is a leaf `[value, description]`; nested mappings become children;
//! any other scalar is a leaf value.

use crate::ast::{Value, format_number};
use crate::config::TemplateConfig;
use crate::error::CatalogError;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value as Yaml};

/// One entry of the variable tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableNode {
    pub key: String,
    /// Dot-separated path from the root, e.g. `player.stats.hp`.
    pub path: String,
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<VariableNode>,
}

impl VariableNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariableCatalog {
    pub roots: Vec<VariableNode>,
}

impl VariableCatalog {
    pub fn from_yaml(source: &str) -> Result<Self, CatalogError> {
        let document: Yaml = serde_yaml::from_str(source)?;
        match document {
            Yaml::Null => Ok(Self::default()),
            Yaml::Mapping(mapping) => Ok(Self {
                roots: parse_mapping(&mapping, ""),
            }),
            _ => Err(CatalogError::NotAMapping),
        }
    }

    /// Leaf paths in document order.
    pub fn flat_variables(&self) -> Vec<&str> {
        let mut out = Vec::new();
        collect_leaves(&self.roots, &mut out);
        out.into_iter().map(|n| n.path.as_str()).collect()
    }

    pub fn contains_path(&self, path: &str) -> bool {
        let mut leaves = Vec::new();
        collect_leaves(&self.roots, &mut leaves);
        leaves.iter().any(|n| n.path == path)
    }

    pub fn find(&self, path: &str) -> Option<&VariableNode> {
        let mut nodes = &self.roots;
        let mut found = None;
        for key in path.split('.') {
            let node = nodes.iter().find(|n| n.key == key)?;
            nodes = &node.children;
            found = Some(node);
        }
        found
    }

    /// Sample values for every leaf that declares one, keyed by qualified path.
    pub fn sample_values(&self, config: &TemplateConfig) -> AHashMap<String, Value> {
        let mut leaves = Vec::new();
        collect_leaves(&self.roots, &mut leaves);
        leaves
            .into_iter()
            .filter(|n| !n.value.is_undefined())
            .map(|n| (config.qualified_path(&n.path), n.value.clone()))
            .collect()
    }

    /// Writes the tree back out, with described leaves as `[value, description]`.
    pub fn to_yaml(&self) -> Result<String, CatalogError> {
        Ok(serde_yaml::to_string(&Yaml::Mapping(to_mapping(&self.roots)))?)
    }
}

fn parse_mapping(mapping: &Mapping, parent: &str) -> Vec<VariableNode> {
    mapping
        .iter()
        .map(|(key, value)| {
            let key = scalar_text(key);
            let path = if parent.is_empty() {
                key.clone()
            } else {
                format!("{}.{}", parent, key)
            };

            let mut node = VariableNode {
                key,
                path,
                value: Value::Undefined,
                description: None,
                children: Vec::new(),
            };
            match value {
                Yaml::Sequence(items) if items.len() <= 2 => {
                    node.value = items.first().map(leaf_value).unwrap_or(Value::Undefined);
                    node.description = items
                        .get(1)
                        .map(scalar_text)
                        .filter(|d| !d.is_empty());
                }
                Yaml::Mapping(children) => node.children = parse_mapping(children, &node.path),
                other => node.value = leaf_value(other),
            }
            node
        })
        .collect()
}

fn leaf_value(yaml: &Yaml) -> Value {
    match yaml {
        Yaml::Null => Value::Undefined,
        Yaml::Bool(b) => Value::Bool(*b),
        Yaml::Number(n) => n.as_f64().map(Value::Number).unwrap_or(Value::Undefined),
        Yaml::String(s) => Value::from_input(s),
        Yaml::Tagged(tagged) => leaf_value(&tagged.value),
        Yaml::Sequence(_) | Yaml::Mapping(_) => Value::Text(scalar_text(yaml)),
    }
}

fn scalar_text(yaml: &Yaml) -> String {
    match yaml {
        Yaml::Null => String::new(),
        Yaml::Bool(b) => b.to_string(),
        Yaml::Number(n) => n.as_f64().map(format_number).unwrap_or_else(|| n.to_string()),
        Yaml::String(s) => s.clone(),
        Yaml::Tagged(tagged) => scalar_text(&tagged.value),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

fn collect_leaves<'a>(nodes: &'a [VariableNode], out: &mut Vec<&'a VariableNode>) {
    for node in nodes {
        if node.is_leaf() {
            out.push(node);
        } else {
            collect_leaves(&node.children, out);
        }
    }
}

fn to_mapping(nodes: &[VariableNode]) -> Mapping {
    nodes
        .iter()
        .map(|node| {
            let value = if !node.is_leaf() {
                Yaml::Mapping(to_mapping(&node.children))
            } else {
                let value = to_yaml_value(&node.value);
                match &node.description {
                    Some(description) => {
                        Yaml::Sequence(vec![value, Yaml::String(description.clone())])
                    }
                    None => value,
                }
            };
            (Yaml::String(node.key.clone()), value)
        })
        .collect()
}

fn to_yaml_value(value: &Value) -> Yaml {
    match value {
        Value::Number(n) if n.fract() == 0.0 && n.abs() < 9.0e15 => Yaml::Number((*n as i64).into()),
        Value::Number(n) => Yaml::Number((*n).into()),
        Value::Text(s) => Yaml::String(s.clone()),
        Value::Bool(b) => Yaml::Bool(*b),
        Value::Undefined => Yaml::Null,
    }
}
