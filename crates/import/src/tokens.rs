//! Account-token configuration: a nested mapping from account segments to
//! lists of phrases and `/pattern/flags` rules.
//!
//! ```toml
//! [Expenses]
//! Food = ["coffee", "/^STARBUCKS/i"]
//!
//! [Income.Salary]
//! ```
//!
//! An empty table (TOML) or `null` (JSON) is an absent leaf.

use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TokensError {
    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Token file root must be a table")]
    RootNotTable,
    #[error("Invalid token entry at '{path}': expected a list of strings, found {found}")]
    InvalidLeaf { path: String, found: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenNode {
    Leaf(Vec<String>),
    Absent,
    /// Children in file order.
    Branch(Vec<(String, TokenNode)>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenFormat {
    Toml,
    Json,
}

impl TokenFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => TokenFormat::Json,
            _ => TokenFormat::Toml,
        }
    }
}

impl TokenNode {
    pub fn parse(text: &str, format: TokenFormat) -> Result<TokenNode, TokensError> {
        match format {
            TokenFormat::Toml => {
                let table: toml::Table = toml::from_str(text)?;
                from_toml_table(table, "")
            }
            TokenFormat::Json => match serde_json::from_str::<serde_json::Value>(text)? {
                serde_json::Value::Object(map) => from_json_object(map, ""),
                _ => Err(TokensError::RootNotTable),
            },
        }
    }
}

fn child_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}:{key}")
    }
}

fn from_toml_table(table: toml::Table, path: &str) -> Result<TokenNode, TokensError> {
    if table.is_empty() {
        return Ok(TokenNode::Absent);
    }
    let mut children = Vec::with_capacity(table.len());
    for (key, value) in table {
        let here = child_path(path, &key);
        let node = match value {
            toml::Value::Table(t) => from_toml_table(t, &here)?,
            toml::Value::Array(items) => TokenNode::Leaf(
                items
                    .into_iter()
                    .map(|item| match item {
                        toml::Value::String(s) => Ok(s),
                        other => Err(TokensError::InvalidLeaf {
                            path: here.clone(),
                            found: other.type_str().to_string(),
                        }),
                    })
                    .collect::<Result<_, _>>()?,
            ),
            toml::Value::String(s) => TokenNode::Leaf(vec![s]),
            other => {
                return Err(TokensError::InvalidLeaf {
                    path: here,
                    found: other.type_str().to_string(),
                })
            }
        };
        children.push((key, node));
    }
    Ok(TokenNode::Branch(children))
}

fn json_type(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

fn from_json_object(
    map: serde_json::Map<String, serde_json::Value>,
    path: &str,
) -> Result<TokenNode, TokensError> {
    if map.is_empty() {
        return Ok(TokenNode::Absent);
    }
    let mut children = Vec::with_capacity(map.len());
    for (key, value) in map {
        let here = child_path(path, &key);
        let node = match value {
            serde_json::Value::Null => TokenNode::Absent,
            serde_json::Value::Object(m) => from_json_object(m, &here)?,
            serde_json::Value::Array(items) => TokenNode::Leaf(
                items
                    .into_iter()
                    .map(|item| match item {
                        serde_json::Value::String(s) => Ok(s),
                        other => Err(TokensError::InvalidLeaf {
                            path: here.clone(),
                            found: json_type(&other).to_string(),
                        }),
                    })
                    .collect::<Result<_, _>>()?,
            ),
            serde_json::Value::String(s) => TokenNode::Leaf(vec![s]),
            other => {
                return Err(TokensError::InvalidLeaf {
                    path: here,
                    found: json_type(&other).to_string(),
                })
            }
        };
        children.push((key, node));
    }
    Ok(TokenNode::Branch(children))
}
