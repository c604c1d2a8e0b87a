//! Typed views over the open `config` map of each node family.
//!
//! Nodes store their configuration as an untyped JSON object so editors can carry
//! free-form keys. The structs below describe the keys each family understands;
//! every field has a default, so a partial map always deserializes as long as the
//! keys that *are* present hold values of the right shape.

use super::types::NodeType;
use crate::model::ConfigMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_AGENT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StartConfig {
    /// Names of the variables the workflow expects when it starts.
    pub variables: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EndConfig {
    pub output_variable: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConditionConfig {
    pub expression: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParallelConfig {
    pub wait_all: bool,
    pub max_concurrency: Option<u32>,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            wait_all: true,
            max_concurrency: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoopConfig {
    pub max_iterations: u32,
    pub break_condition: Option<String>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            break_condition: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HttpRequestConfig {
    pub method: HttpMethod,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
    /// Milliseconds.
    pub timeout: u64,
}

impl Default for HttpRequestConfig {
    fn default() -> Self {
        Self {
            method: HttpMethod::Get,
            url: String::new(),
            headers: BTreeMap::new(),
            body: None,
            timeout: DEFAULT_HTTP_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DatabaseQueryConfig {
    pub datasource: String,
    pub query: String,
    pub max_rows: u32,
}

impl Default for DatabaseQueryConfig {
    fn default() -> Self {
        Self {
            datasource: String::new(),
            query: String::new(),
            max_rows: 1000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileAction {
    #[default]
    Read,
    Write,
    Append,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FileOperationConfig {
    pub operation: FileAction,
    pub path: String,
    pub encoding: String,
}

impl Default for FileOperationConfig {
    fn default() -> Self {
        Self {
            operation: FileAction::Read,
            path: String::new(),
            encoding: "utf-8".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EmailSendConfig {
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WebhookConfig {
    pub url: String,
    pub method: HttpMethod,
    pub secret: Option<String>,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            method: HttpMethod::Post,
            secret: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MemoryConfig {
    pub enabled: bool,
    /// Number of past turns kept in context.
    pub length: u32,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            length: 10,
        }
    }
}

/// Shared by every agent node type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AgentConfig {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub system_prompt: String,
    pub memory: MemoryConfig,
    pub tools: Vec<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_AGENT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 2000,
            system_prompt: String::new(),
            memory: MemoryConfig::default(),
            tools: Vec::new(),
        }
    }
}

/// Serializes a typed config into the open map stored on nodes.
fn to_map<T: Serialize>(config: &T) -> ConfigMap {
    match serde_json::to_value(config) {
        Ok(serde_json::Value::Object(map)) => map,
        // Every config struct above serializes to an object.
        _ => ConfigMap::new(),
    }
}

/// Attempts to read `config` as `T`, reporting the first mismatching key.
fn check<T: DeserializeOwned>(config: &ConfigMap) -> Result<(), String> {
    serde_json::from_value::<T>(serde_json::Value::Object(config.clone()))
        .map(|_| ())
        .map_err(|e| e.to_string())
}

/// Default configuration for a node type.
pub fn default_config(node_type: NodeType) -> ConfigMap {
    match node_type {
        NodeType::Start => to_map(&StartConfig::default()),
        NodeType::End => to_map(&EndConfig::default()),
        NodeType::Condition => to_map(&ConditionConfig::default()),
        NodeType::Parallel => to_map(&ParallelConfig::default()),
        NodeType::Loop => to_map(&LoopConfig::default()),
        NodeType::HttpRequest => to_map(&HttpRequestConfig::default()),
        NodeType::DatabaseQuery => to_map(&DatabaseQueryConfig::default()),
        NodeType::FileOperation => to_map(&FileOperationConfig::default()),
        NodeType::EmailSend => to_map(&EmailSendConfig::default()),
        NodeType::Webhook => to_map(&WebhookConfig::default()),
        agent => {
            debug_assert!(agent.is_agent());
            to_map(&AgentConfig::default())
        }
    }
}

/// Checks that the keys present in `config` have the shape the node family expects.
pub fn check_config(node_type: NodeType, config: &ConfigMap) -> Result<(), String> {
    match node_type {
        NodeType::Start => check::<StartConfig>(config),
        NodeType::End => check::<EndConfig>(config),
        NodeType::Condition => check::<ConditionConfig>(config),
        NodeType::Parallel => check::<ParallelConfig>(config),
        NodeType::Loop => check::<LoopConfig>(config),
        NodeType::HttpRequest => check::<HttpRequestConfig>(config),
        NodeType::DatabaseQuery => check::<DatabaseQueryConfig>(config),
        NodeType::FileOperation => check::<FileOperationConfig>(config),
        NodeType::EmailSend => check::<EmailSendConfig>(config),
        NodeType::Webhook => check::<WebhookConfig>(config),
        _ => check::<AgentConfig>(config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn http_defaults_match_editor_defaults() {
        let config = default_config(NodeType::HttpRequest);
        assert_eq!(config.get("method"), Some(&json!("GET")));
        assert_eq!(config.get("timeout"), Some(&json!(30000)));
    }

    #[test]
    fn partial_maps_pass_the_shape_check() {
        let mut config = ConfigMap::new();
        config.insert("temperature".to_string(), json!(0.2));
        assert!(check_config(NodeType::PlanningAgent, &config).is_ok());
        assert!(check_config(NodeType::Start, &ConfigMap::new()).is_ok());
    }

    #[test]
    fn wrongly_typed_values_fail_the_shape_check() {
        let mut config = ConfigMap::new();
        config.insert("timeout".to_string(), json!("soon"));
        let err = check_config(NodeType::HttpRequest, &config).unwrap_err();
        assert!(err.contains("invalid type"));
    }
}
