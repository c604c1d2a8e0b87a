use super::ConfigMap;
use serde::{Deserialize, Serialize};

/// A directed edge between two nodes, referenced by id.
///
/// Endpoints are plain ids resolved against the owning graph. A connection whose
/// endpoint no longer exists is invalid; the store removes such connections when a
/// node is removed and the validator reports any that slip in through loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: String,
    pub from: String,
    pub to: String,
    /// Output port on `from`. `None` means the node's default output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_port: Option<String>,
    /// Input port on `to`. `None` feeds the node's first input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_port: Option<String>,
    /// Boolean expression over the upstream output. `None` means always traverse.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default)]
    pub config: ConfigMap,
}

impl Connection {
    pub fn is_unconditional(&self) -> bool {
        self.condition.is_none()
    }

    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }

    /// Reads the open config map as `ConnectionConfig`.
    pub fn settings(&self) -> Result<ConnectionConfig, serde_json::Error> {
        serde_json::from_value(serde_json::Value::Object(self.config.clone()))
    }
}

/// Typed view of a connection's config. Every field is optional.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConnectionConfig {
    pub priority: Option<i32>,
    pub transform_script: Option<String>,
    /// Milliseconds to wait before traversing.
    pub delay: Option<u64>,
    pub retry: Option<RetryPolicy>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RetryPolicy {
    pub count: u32,
    /// Milliseconds between attempts.
    pub interval: u64,
}

/// Treats blank condition strings as "no condition".
pub(crate) fn normalize_condition(condition: Option<&str>) -> Option<String> {
    condition
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}
