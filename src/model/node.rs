use super::ConfigMap;
use crate::catalog::{NodeType, PortDefinition};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A point on the editor canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Clamps both coordinates to be non-negative. Non-finite values become `0`.
    pub fn clamped(self) -> Self {
        fn clamp(v: f64) -> f64 {
            if v.is_finite() { v.max(0.0) } else { 0.0 }
        }
        Self {
            x: clamp(self.x),
            y: clamp(self.y),
        }
    }

    pub fn is_clamped(&self) -> bool {
        *self == self.clamped()
    }

    pub fn offset(self, delta: Position) -> Self {
        Self {
            x: self.x + delta.x,
            y: self.y + delta.y,
        }
    }
}

/// A named input or output on a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub required: bool,
}

impl From<&PortDefinition> for Port {
    fn from(def: &PortDefinition) -> Self {
        Self {
            name: def.name.to_string(),
            label: def.label.to_string(),
            required: def.required,
        }
    }
}

/// Execution state reported by a workflow runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    #[default]
    Idle,
    Running,
    Success,
    Error,
}

/// One step in a workflow.
///
/// `id` and `node_type` are fixed for the lifetime of the node; changing the type
/// means removing the node and adding a new one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub name: String,
    pub position: Position,
    pub config: ConfigMap,
    pub inputs: Vec<Port>,
    pub outputs: Vec<Port>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<NodeStatus>,
}

impl Node {
    pub fn input(&self, name: &str) -> Option<&Port> {
        self.inputs.iter().find(|p| p.name == name)
    }

    pub fn output(&self, name: &str) -> Option<&Port> {
        self.outputs.iter().find(|p| p.name == name)
    }

    pub fn is_start(&self) -> bool {
        self.node_type == NodeType::Start
    }

    pub fn is_end(&self) -> bool {
        self.node_type == NodeType::End
    }

    /// Reads the open config map as one of the typed family configs, e.g. `AgentConfig`.
    pub fn typed_config<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(serde_json::Value::Object(self.config.clone()))
    }
}
