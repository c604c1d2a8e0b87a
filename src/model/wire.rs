//! Inbound wire format for graphs handed over by the persistence layer.
//!
//! The raw structs mirror the JSON the editor saves. They are deliberately loose
//! (node types are plain strings, most fields optional) so that every problem can
//! be reported as a `LoadError` instead of a generic parse failure.

use super::connection::normalize_condition;
use super::{ConfigMap, Connection, Graph, Node, NodeStatus, Port, Position};
use crate::catalog::{NodeCatalog, PortLayout};
use crate::error::LoadError;
use ahash::AHashSet;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGraph {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub nodes: Vec<RawNode>,
    #[serde(default, alias = "edges")]
    pub connections: Vec<RawConnection>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub name: Option<String>,
    pub position: Position,
    #[serde(default)]
    pub config: ConfigMap,
    #[serde(default)]
    pub inputs: Option<Vec<Port>>,
    #[serde(default)]
    pub outputs: Option<Vec<Port>>,
    #[serde(default)]
    pub status: Option<NodeStatus>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConnection {
    pub id: String,
    #[serde(alias = "source")]
    pub from: String,
    #[serde(alias = "target")]
    pub to: String,
    #[serde(default, alias = "sourceHandle")]
    pub from_port: Option<String>,
    #[serde(default, alias = "targetHandle")]
    pub to_port: Option<String>,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub config: ConfigMap,
}

/// A trait for data models that can be converted into a `Graph`.
///
/// `RawGraph` implements it for the editor's own JSON; other formats can implement
/// it to feed their data through the same checks.
pub trait IntoGraph {
    /// Consumes the object and converts it into a graph, resolving node types
    /// against `catalog`.
    fn into_graph(self, catalog: &NodeCatalog) -> Result<Graph, LoadError>;
}

impl IntoGraph for RawGraph {
    fn into_graph(self, catalog: &NodeCatalog) -> Result<Graph, LoadError> {
        let mut node_ids = AHashSet::new();
        let mut nodes = Vec::with_capacity(self.nodes.len());
        for raw in self.nodes {
            if !node_ids.insert(raw.id.clone()) {
                return Err(LoadError::DuplicateNodeId(raw.id));
            }
            nodes.push(raw.into_node(catalog)?);
        }

        let mut connection_ids = AHashSet::new();
        let mut connections = Vec::with_capacity(self.connections.len());
        for raw in self.connections {
            if !connection_ids.insert(raw.id.clone()) {
                return Err(LoadError::DuplicateConnectionId(raw.id));
            }
            // Endpoints are not checked here; dangling connections are reported by the validator.
            connections.push(Connection {
                id: raw.id,
                from: raw.from,
                to: raw.to,
                from_port: raw.from_port,
                to_port: raw.to_port,
                condition: normalize_condition(raw.condition.as_deref()),
                config: raw.config,
            });
        }

        Ok(Graph {
            id: self.id,
            name: self.name,
            description: self.description,
            nodes,
            connections,
        })
    }
}

impl RawNode {
    fn into_node(self, catalog: &NodeCatalog) -> Result<Node, LoadError> {
        let node_type =
            catalog
                .resolve(&self.node_type)
                .ok_or_else(|| LoadError::UnknownNodeType {
                    node_id: self.id.clone(),
                    type_name: self.node_type.clone(),
                })?;

        let position = self.position.clamped();
        if position != self.position {
            log::warn!(
                "Node '{}' had an out-of-range position ({}, {}); clamped to ({}, {})",
                self.id,
                self.position.x,
                self.position.y,
                position.x,
                position.y
            );
        }

        let layout = PortLayout::from(node_type.descriptor());
        Ok(Node {
            id: self.id,
            node_type,
            name: self
                .name
                .unwrap_or_else(|| node_type.descriptor().label.to_string()),
            position,
            config: self.config,
            inputs: self.inputs.unwrap_or(layout.inputs),
            outputs: self.outputs.unwrap_or(layout.outputs),
            status: self.status,
        })
    }
}

impl Graph {
    /// Parses a serialized graph, resolving node types against `catalog`.
    pub fn from_json(json: &str, catalog: &NodeCatalog) -> Result<Graph, LoadError> {
        let raw: RawGraph = serde_json::from_str(json)?;
        raw.into_graph(catalog)
    }

    /// Serializes the graph snapshot handed to the persistence layer on save.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
