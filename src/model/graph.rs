use super::{Connection, Node};
use crate::catalog::NodeType;
use serde::Serialize;

/// The nodes and connections of one workflow.
///
/// Nodes and connections keep their insertion order, which is also the order the
/// validator reports issues in. The collections are only mutable through
/// `GraphStore`, which upholds id uniqueness and referential integrity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Graph {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub(crate) nodes: Vec<Node>,
    pub(crate) connections: Vec<Connection>,
}

impl Graph {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: String::new(),
            nodes: Vec::new(),
            connections: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.connections.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    pub fn connection(&self, id: &str) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id == id)
    }

    /// Connections ending at `node_id`, in insertion order.
    pub fn incoming<'a>(
        &'a self,
        node_id: &'a str,
    ) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections.iter().filter(move |c| c.to == node_id)
    }

    /// Connections starting at `node_id`, in insertion order.
    pub fn outgoing<'a>(
        &'a self,
        node_id: &'a str,
    ) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections.iter().filter(move |c| c.from == node_id)
    }

    pub fn nodes_of_type(&self, node_type: NodeType) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.node_type == node_type)
    }

    pub fn start_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes_of_type(NodeType::Start)
    }

    pub fn end_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes_of_type(NodeType::End)
    }

    pub(crate) fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub(crate) fn connection_mut(&mut self, id: &str) -> Option<&mut Connection> {
        self.connections.iter_mut().find(|c| c.id == id)
    }

    pub(crate) fn contains_connection(&self, id: &str) -> bool {
        self.connection(id).is_some()
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new("Untitled workflow")
    }
}
