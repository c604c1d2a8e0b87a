//! The graph store: the single mutable owner of one workflow graph.
//!
//! Every public operation either succeeds completely or leaves the graph untouched.
//! Node removal cascades to the node's connections in the same call.

use crate::catalog::{NodeCatalog, NodeType, PortLayout};
use crate::error::GraphError;
use crate::ids;
use crate::model::connection::normalize_condition;
use crate::model::{merge_config, ConfigMap, Connection, Graph, Node, NodeStatus, Position};

mod config;

pub use config::StoreConfig;

/// A request to connect two nodes, optionally through named ports.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewConnection {
    pub from: String,
    pub to: String,
    pub from_port: Option<String>,
    pub to_port: Option<String>,
    pub condition: Option<String>,
}

impl NewConnection {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            ..Self::default()
        }
    }

    pub fn with_source_port(mut self, port: impl Into<String>) -> Self {
        self.from_port = Some(port.into());
        self
    }

    pub fn with_target_port(mut self, port: impl Into<String>) -> Self {
        self.to_port = Some(port.into());
        self
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }
}

pub struct GraphStoreBuilder<'c> {
    catalog: &'c NodeCatalog,
    config: StoreConfig,
    graph: Option<Graph>,
}

impl<'c> GraphStoreBuilder<'c> {
    pub fn new(catalog: &'c NodeCatalog) -> Self {
        Self {
            catalog,
            config: StoreConfig::default(),
            graph: None,
        }
    }

    pub fn config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    /// Starts from an existing graph, e.g. one loaded from storage or a template.
    pub fn graph(mut self, graph: Graph) -> Self {
        self.graph = Some(graph);
        self
    }

    pub fn build(self) -> GraphStore<'c> {
        GraphStore {
            catalog: self.catalog,
            config: self.config,
            graph: self.graph.unwrap_or_default(),
        }
    }
}

/// Authoritative mutable state of one workflow graph.
pub struct GraphStore<'c> {
    catalog: &'c NodeCatalog,
    config: StoreConfig,
    graph: Graph,
}

impl<'c> GraphStore<'c> {
    /// An empty graph using the default settings.
    pub fn new(catalog: &'c NodeCatalog) -> Self {
        GraphStoreBuilder::new(catalog).build()
    }

    pub fn builder(catalog: &'c NodeCatalog) -> GraphStoreBuilder<'c> {
        GraphStoreBuilder::new(catalog)
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn into_graph(self) -> Graph {
        self.graph
    }

    pub fn catalog(&self) -> &'c NodeCatalog {
        self.catalog
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.graph.name = name.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.graph.description = description.into();
    }

    /// Creates a node of `node_type` with catalog ports and default config.
    ///
    /// The position is clamped to non-negative coordinates.
    pub fn add_node(&mut self, node_type: &str, position: Position) -> Result<Node, GraphError> {
        let resolved = self
            .catalog
            .resolve(node_type)
            .ok_or_else(|| GraphError::UnknownNodeType {
                type_name: node_type.to_string(),
            })?;
        let descriptor = resolved.descriptor();
        let layout = PortLayout::from(descriptor);

        let node = Node {
            id: self.fresh_node_id(resolved),
            node_type: resolved,
            name: self
                .config
                .default_node_name
                .clone()
                .unwrap_or_else(|| descriptor.label.to_string()),
            position: position.clamped(),
            config: crate::catalog::config::default_config(resolved),
            inputs: layout.inputs,
            outputs: layout.outputs,
            status: None,
        };

        log::debug!("Added node '{}' ({})", node.id, resolved);
        self.graph.nodes.push(node.clone());
        Ok(node)
    }

    /// Moves a node. Connections are untouched; their anchors are a view concern.
    pub fn move_node(&mut self, id: &str, position: Position) -> Result<(), GraphError> {
        let node = self.node_mut(id)?;
        node.position = position.clamped();
        Ok(())
    }

    /// Removes a node together with every connection touching it.
    ///
    /// Removing an absent node is a no-op and returns `None`.
    pub fn remove_node(&mut self, id: &str) -> Option<Node> {
        let index = self.graph.nodes.iter().position(|n| n.id == id)?;
        let node = self.graph.nodes.remove(index);

        let before = self.graph.connections.len();
        self.graph.connections.retain(|c| c.from != id && c.to != id);
        log::debug!(
            "Removed node '{}' and {} attached connection(s)",
            id,
            before - self.graph.connections.len()
        );
        Some(node)
    }

    /// Connects `from` to `to`, optionally guarded by a condition expression.
    pub fn add_connection(
        &mut self,
        from: &str,
        to: &str,
        condition: Option<&str>,
    ) -> Result<Connection, GraphError> {
        let mut request = NewConnection::new(from, to);
        request.condition = condition.map(str::to_string);
        self.connect(request)
    }

    /// Connects two nodes as described by `request`.
    ///
    /// Fails when an endpoint or named port is missing, when the connection would
    /// loop a node onto itself, or when a connection with the same endpoints and the
    /// same condition already exists.
    pub fn connect(&mut self, request: NewConnection) -> Result<Connection, GraphError> {
        let from_node = self.graph.node(&request.from).ok_or_else(|| GraphError::NodeNotFound {
            node_id: request.from.clone(),
        })?;
        let to_node = self.graph.node(&request.to).ok_or_else(|| GraphError::NodeNotFound {
            node_id: request.to.clone(),
        })?;

        if from_node.id == to_node.id && !from_node.node_type.allows_self_loop() {
            return Err(GraphError::SelfConnection {
                node_id: request.from,
            });
        }
        if let Some(port) = &request.from_port {
            if from_node.output(port).is_none() {
                return Err(GraphError::PortNotFound {
                    node_id: request.from,
                    port: port.clone(),
                });
            }
        }
        if let Some(port) = &request.to_port {
            if to_node.input(port).is_none() {
                return Err(GraphError::PortNotFound {
                    node_id: request.to,
                    port: port.clone(),
                });
            }
        }

        let condition = normalize_condition(request.condition.as_deref());
        let duplicate = self
            .graph
            .connections
            .iter()
            .any(|c| c.from == request.from && c.to == request.to && c.condition == condition);
        if duplicate {
            return Err(GraphError::DuplicateConnection {
                from: request.from,
                to: request.to,
            });
        }

        let connection = Connection {
            id: self.fresh_connection_id(),
            from: request.from,
            to: request.to,
            from_port: request.from_port,
            to_port: request.to_port,
            condition,
            config: ConfigMap::new(),
        };
        log::debug!(
            "Connected '{}' -> '{}' as '{}'",
            connection.from,
            connection.to,
            connection.id
        );
        self.graph.connections.push(connection.clone());
        Ok(connection)
    }

    /// Removes a connection. Removing an absent connection is a no-op.
    pub fn remove_connection(&mut self, id: &str) -> Option<Connection> {
        let index = self.graph.connections.iter().position(|c| c.id == id)?;
        log::debug!("Removed connection '{}'", id);
        Some(self.graph.connections.remove(index))
    }

    /// Shallow-merges `partial` into the node's config. Last write wins.
    pub fn update_node_config(&mut self, id: &str, partial: ConfigMap) -> Result<(), GraphError> {
        let node = self.node_mut(id)?;
        merge_config(&mut node.config, partial);
        Ok(())
    }

    /// Shallow-merges `partial` into the connection's config. Last write wins.
    pub fn update_connection_config(
        &mut self,
        id: &str,
        partial: ConfigMap,
    ) -> Result<(), GraphError> {
        let connection = self.connection_mut(id)?;
        merge_config(&mut connection.config, partial);
        Ok(())
    }

    /// Replaces a connection's condition. Blank strings clear it.
    ///
    /// Unlike `connect`, this does not reject duplicates; the validator reports them.
    pub fn set_condition(&mut self, id: &str, condition: Option<&str>) -> Result<(), GraphError> {
        let connection = self.connection_mut(id)?;
        connection.condition = normalize_condition(condition);
        Ok(())
    }

    pub fn rename_node(&mut self, id: &str, name: impl Into<String>) -> Result<(), GraphError> {
        self.node_mut(id)?.name = name.into();
        Ok(())
    }

    pub fn set_node_status(
        &mut self,
        id: &str,
        status: Option<NodeStatus>,
    ) -> Result<(), GraphError> {
        self.node_mut(id)?.status = status;
        Ok(())
    }

    /// Copies a node's config and ports under a fresh id, offset from the original.
    pub fn duplicate_node(&mut self, id: &str) -> Result<Node, GraphError> {
        let original = self.graph.node(id).ok_or_else(|| GraphError::NodeNotFound {
            node_id: id.to_string(),
        })?;

        let mut copy = original.clone();
        copy.id = self.fresh_node_id(original.node_type);
        copy.name = format!("{} (copy)", original.name);
        copy.position = original
            .position
            .offset(self.config.duplicate_offset)
            .clamped();
        copy.status = None;

        log::debug!("Duplicated node '{}' as '{}'", id, copy.id);
        self.graph.nodes.push(copy.clone());
        Ok(copy)
    }

    fn node_mut(&mut self, id: &str) -> Result<&mut Node, GraphError> {
        self.graph
            .node_mut(id)
            .ok_or_else(|| GraphError::NodeNotFound {
                node_id: id.to_string(),
            })
    }

    fn connection_mut(&mut self, id: &str) -> Result<&mut Connection, GraphError> {
        self.graph
            .connection_mut(id)
            .ok_or_else(|| GraphError::ConnectionNotFound {
                connection_id: id.to_string(),
            })
    }

    fn fresh_node_id(&self, node_type: NodeType) -> String {
        loop {
            let id = ids::node_id(node_type, self.config.id_suffix_length);
            if !self.graph.contains_node(&id) {
                return id;
            }
        }
    }

    fn fresh_connection_id(&self) -> String {
        loop {
            let id = ids::connection_id(self.config.id_suffix_length);
            if !self.graph.contains_connection(&id) {
                return id;
            }
        }
    }
}
